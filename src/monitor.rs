//! Monitor wiring
//!
//! The [`Monitor`] owns every [`Target`] and executes the scheduler's jobs:
//!
//! ```text
//! Probe   (priority 1) → probe URL → append sample to the target's store
//! Refresh (priority 2) → recompute one timeframe → evaluate alert → notify
//! Render  (priority 3) → hand all targets to the renderer
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::notify::Notifier;
use crate::probe::Probe;
use crate::render::Render;
use crate::scheduler::{Dispatch, Scheduler};
use crate::target::Target;

pub const PROBE_PRIORITY: u32 = 1;
pub const REFRESH_PRIORITY: u32 = 2;
pub const RENDER_PRIORITY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Probe { target: usize },
    Refresh { target: usize, timeframe: usize },
    Render,
}

pub struct Monitor {
    targets: Vec<Target>,
    probe: Box<dyn Probe>,
    render: Box<dyn Render>,
    notifier: Option<Notifier>,
    render_interval: Duration,
}

impl Monitor {
    /// Build a monitor from a validated configuration
    pub fn from_config(
        config: &Config,
        probe: Box<dyn Probe>,
        render: Box<dyn Render>,
    ) -> Result<Self> {
        config.validate()?;
        let timeframes = config.timeframes()?;

        let targets = config
            .monitor
            .iter()
            .map(|target| {
                Target::new(
                    target.website.clone(),
                    Duration::from_secs(target.interval),
                    timeframes.clone(),
                    config.alert.threshold,
                )
            })
            .collect();

        let notifier = config
            .alert
            .webhook
            .clone()
            .map(|webhook| Notifier::new(webhook, config.probe_timeout()))
            .transpose()?;

        Ok(Self {
            targets,
            probe,
            render,
            notifier,
            render_interval: config.render_interval(),
        })
    }

    /// Register probe, refresh and render jobs for every target
    pub fn schedule(&self, scheduler: &mut Scheduler<Job>) -> Result<()> {
        for (index, target) in self.targets.iter().enumerate() {
            scheduler
                .every(target.interval(), PROBE_PRIORITY, Job::Probe { target: index })
                .with_context(|| format!("Failed to schedule probing of {}", target.url()))?;

            for (timeframe_index, timeframe) in target.timeframes().iter().enumerate() {
                scheduler.every(
                    timeframe.refresh_interval,
                    REFRESH_PRIORITY,
                    Job::Refresh {
                        target: index,
                        timeframe: timeframe_index,
                    },
                )?;
            }

            debug!(
                "scheduled {} every {:?} with {} timeframes",
                target.url(),
                target.interval(),
                target.timeframes().len()
            );
        }

        scheduler.every(self.render_interval, RENDER_PRIORITY, Job::Render)?;
        info!("monitoring {} websites", self.targets.len());

        Ok(())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn target_mut(&mut self, index: usize) -> Result<&mut Target> {
        self.targets
            .get_mut(index)
            .with_context(|| format!("no target with index {index}"))
    }
}

#[async_trait]
impl Dispatch<Job> for Monitor {
    #[instrument(skip(self))]
    async fn dispatch(&mut self, job: &Job) -> Result<()> {
        match *job {
            Job::Probe { target } => {
                let url = self.target_mut(target)?.url().to_string();
                let sample = self.probe.probe(&url).await;
                self.target_mut(target)?.record(sample);
            }
            Job::Refresh { target, timeframe } => {
                let event = self.target_mut(target)?.refresh(timeframe);
                if let (Some(event), Some(notifier)) = (event, &self.notifier) {
                    notifier.notify(&event).await;
                }
            }
            Job::Render => self.render.render(&self.targets)?,
        }

        Ok(())
    }
}
