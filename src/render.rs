//! Rendering of target state

use anyhow::Result;
use tracing::info;

use crate::metrics::Metric;
use crate::target::Target;

/// Read-only consumer of target state, invoked on every render tick
pub trait Render: Send {
    fn render(&mut self, targets: &[Target]) -> Result<()>;
}

/// Renderer writing per-target summaries to the log
#[derive(Debug, Default)]
pub struct LogRender {
    /// Alerts already reported, per target
    reported: Vec<usize>,
}

impl LogRender {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Render for LogRender {
    fn render(&mut self, targets: &[Target]) -> Result<()> {
        self.reported.resize(targets.len(), 0);

        for (target, reported) in targets.iter().zip(self.reported.iter_mut()) {
            for (timeframe, snapshot) in target.snapshots() {
                let Some(snapshot) = snapshot else {
                    continue;
                };

                let summary = Metric::all_columns()
                    .zip(Metric::all_values(snapshot))
                    .map(|(column, value)| format!("{column}={value}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!("{} [{}] {summary}", target.url(), timeframe.label);
            }

            for alert in &target.alerts()[*reported..] {
                info!("{}: {}", alert.kind, alert.message);
            }
            *reported = target.alerts().len();
        }

        Ok(())
    }
}
