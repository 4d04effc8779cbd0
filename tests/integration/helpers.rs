//! Helper types for integration tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use web_monitor::{
    config::{Config, TargetConfig, TimeframeConfig},
    probe::Probe,
    render::Render,
    sample::Sample,
    target::Target,
};

/// Probe replaying a fixed list of status codes, then repeating the last one
pub struct ScriptedProbe {
    script: Mutex<VecDeque<u16>>,
    last: Mutex<u16>,
}

impl ScriptedProbe {
    pub fn new(status_codes: &[u16]) -> Self {
        Self {
            script: Mutex::new(status_codes.iter().copied().collect()),
            last: Mutex::new(200),
        }
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, _url: &str) -> Sample {
        let mut last = self.last.lock().unwrap();
        if let Some(code) = self.script.lock().unwrap().pop_front() {
            *last = code;
        }
        Sample::from_response(Duration::from_millis(100), *last)
    }
}

/// What a renderer saw on one render tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub url: String,
    pub samples: usize,
    pub availability: Option<f64>,
    pub alerts: usize,
}

/// Renderer recording every frame into a shared list
#[derive(Clone, Default)]
pub struct RecordingRender {
    pub frames: Arc<Mutex<Vec<Vec<Frame>>>>,
}

impl Render for RecordingRender {
    fn render(&mut self, targets: &[Target]) -> anyhow::Result<()> {
        let frame = targets
            .iter()
            .map(|target| Frame {
                url: target.url().to_string(),
                samples: target.sample_count(),
                availability: target.snapshot(0).map(|snapshot| snapshot.availability),
                alerts: target.alerts().len(),
            })
            .collect();
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

/// One target sampled every second with 4s/8s timeframes
pub fn create_test_config(website: &str) -> Config {
    let mut config = Config::for_targets(vec![TargetConfig::new(website, Some(1))]);
    config.refresh_rate = Some(1);
    config.timeframes = Some(vec![
        TimeframeConfig {
            label: Some("4s".to_string()),
            window: 4,
            refresh: 1,
        },
        TimeframeConfig {
            label: Some("8s".to_string()),
            window: 8,
            refresh: 2,
        },
    ]);
    config
}
