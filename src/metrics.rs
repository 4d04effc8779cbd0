//! Sliding-window metrics
//!
//! A [`Snapshot`] is always computed from scratch over the samples of one
//! [`Timeframe`]. Each timeframe carries its own refresh cadence, so longer
//! windows are rescanned less often than short ones.

use std::time::Duration;

use crate::config::ConfigError;
use crate::sample::{Sample, StatusClass};
use crate::store::samples_in;

/// Aggregation window together with its refresh cadence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeframe {
    pub label: String,
    pub window: Duration,
    pub refresh_interval: Duration,
}

impl Timeframe {
    pub fn new(label: impl Into<String>, window: Duration, refresh_interval: Duration) -> Self {
        Self {
            label: label.into(),
            window,
            refresh_interval,
        }
    }
}

/// Ordered, non-empty set of timeframes (ascending by window)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeframes(Vec<Timeframe>);

impl Timeframes {
    pub fn new(mut timeframes: Vec<Timeframe>) -> Result<Self, ConfigError> {
        if timeframes.is_empty() {
            return Err(ConfigError::InvalidTimeframe(
                "at least one timeframe is required".to_string(),
            ));
        }

        for timeframe in &timeframes {
            if timeframe.refresh_interval.is_zero() || timeframe.window.is_zero() {
                return Err(ConfigError::InvalidTimeframe(format!(
                    "{}: window and refresh interval must be positive",
                    timeframe.label
                )));
            }
            if timeframe.refresh_interval > timeframe.window {
                return Err(ConfigError::InvalidTimeframe(format!(
                    "{}: refresh interval {:?} exceeds window {:?}",
                    timeframe.label, timeframe.refresh_interval, timeframe.window
                )));
            }
        }

        timeframes.sort_by_key(|timeframe| timeframe.window);
        if let Some(pair) = timeframes.windows(2).find(|w| w[0].window == w[1].window) {
            return Err(ConfigError::InvalidTimeframe(format!(
                "{} and {} share the same window",
                pair[0].label, pair[1].label
            )));
        }

        Ok(Self(timeframes))
    }

    /// The timeframe driving alert evaluation
    pub fn shortest(&self) -> &Timeframe {
        &self.0[0]
    }

    /// The timeframe determining sample retention
    pub fn longest(&self) -> &Timeframe {
        &self.0[self.0.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Timeframe> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Timeframe> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Timeframes {
    /// 2 minutes, 10 minutes and 1 hour
    fn default() -> Self {
        Self(vec![
            Timeframe::new("2min", Duration::from_secs(120), Duration::from_secs(1)),
            Timeframe::new("10min", Duration::from_secs(600), Duration::from_secs(10)),
            Timeframe::new("1h", Duration::from_secs(3600), Duration::from_secs(600)),
        ])
    }
}

/// Metric values of one target over one timeframe
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Number of samples the snapshot was computed from
    pub samples: usize,

    /// Percentage of 2xx samples (0 for an empty window)
    pub availability: f64,

    pub avg_latency: Option<Duration>,
    pub max_latency: Option<Duration>,

    pub count_2xx: usize,
    pub count_4xx: usize,
    pub count_5xx: usize,
    pub count_timeout: usize,
    pub count_unreachable: usize,
    pub count_other: usize,
}

/// Computes snapshots for targets sampled at a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct MetricEngine {
    sampling_interval: Duration,
}

impl MetricEngine {
    pub fn new(sampling_interval: Duration) -> Self {
        Self { sampling_interval }
    }

    /// Number of samples covering the window of `timeframe`
    pub fn window_length(&self, timeframe: &Timeframe) -> usize {
        samples_in(timeframe.window, self.sampling_interval)
    }

    pub fn compute(&self, timeframe: &Timeframe, samples: &[Sample]) -> Snapshot {
        let skip = samples.len().saturating_sub(self.window_length(timeframe));
        let samples = &samples[skip..];

        let mut snapshot = Snapshot {
            samples: samples.len(),
            ..Snapshot::default()
        };

        for sample in samples {
            match sample.status() {
                StatusClass::Success => snapshot.count_2xx += 1,
                StatusClass::ClientError => snapshot.count_4xx += 1,
                StatusClass::ServerError => snapshot.count_5xx += 1,
                StatusClass::Timeout => snapshot.count_timeout += 1,
                StatusClass::Unreachable => snapshot.count_unreachable += 1,
                StatusClass::Other => snapshot.count_other += 1,
            }
        }

        if samples.is_empty() {
            return snapshot;
        }

        snapshot.availability = 100.0 * snapshot.count_2xx as f64 / samples.len() as f64;

        let total: Duration = samples.iter().map(Sample::latency).sum();
        snapshot.avg_latency = Some(total / samples.len() as u32);
        snapshot.max_latency = samples.iter().map(Sample::latency).max();

        snapshot
    }
}

/// The fixed set of metrics shown per timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ResponseTime,
    HttpStatus,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::ResponseTime, Metric::HttpStatus];

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Metric::ResponseTime => &["AvgResponseTime[s]", "MaxResponseTime[s]"],
            Metric::HttpStatus => &["Availability", "Status 2xx", "Status 4xx", "Status 5xx"],
        }
    }

    /// Display values, in the same order as [`Metric::columns`]
    pub fn values(&self, snapshot: &Snapshot) -> Vec<String> {
        match self {
            Metric::ResponseTime => vec![
                format_latency(snapshot.avg_latency),
                format_latency(snapshot.max_latency),
            ],
            Metric::HttpStatus => vec![
                format!("{:.2}", snapshot.availability),
                snapshot.count_2xx.to_string(),
                snapshot.count_4xx.to_string(),
                snapshot.count_5xx.to_string(),
            ],
        }
    }

    /// Column names of every metric
    pub fn all_columns() -> impl Iterator<Item = &'static str> {
        Metric::ALL.iter().flat_map(|metric| metric.columns().iter().copied())
    }

    /// Display values of every metric for one snapshot
    pub fn all_values(snapshot: &Snapshot) -> Vec<String> {
        Metric::ALL
            .iter()
            .flat_map(|metric| metric.values(snapshot))
            .collect()
    }
}

fn format_latency(latency: Option<Duration>) -> String {
    latency.map_or_else(|| "-".to_string(), |l| format!("{:.4}", l.as_secs_f64()))
}
