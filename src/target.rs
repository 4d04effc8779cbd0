//! Monitored endpoint state

use std::time::Duration;

use tracing::{debug, instrument};

use crate::alert::{AlertEngine, AlertEvent, AlertState};
use crate::metrics::{MetricEngine, Snapshot, Timeframe, Timeframes};
use crate::sample::Sample;
use crate::store::SampleStore;

/// One monitored website with its samples, snapshots and alert log
#[derive(Debug, Clone)]
pub struct Target {
    url: String,
    interval: Duration,
    store: SampleStore,
    engine: MetricEngine,
    timeframes: Timeframes,
    /// Indexed like `timeframes`, `None` until first refreshed
    snapshots: Vec<Option<Snapshot>>,
    alert: AlertEngine,
}

impl Target {
    pub fn new(
        url: impl Into<String>,
        interval: Duration,
        timeframes: Timeframes,
        threshold: f64,
    ) -> Self {
        let url = url.into();
        Self {
            store: SampleStore::for_retention(timeframes.longest().window, interval),
            engine: MetricEngine::new(interval),
            snapshots: vec![None; timeframes.len()],
            alert: AlertEngine::new(url.clone(), threshold),
            url,
            interval,
            timeframes,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sampling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn record(&mut self, sample: Sample) {
        self.store.append(sample);
    }

    /// Recompute the snapshot of the timeframe at `index`
    ///
    /// Refreshing the shortest timeframe also feeds the alert engine, unless
    /// no sample has been recorded yet. Returns the alert raised, if any.
    #[instrument(skip(self), fields(target = %self.url))]
    pub fn refresh(&mut self, index: usize) -> Option<AlertEvent> {
        let timeframe = self.timeframes.get(index)?;

        let window = self.store.window(self.engine.window_length(timeframe));
        let snapshot = self.engine.compute(timeframe, &window);
        debug!(
            "{}: availability {:.2}% over {} samples",
            timeframe.label, snapshot.availability, snapshot.samples
        );

        let availability = snapshot.availability;
        let evaluate = index == 0 && snapshot.samples > 0;
        self.snapshots[index] = Some(snapshot);

        if evaluate {
            self.alert.evaluate(availability).cloned()
        } else {
            None
        }
    }

    pub fn snapshot(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)?.as_ref()
    }

    /// Every timeframe with its latest snapshot, shortest first
    pub fn snapshots(&self) -> impl Iterator<Item = (&Timeframe, Option<&Snapshot>)> {
        self.timeframes
            .iter()
            .zip(self.snapshots.iter().map(Option::as_ref))
    }

    pub fn timeframes(&self) -> &Timeframes {
        &self.timeframes
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert.state()
    }

    pub fn alerts(&self) -> &[AlertEvent] {
        self.alert.events()
    }

    pub fn sample_count(&self) -> usize {
        self.store.len()
    }
}
