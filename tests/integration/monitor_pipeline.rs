//! Scheduler driving the monitor on a paused clock
//!
//! These tests verify that:
//! - probes, refreshes and renders fire in priority order
//! - the shortest timeframe drives alerting
//! - renders observe committed snapshots and alerts

use std::time::Duration;

use pretty_assertions::assert_eq;
use web_monitor::alert::AlertKind;
use web_monitor::monitor::{Job, Monitor};
use web_monitor::scheduler::{Clock, Scheduler};

use crate::helpers::*;

const URL: &str = "https://example.com/";

fn setup(status_codes: &[u16]) -> (Monitor, Scheduler<Job>, RecordingRender) {
    let render = RecordingRender::default();
    let monitor = Monitor::from_config(
        &create_test_config(URL),
        Box::new(ScriptedProbe::new(status_codes)),
        Box::new(render.clone()),
    )
    .unwrap();

    let mut scheduler = Scheduler::with_clock(Clock::starting_at(Duration::ZERO));
    monitor.schedule(&mut scheduler).unwrap();

    (monitor, scheduler, render)
}

/// Fire every job due up to and including `until`
///
/// The first job due after `until` is fired too, since its time is only known
/// once it ran, but it is left out of the returned list.
async fn run_until(
    monitor: &mut Monitor,
    scheduler: &mut Scheduler<Job>,
    until: Duration,
) -> Vec<(Job, Duration)> {
    let mut firings = vec![];
    loop {
        let firing = scheduler.step(monitor).await.unwrap();
        if firing.at > until {
            break;
        }
        assert!(firing.succeeded);
        firings.push((scheduler.task(firing.task).job, firing.at));
    }
    firings
}

#[tokio::test(start_paused = true)]
async fn test_jobs_fire_in_priority_order() {
    let (mut monitor, mut scheduler, _render) = setup(&[]);

    let firings = run_until(&mut monitor, &mut scheduler, Duration::from_secs(1)).await;

    assert_eq!(
        firings,
        vec![
            (Job::Probe { target: 0 }, Duration::ZERO),
            (Job::Refresh { target: 0, timeframe: 0 }, Duration::ZERO),
            (Job::Refresh { target: 0, timeframe: 1 }, Duration::ZERO),
            (Job::Render, Duration::ZERO),
            (Job::Probe { target: 0 }, Duration::from_secs(1)),
            (Job::Refresh { target: 0, timeframe: 0 }, Duration::from_secs(1)),
            (Job::Render, Duration::from_secs(1)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_outage_raises_single_down_and_recover() {
    let (mut monitor, mut scheduler, render) =
        setup(&[200, 200, 500, 500, 500, 500, 200, 200, 200, 200]);

    run_until(&mut monitor, &mut scheduler, Duration::from_secs(9)).await;

    let target = &monitor.targets()[0];
    let kinds: Vec<_> = target.alerts().iter().map(|event| event.kind).collect();
    assert_eq!(kinds, vec![AlertKind::Down, AlertKind::Recover]);

    // 66.67% after the first failure is already below the threshold
    assert!((target.alerts()[0].availability - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(target.alerts()[1].availability, 100.0);

    // The 8 second window still contains the outage
    assert_eq!(target.snapshot(1).unwrap().count_5xx, 4);
    assert_eq!(target.sample_count(), 8);

    let frames = render.frames.lock().unwrap();
    assert_eq!(frames.len(), 10);
    assert_eq!(frames[0][0].samples, 1);
    assert_eq!(frames[0][0].availability, Some(100.0));
    assert_eq!(frames[5][0].availability, Some(0.0));
    assert_eq!(frames[2][0].alerts, 1);
    assert_eq!(frames[9][0].alerts, 2);
    assert!(frames.iter().all(|frame| frame[0].url == URL));
}

#[tokio::test(start_paused = true)]
async fn test_healthy_target_never_alerts() {
    let (mut monitor, mut scheduler, render) = setup(&[200]);

    run_until(&mut monitor, &mut scheduler, Duration::from_secs(20)).await;

    assert!(monitor.targets()[0].alerts().is_empty());
    assert_eq!(render.frames.lock().unwrap().len(), 21);
}
