#![forbid(unsafe_code)]

//! Headless mode: the full cycle with no terminal attached.

use std::io::Write;

use tracing::debug;
use vsort_core::{
    Clock, EngineConfig, Pacer, Phase, RunReport, SinkError, Snapshot, SnapshotSink, SortCycle,
    SystemClock, ThreadPacer,
};

use crate::error::Result;

/// Counts snapshots and logs completed runs. Never fails.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    snapshots: u64,
    completed: u64,
}

impl HeadlessSink {
    #[must_use]
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }
}

impl SnapshotSink for HeadlessSink {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> std::result::Result<(), SinkError> {
        self.snapshots += 1;
        if snapshot.phase == Phase::Completed {
            self.completed += 1;
            debug!(
                algorithm = snapshot.algorithm_name(),
                len = snapshot.values.len(),
                elapsed_secs = snapshot.elapsed_secs(),
                "completed frame"
            );
        }
        Ok(())
    }
}

/// Run the cycle round by round, handing each finished run to `on_report`.
///
/// Reports arrive one run late (a run is recorded by the reset that follows
/// it); the last run of a bounded cycle is delivered after `conclude`.
pub fn drive<C, P, S, F>(cycle: &mut SortCycle<C, P, S>, mut on_report: F) -> Result<()>
where
    C: Clock,
    P: Pacer,
    S: SnapshotSink,
    F: FnMut(&RunReport) -> Result<()>,
{
    loop {
        let finished = cycle
            .config()
            .max_rounds
            .is_some_and(|max| cycle.rounds_completed() >= max);
        if finished {
            cycle.conclude()?;
        } else {
            cycle.run_round()?;
        }

        for report in cycle.drain_reports() {
            on_report(&report)?;
        }
        if finished {
            return Ok(());
        }
    }
}

/// Headless entry point. With `json`, each report is one line on `out`.
pub fn run_headless<W: Write>(
    config: EngineConfig,
    json: bool,
    out: &mut W,
) -> Result<HeadlessSink> {
    let mut cycle = SortCycle::new(config, SystemClock, ThreadPacer, HeadlessSink::default())?;
    drive(&mut cycle, |report| {
        if json {
            serde_json::to_writer(&mut *out, report)?;
            writeln!(out)?;
            out.flush()?;
        }
        Ok(())
    })?;
    Ok(cycle.into_sink())
}
