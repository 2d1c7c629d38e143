#![forbid(unsafe_code)]

//! The sort cycle.
//!
//! [`SortCycle`] owns both buffers and the current [`SortRun`], and walks the
//! configured schedule forever (or for `max_rounds` passes). Every schedule
//! entry starts with the reset protocol:
//!
//! 1. stop the timer and present a [`Phase::Completed`] snapshot of the
//!    finished run, recording its [`RunReport`];
//! 2. pause (failures are logged and ignored);
//! 3. shuffle both buffers;
//! 4. restart the timer;
//! 5. switch the active buffer to the entry's target.
//!
//! The sort then runs to completion, presenting one [`Phase::Step`] snapshot
//! per mutation point.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace, warn};

use crate::algorithms::{Progress, SortAlgorithm, SortStats};
use crate::buffer::{ArrayState, BufferKind};
use crate::clock::{Clock, Pacer};
use crate::config::{EngineConfig, ScheduleEntry};
use crate::error::{ConfigError, CycleError, SinkError};
use crate::snapshot::{Phase, Snapshot, SnapshotSink};
use crate::timer::RunTimer;

/// Number of finished runs kept by [`SortCycle::reports`].
pub const REPORT_HISTORY: usize = 32;

/// The run currently shown on screen.
#[derive(Debug, Clone, Copy)]
pub struct SortRun {
    /// `None` until the first schedule entry starts.
    pub algorithm: Option<SortAlgorithm>,
    pub target: BufferKind,
    /// Pass over the schedule this run belongs to.
    pub round: u64,
    pub timer: RunTimer,
    pub stats: SortStats,
}

/// Summary of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Zero-based pass over the schedule.
    pub round: u64,
    pub algorithm: SortAlgorithm,
    pub target: BufferKind,
    pub len: usize,
    pub elapsed_secs: f64,
    pub stats: SortStats,
}

pub struct SortCycle<C, P, S> {
    config: EngineConfig,
    state: ArrayState,
    run: SortRun,
    clock: C,
    pacer: P,
    sink: S,
    sequence: u64,
    round: u64,
    reports: VecDeque<RunReport>,
}

impl<C, P, S> std::fmt::Debug for SortCycle<C, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortCycle")
            .field("run", &self.run)
            .field("sequence", &self.sequence)
            .field("round", &self.round)
            .field("reports", &self.reports.len())
            .finish_non_exhaustive()
    }
}

impl<C: Clock, P: Pacer, S: SnapshotSink> SortCycle<C, P, S> {
    /// Build a cycle with freshly filled buffers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` does not validate.
    pub fn new(config: EngineConfig, clock: C, pacer: P, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ArrayState::new(config.primary_size, config.mini_size, config.seed);
        let run = SortRun {
            algorithm: None,
            target: BufferKind::Primary,
            round: 0,
            timer: RunTimer::new(clock.now()),
            stats: SortStats::default(),
        };
        Ok(Self {
            config,
            state,
            run,
            clock,
            pacer,
            sink,
            sequence: 0,
            round: 0,
            reports: VecDeque::with_capacity(REPORT_HISTORY),
        })
    }

    /// Drive the schedule until `max_rounds` is reached, or forever.
    ///
    /// # Errors
    ///
    /// Stops at the first sink failure.
    pub fn run(&mut self) -> Result<(), CycleError> {
        loop {
            if self
                .config
                .max_rounds
                .is_some_and(|max| self.round >= max)
            {
                return self.conclude();
            }
            self.run_round()?;
        }
    }

    /// One pass over the schedule.
    pub fn run_round(&mut self) -> Result<(), CycleError> {
        for index in 0..self.config.schedule.len() {
            let entry = self.config.schedule[index];
            self.run_entry(entry)?;
        }
        self.round += 1;
        Ok(())
    }

    /// Reset, then sort `entry.target` with `entry.algorithm` to completion.
    pub fn run_entry(&mut self, entry: ScheduleEntry) -> Result<SortStats, CycleError> {
        self.reset(entry.target)?;
        self.run.algorithm = Some(entry.algorithm);
        self.run.round = self.round;

        let target = entry.target;
        let len = self.state.get(target).len();
        let span = info_span!(
            "sort_run",
            algorithm = entry.algorithm.as_str(),
            target = target.as_str(),
            len
        );
        let _enter = span.enter();

        let mut sorter = entry.algorithm.sorter(len);
        while sorter.advance(self.state.get_mut(target).as_mut_slice()) == Progress::Snapshot {
            self.emit(Phase::Step)?;
        }
        self.run.stats = sorter.stats();
        debug_assert!(self.state.get(target).is_sorted());

        info!(
            comparisons = self.run.stats.comparisons,
            swaps = self.run.stats.swaps,
            snapshots = self.run.stats.snapshots,
            "sort finished"
        );
        Ok(self.run.stats)
    }

    /// Stop the timer and present the final state of the last run.
    ///
    /// Called by [`run`](Self::run) once `max_rounds` is reached.
    pub fn conclude(&mut self) -> Result<(), CycleError> {
        self.finish_run()?;
        Ok(())
    }

    fn reset(&mut self, target: BufferKind) -> Result<(), CycleError> {
        self.finish_run()?;

        let pause = self.config.pause();
        debug!(pause_ms = self.config.pause_ms, next = target.as_str(), "reset");
        if let Err(err) = self.pacer.pause(pause) {
            warn!(error = %err, "pause failed; continuing");
        }

        self.state.shuffle_all();
        self.run.timer.begin(&self.clock);
        self.run.target = target;
        self.run.stats = SortStats::default();
        Ok(())
    }

    fn finish_run(&mut self) -> Result<(), SinkError> {
        self.run.timer.mark_idle(&self.clock);
        self.emit(Phase::Completed)?;

        if let Some(algorithm) = self.run.algorithm {
            let report = RunReport {
                round: self.run.round,
                algorithm,
                target: self.run.target,
                len: self.state.get(self.run.target).len(),
                elapsed_secs: self.run.timer.elapsed_secs(),
                stats: self.run.stats,
            };
            info!(
                algorithm = algorithm.as_str(),
                target = report.target.as_str(),
                elapsed_secs = report.elapsed_secs,
                "run complete"
            );
            if self.reports.len() == REPORT_HISTORY {
                self.reports.pop_front();
            }
            self.reports.push_back(report);
        }
        Ok(())
    }

    fn emit(&mut self, phase: Phase) -> Result<(), SinkError> {
        let snapshot = Snapshot {
            values: self.state.get(self.run.target).as_slice(),
            buffer: self.run.target,
            algorithm: self.run.algorithm,
            elapsed: self.run.timer.elapsed(),
            sequence: self.sequence,
            phase,
        };
        trace!(sequence = self.sequence, ?phase, "snapshot");
        self.sequence += 1;
        self.sink.present(&snapshot)
    }
}

impl<C, P, S> SortCycle<C, P, S> {
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ArrayState {
        &self.state
    }

    /// The run currently on screen.
    #[must_use]
    pub fn current_run(&self) -> &SortRun {
        &self.run
    }

    /// Most recent finished runs, oldest first.
    pub fn reports(&self) -> impl Iterator<Item = &RunReport> {
        self.reports.iter()
    }

    /// Remove and return the buffered reports.
    pub fn drain_reports(&mut self) -> Vec<RunReport> {
        self.reports.drain(..).collect()
    }

    /// Snapshots presented so far.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Completed passes over the schedule.
    #[must_use]
    pub fn rounds_completed(&self) -> u64 {
        self.round
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::buffer::{is_permutation, is_sorted};
    use crate::clock::{ClockPacer, ManualClock};
    use crate::snapshot::RecordingSink;

    fn small_config() -> EngineConfig {
        EngineConfig {
            primary_size: 40,
            mini_size: 12,
            pause_ms: 500,
            seed: Some(11),
            max_rounds: Some(1),
            ..EngineConfig::default()
        }
    }

    fn cycle(config: EngineConfig) -> SortCycle<ManualClock, ClockPacer, RecordingSink> {
        let clock = ManualClock::new();
        let pacer = ClockPacer::new(clock.clone());
        SortCycle::new(config, clock, pacer, RecordingSink::new()).unwrap()
    }

    #[test]
    fn first_completed_snapshot_has_no_algorithm() {
        let mut cycle = cycle(small_config());
        cycle
            .run_entry(ScheduleEntry::new(SortAlgorithm::Bubble, BufferKind::Mini))
            .unwrap();
        let first = &cycle.sink().snapshots()[0];
        assert_eq!(first.phase, Phase::Completed);
        assert_eq!(first.algorithm, None);
        assert_eq!(first.sequence, 0);
        assert_eq!(cycle.reports().count(), 0);
    }

    #[test]
    fn one_round_runs_every_entry_and_concludes() {
        let mut cycle = cycle(small_config());
        cycle.run().unwrap();

        assert_eq!(cycle.rounds_completed(), 1);
        let reports: Vec<_> = cycle.reports().map(|r| (r.algorithm, r.target)).collect();
        let expected: Vec<_> = ScheduleEntry::default_schedule()
            .into_iter()
            .map(|e| (e.algorithm, e.target))
            .collect();
        assert_eq!(reports, expected);

        // One reset per entry plus the final conclude.
        assert_eq!(cycle.sink().completed().count(), 6);
        assert_eq!(cycle.pacer().pauses().len(), 5);

        for kind in [BufferKind::Primary, BufferKind::Mini] {
            assert!(is_permutation(cycle.state().get(kind).as_slice()));
        }
    }

    #[test]
    fn steps_show_target_buffer_and_zero_elapsed() {
        let mut cycle = cycle(small_config());
        cycle
            .run_entry(ScheduleEntry::new(SortAlgorithm::Insertion, BufferKind::Mini))
            .unwrap();
        let steps: Vec<_> = cycle
            .sink()
            .snapshots()
            .iter()
            .filter(|s| s.phase == Phase::Step)
            .collect();
        assert!(!steps.is_empty());
        for step in &steps {
            assert_eq!(step.buffer, BufferKind::Mini);
            assert_eq!(step.values.len(), 12);
            assert_eq!(step.elapsed, Duration::ZERO);
            assert_eq!(step.algorithm, Some(SortAlgorithm::Insertion));
        }
        assert!(is_sorted(&steps.last().unwrap().values));
    }

    #[test]
    fn sequence_numbers_are_contiguous() {
        let mut cycle = cycle(small_config());
        cycle.run().unwrap();
        for (i, snapshot) in cycle.sink().snapshots().iter().enumerate() {
            assert_eq!(snapshot.sequence, i as u64);
        }
        assert_eq!(cycle.sequence(), cycle.sink().snapshots().len() as u64);
    }

    #[test]
    fn report_history_is_bounded() {
        let config = EngineConfig {
            schedule: vec![ScheduleEntry::new(SortAlgorithm::Selection, BufferKind::Mini)],
            max_rounds: Some(REPORT_HISTORY as u64 + 5),
            pause_ms: 0,
            ..small_config()
        };
        let mut cycle = cycle(config);
        cycle.run().unwrap();
        assert_eq!(cycle.reports().count(), REPORT_HISTORY);
        assert_eq!(cycle.reports().next().unwrap().round, 5);

        let drained = cycle.drain_reports();
        assert_eq!(drained.len(), REPORT_HISTORY);
        assert_eq!(cycle.reports().count(), 0);
    }

    #[test]
    fn reports_serialize_to_json_lines() {
        let mut cycle = cycle(small_config());
        cycle.run().unwrap();
        let report = cycle.reports().last().unwrap();
        let line = serde_json::to_string(report).unwrap();
        assert!(line.starts_with('{'));
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["algorithm"], "insertion");
        assert_eq!(value["target"], "mini");
        assert_eq!(value["len"], 12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let clock = ManualClock::new();
        let pacer = ClockPacer::new(clock.clone());
        let config = EngineConfig {
            schedule: Vec::new(),
            ..EngineConfig::default()
        };
        let err = SortCycle::new(config, clock, pacer, RecordingSink::new()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySchedule));
    }
}
