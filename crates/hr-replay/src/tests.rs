//! Integration tests for hr-replay.

use std::cell::Cell;
use std::time::{Duration, Instant};

use hr_core::{
    ClassifiedEvent, HaulUnit, LoadUnit, PlaybackSpeed, SimulationConfig, Status, TripRecord,
};
use hr_ingest::{IngestError, RawRow, RawTable, Schema};

use crate::{
    Aggregator, ContinueWhile, NoopObserver, Player, PlayerState, ReplayBuilder, ReplayError,
    ReplayObserver, RunOutcome, Snapshot, StopSignal, UnderloadAlert, Unpaced, replay_table,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn trip(i: usize, loader: &str, payload: f64) -> TripRecord {
    TripRecord {
        sequence_index: i,
        source_row:     i,
        haul_unit:      HaulUnit::from(format!("HT{i:02}").as_str()),
        load_unit:      LoadUnit::from(loader),
        payload,
    }
}

/// Build a sequence from `(loader, payload)` pairs.
fn sequence(spec: &[(&str, f64)]) -> Vec<TripRecord> {
    spec.iter().enumerate().map(|(i, &(l, p))| trip(i, l, p)).collect()
}

fn event(i: usize, loader: &str, payload: f64) -> ClassifiedEvent {
    ClassifiedEvent::new(trip(i, loader, payload), 90.0, 120.0)
}

fn instant_config() -> SimulationConfig {
    SimulationConfig { speed: PlaybackSpeed::Instant, ..Default::default() }
}

fn instant_player() -> Player {
    Player::new(instant_config()).unwrap()
}

/// A longer mixed shift: loaders cycle EX0..EX3, payloads sweep 70..134.
fn mixed_shift(n: usize) -> Vec<TripRecord> {
    (0..n)
        .map(|i| trip(i, &format!("EX{}", i % 4), 70.0 + ((i * 13) % 65) as f64))
        .collect()
}

fn example_table() -> RawTable {
    RawTable::new(["OID", "HaulModel", "HaulingEq", "LoadingEq", "PayloadAct"])
        .with_row(RawRow::new().with("OID", 2).with("HaulModel", "777D").with("HaulingEq", "A").with("LoadingEq", "L1").with("PayloadAct", 85.0))
        .with_row(RawRow::new().with("OID", 1).with("HaulModel", "777D").with("HaulingEq", "B").with("LoadingEq", "L2").with("PayloadAct", 95.0))
        .with_row(RawRow::new().with("OID", 3).with("HaulModel", "785").with("HaulingEq", "C").with("LoadingEq", "L1").with("PayloadAct", 130.0))
}

#[derive(Debug, PartialEq)]
enum Hook {
    Start(usize),
    Alert(usize),
    Snapshot(usize),
    End(PlayerState),
}

/// Observer that keeps everything it is handed.
#[derive(Default)]
struct Recorder {
    hooks:     Vec<Hook>,
    alerts:    Vec<UnderloadAlert>,
    snapshots: Vec<Snapshot>,
}

impl ReplayObserver for Recorder {
    fn on_run_start(&mut self, total: usize) {
        self.hooks.push(Hook::Start(total));
    }
    fn on_underload(&mut self, alert: &UnderloadAlert) {
        self.hooks.push(Hook::Alert(alert.sequence_index));
        self.alerts.push(alert.clone());
    }
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.hooks.push(Hook::Snapshot(snapshot.tick()));
        self.snapshots.push(snapshot.clone());
    }
    fn on_run_end(&mut self, outcome: &RunOutcome) {
        self.hooks.push(Hook::End(outcome.state()));
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod aggregator_tests {
    use super::*;

    #[test]
    fn totals_match_history_on_every_prefix() {
        let mut agg = Aggregator::new(50, true);
        for (k, record) in mixed_shift(120).into_iter().enumerate() {
            let snap = agg.apply(ClassifiedEvent::new(record, 90.0, 120.0));
            let history = agg.history();
            let under = history.iter().filter(|e| e.status == Status::Underload).count();
            let over = history.iter().filter(|e| e.status == Status::Overload).count();
            assert_eq!(snap.totals.total, k + 1);
            assert_eq!(snap.totals.under, under);
            assert_eq!(snap.totals.over, over);
            assert!(under + over <= k + 1);
            assert_eq!(snap.totals.normal(), k + 1 - under - over);
        }
    }

    #[test]
    fn leaderboard_counts_move_by_one_on_underload_only() {
        let mut agg = Aggregator::new(50, true);
        let loaders = ["EX0", "EX1", "EX2", "EX3"];
        let mut previous = [0_u64; 4];

        for record in mixed_shift(200) {
            let ev = ClassifiedEvent::new(record, 90.0, 120.0);
            let culprit = ev.is_underload().then(|| ev.record.load_unit.clone());
            let snap = agg.apply(ev);

            for (slot, name) in loaders.iter().enumerate() {
                let loader = LoadUnit::from(*name);
                let now = snap
                    .leaderboard
                    .iter()
                    .find(|e| e.loader == loader)
                    .map_or(0, |e| e.count);
                let expected_step = u64::from(culprit.as_ref() == Some(&loader));
                assert_eq!(now, previous[slot] + expected_step, "loader {name}");
                previous[slot] = now;
            }
        }
    }

    #[test]
    fn leaderboard_sorted_descending() {
        let mut agg = Aggregator::new(50, true);
        for record in mixed_shift(97) {
            agg.apply(ClassifiedEvent::new(record, 90.0, 120.0));
        }
        let counts: Vec<u64> = agg.leaderboard().iter().map(|e| e.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
    }

    #[test]
    fn ties_go_to_loader_that_reached_count_first() {
        let mut agg = Aggregator::new(50, true);
        let names = |s: &Snapshot| -> Vec<(String, u64)> {
            s.leaderboard.iter().map(|e| (e.loader.to_string(), e.count)).collect()
        };

        agg.apply(event(0, "L1", 80.0));
        let s = agg.apply(event(1, "L2", 80.0));
        assert_eq!(names(&s), vec![("L1".to_string(), 1), ("L2".to_string(), 1)]);

        let s = agg.apply(event(2, "L2", 80.0));
        assert_eq!(names(&s), vec![("L2".to_string(), 2), ("L1".to_string(), 1)]);

        // L1 catches up at 2, but L2 got there first.
        let s = agg.apply(event(3, "L1", 80.0));
        assert_eq!(names(&s), vec![("L2".to_string(), 2), ("L1".to_string(), 2)]);

        // Normal and overload trips leave the board alone.
        let s = agg.apply(event(4, "L3", 100.0));
        let s2 = agg.apply(event(5, "L3", 140.0));
        assert_eq!(names(&s), names(&s2));
        assert_eq!(agg.underloads_for(&LoadUnit::from("L3")), 0);
    }

    #[test]
    fn leaderboard_order_reproducible() {
        let run = || {
            let mut agg = Aggregator::new(50, true);
            for record in mixed_shift(150) {
                agg.apply(ClassifiedEvent::new(record, 90.0, 120.0));
            }
            agg.leaderboard()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn recent_window_keeps_newest_in_order() {
        let mut agg = Aggregator::new(3, true);
        let mut last = None;
        for i in 0..5 {
            last = Some(agg.apply(event(i, "L1", 100.0)));
        }
        let snap = last.unwrap();
        let seq: Vec<usize> = snap.recent.iter().map(|e| e.record.sequence_index).collect();
        assert_eq!(seq, vec![2, 3, 4]);
        assert_eq!(agg.history().len(), 5);

        let feed: Vec<usize> = snap.latest(2).map(|e| e.record.sequence_index).collect();
        assert_eq!(feed, vec![4, 3]);
        assert_eq!(snap.latest_event().unwrap().record.sequence_index, 4);
    }

    #[test]
    fn window_shorter_than_history_start() {
        let mut agg = Aggregator::new(50, true);
        let snap = agg.apply(event(0, "L1", 100.0));
        assert_eq!(snap.recent.len(), 1);
        assert_eq!(snap.tick(), 0);
    }

    #[test]
    fn leaderboard_flag_off_hides_board_but_keeps_counts() {
        let mut agg = Aggregator::new(50, false);
        let snap = agg.apply(event(0, "L1", 50.0));
        assert!(snap.leaderboard.is_empty());
        assert_eq!(snap.totals.under, 1);
        assert_eq!(agg.underloads_for(&LoadUnit::from("L1")), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut agg = Aggregator::new(50, true);
        agg.apply(event(0, "L1", 50.0));
        agg.apply(event(1, "L1", 150.0));
        agg.reset();
        assert!(agg.is_empty());
        assert_eq!(agg.totals(), crate::Totals::default());
        assert!(agg.leaderboard().is_empty());
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod player_tests {
    use super::*;

    #[test]
    fn completed_run_emits_one_snapshot_per_record() {
        let seq = mixed_shift(37);
        let mut player = instant_player();
        let mut rec = Recorder::default();
        let outcome = player.run(&seq, &mut rec, &Unpaced);

        assert!(outcome.is_completed());
        assert_eq!(player.state(), PlayerState::Completed);
        assert_eq!(rec.snapshots.len(), seq.len());
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.emitted, 37);
        assert_eq!(summary.expected, 37);
        assert_eq!(summary.totals.total, 37);
    }

    #[test]
    fn sequence_index_matches_history_position() {
        let seq = mixed_shift(60);
        let mut rec = Recorder::default();
        instant_player().run(&seq, &mut rec, &Unpaced);
        for (k, snap) in rec.snapshots.iter().enumerate() {
            assert_eq!(snap.tick(), k);
            assert_eq!(snap.latest_event().unwrap().record.sequence_index, k);
        }
    }

    #[test]
    fn one_alert_per_underload_before_its_snapshot() {
        let seq = sequence(&[("L1", 100.0), ("L2", 80.0), ("L1", 125.0), ("L2", 70.0)]);
        let mut rec = Recorder::default();
        instant_player().run(&seq, &mut rec, &Unpaced);

        assert_eq!(
            rec.hooks,
            vec![
                Hook::Start(4),
                Hook::Snapshot(0),
                Hook::Alert(1),
                Hook::Snapshot(1),
                Hook::Snapshot(2),
                Hook::Alert(3),
                Hook::Snapshot(3),
                Hook::End(PlayerState::Completed),
            ]
        );
        assert_eq!(rec.alerts[0].haul_unit.as_str(), "HT01");
        assert_eq!(rec.alerts[0].load_unit.as_str(), "L2");
        assert_eq!(rec.alerts[1].payload, 70.0);
    }

    #[test]
    fn cancel_after_k_ticks_leaves_prefix() {
        let seq = mixed_shift(20);
        let polls = Cell::new(0);
        let control = ContinueWhile(|| {
            polls.set(polls.get() + 1);
            polls.get() <= 6
        });

        let mut full = Recorder::default();
        instant_player().run(&seq, &mut full, &Unpaced);

        let mut rec = Recorder::default();
        let mut player = instant_player();
        let outcome = player.run(&seq, &mut rec, &control);

        assert_eq!(outcome.state(), PlayerState::Cancelled);
        assert_eq!(player.state(), PlayerState::Cancelled);
        assert_eq!(rec.snapshots.len(), 6);
        assert_eq!(rec.snapshots[..], full.snapshots[..6]);
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.emitted, 6);
        assert_eq!(summary.expected, 20);
        assert_eq!(summary.totals, rec.snapshots[5].totals);
    }

    #[test]
    fn stop_before_start_emits_nothing() {
        let stop = StopSignal::new();
        stop.stop();
        let mut rec = Recorder::default();
        let outcome = instant_player().run(&mixed_shift(5), &mut rec, &stop);
        assert_eq!(outcome.state(), PlayerState::Cancelled);
        assert!(rec.snapshots.is_empty());
        assert_eq!(rec.hooks, vec![Hook::Start(5), Hook::End(PlayerState::Cancelled)]);
    }

    #[test]
    fn stop_interrupts_a_long_pause() {
        let config = SimulationConfig { speed: PlaybackSpeed::Slow, ..Default::default() };
        let mut player = Player::new(config).unwrap();
        let stop = StopSignal::new();
        let remote = stop.clone();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            remote.stop();
        });

        let started = Instant::now();
        let mut rec = Recorder::default();
        let outcome = player.run(&mixed_shift(10), &mut rec, &stop);
        let elapsed = started.elapsed();
        handle.join().unwrap();

        assert_eq!(outcome.state(), PlayerState::Cancelled);
        assert_eq!(rec.snapshots.len(), 1);
        assert!(elapsed < Duration::from_millis(900), "took {elapsed:?}");
    }

    #[test]
    fn stop_signal_pause_waits_when_not_stopped() {
        use crate::PlaybackControl;
        let stop = StopSignal::new();
        let started = Instant::now();
        stop.pause(Duration::from_millis(30));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn run_takes_at_least_n_times_delay() {
        let config = SimulationConfig { speed: PlaybackSpeed::Turbo, ..Default::default() };
        let mut player = Player::new(config).unwrap();
        let started = Instant::now();
        let outcome = player.run(&mixed_shift(5), &mut NoopObserver, &StopSignal::new());
        assert!(outcome.is_completed());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn stop_on_last_tick_still_completes() {
        struct StopAtEnd {
            stop:  StopSignal,
            total: usize,
        }
        impl ReplayObserver for StopAtEnd {
            fn on_snapshot(&mut self, s: &Snapshot) {
                if s.totals.total == self.total {
                    self.stop.stop();
                }
            }
        }

        let stop = StopSignal::new();
        let mut obs = StopAtEnd { stop: stop.clone(), total: 8 };
        let outcome = instant_player().run(&mixed_shift(8), &mut obs, &stop);
        assert!(outcome.is_completed());
        assert!(stop.is_stopped());
    }

    #[test]
    fn empty_sequence_fails_without_snapshots() {
        let mut player = instant_player();
        let mut rec = Recorder::default();
        let outcome = player.run(&[], &mut rec, &Unpaced);
        assert!(matches!(outcome, RunOutcome::Failed(ReplayError::EmptySequence)));
        assert_eq!(player.state(), PlayerState::Failed);
        assert_eq!(rec.hooks, vec![Hook::End(PlayerState::Failed)]);
    }

    #[test]
    fn out_of_order_sequence_fails() {
        let mut seq = mixed_shift(4);
        seq.swap(1, 2);
        let mut rec = Recorder::default();
        let outcome = instant_player().run(&seq, &mut rec, &Unpaced);
        assert!(matches!(
            outcome.error(),
            Some(ReplayError::OutOfSequence { position: 1, found: 2 })
        ));
        assert!(rec.snapshots.is_empty());
    }

    #[test]
    fn non_finite_payload_fails() {
        let mut seq = mixed_shift(3);
        seq[2].payload = f64::NAN;
        let outcome = instant_player().run(&seq, &mut NoopObserver, &Unpaced);
        assert!(matches!(outcome.error(), Some(ReplayError::NonFinitePayload { position: 2, .. })));
    }

    #[test]
    fn inverted_thresholds_rejected_at_construction() {
        let config = SimulationConfig { min_payload: 130.0, max_payload: 90.0, ..instant_config() };
        assert!(matches!(Player::new(config), Err(ReplayError::Config(_))));
    }

    #[test]
    fn player_reuse_resets_state() {
        let seq = mixed_shift(25);
        let mut player = instant_player();
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        player.run(&seq, &mut first, &Unpaced);
        player.run(&seq, &mut second, &Unpaced);
        assert_eq!(first.snapshots, second.snapshots);
        assert_eq!(player.aggregator().len(), 25);
    }

    #[test]
    fn rejected_sequence_clears_previous_run() {
        let mut player = instant_player();
        assert!(player.run(&mixed_shift(10), &mut NoopObserver, &Unpaced).is_completed());
        assert_eq!(player.aggregator().len(), 10);

        let outcome = player.run(&[], &mut NoopObserver, &Unpaced);
        assert!(matches!(outcome, RunOutcome::Failed(ReplayError::EmptySequence)));
        assert!(player.aggregator().is_empty());
        assert_eq!(player.aggregator().totals(), crate::Totals::default());
        assert!(player.aggregator().leaderboard().is_empty());
    }

    #[test]
    fn leaderboard_flag_off_empties_summary_board() {
        let config = SimulationConfig { leaderboard: false, ..instant_config() };
        let outcome = Player::new(config).unwrap().run(
            &sequence(&[("L1", 10.0)]),
            &mut NoopObserver,
            &Unpaced,
        );
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.totals.under, 1);
        assert!(summary.leaderboard.is_empty());
    }

    #[test]
    fn tuple_observer_fans_out() {
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        instant_player().run(&mixed_shift(3), &mut (&mut a, &mut b), &Unpaced);
        assert_eq!(a.hooks, b.hooks);
        assert_eq!(a.snapshots.len(), 3);
    }
}

// ── Builder / end-to-end ──────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn worked_example_end_to_end() {
        let table = example_table();
        let mut replay = ReplayBuilder::new(instant_config(), &table).build().unwrap();
        assert_eq!(replay.records().len(), 2);
        assert_eq!(replay.report().filtered_out, 1);

        let mut rec = Recorder::default();
        let outcome = replay.run(&mut rec, &Unpaced);

        let statuses: Vec<Status> = rec
            .snapshots
            .iter()
            .map(|s| s.latest_event().unwrap().status)
            .collect();
        assert_eq!(statuses, vec![Status::Normal, Status::Underload]);

        let summary = outcome.summary().unwrap();
        assert_eq!((summary.totals.total, summary.totals.under, summary.totals.over), (2, 1, 0));
        assert_eq!(summary.leaderboard.len(), 1);
        assert_eq!(summary.leaderboard[0].loader.as_str(), "L1");
        assert_eq!(summary.leaderboard[0].count, 1);
        assert_eq!(rec.alerts[0].haul_unit.as_str(), "A");
    }

    #[test]
    fn missing_column_fails_before_any_tick() {
        let table = RawTable::new(["HaulModel", "PayloadAct"])
            .with_row(RawRow::new().with("HaulModel", "777").with("PayloadAct", 80.0));
        let mut rec = Recorder::default();
        let outcome = replay_table(&table, instant_config(), Schema::default(), &mut rec, &Unpaced);
        match outcome.error() {
            Some(ReplayError::Ingest(IngestError::MissingColumn { field })) => {
                assert_eq!(field, "HaulingEq")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(rec.hooks, vec![Hook::End(PlayerState::Failed)]);
    }

    #[test]
    fn no_matching_model_reports_filter() {
        let table = example_table();
        let config = SimulationConfig { model_filter: "994".into(), ..instant_config() };
        let outcome = replay_table(&table, config, Schema::default(), &mut NoopObserver, &Unpaced);
        let err = outcome.error().unwrap();
        assert_eq!(err.to_string(), "no matching records for model \"994\"");
    }

    #[test]
    fn inverted_thresholds_fail_the_run() {
        let table = example_table();
        let config = SimulationConfig { min_payload: 130.0, max_payload: 90.0, ..instant_config() };
        let mut rec = Recorder::default();
        let outcome = replay_table(&table, config, Schema::default(), &mut rec, &Unpaced);
        assert_eq!(outcome.state(), PlayerState::Failed);
        assert!(rec.snapshots.is_empty());
    }
}
