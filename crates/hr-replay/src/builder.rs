//! Fluent builder that turns a raw table into a ready-to-play [`Replay`].

use hr_core::{SimulationConfig, TripRecord};
use hr_ingest::{NormalizeReport, Normalizer, RawTable, Schema};

use crate::{PlaybackControl, Player, ReplayObserver, ReplayResult, RunOutcome};

/// Fluent builder for [`Replay`].
///
/// # Required inputs
///
/// - [`SimulationConfig`] — thresholds, model filter, speed, window
/// - [`RawTable`] — the loaded shift table
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default              |
/// |---------------|----------------------|
/// | `.schema(s)`  | `Schema::default()`  |
///
/// # Example
///
/// ```rust,ignore
/// let table = hr_ingest::load_table(Path::new("shift.csv"))?;
/// let mut replay = ReplayBuilder::new(config, &table).build()?;
/// let outcome = replay.run(&mut NoopObserver, &StopSignal::new());
/// ```
pub struct ReplayBuilder<'a> {
    config: SimulationConfig,
    table:  &'a RawTable,
    schema: Option<Schema>,
}

impl<'a> ReplayBuilder<'a> {
    pub fn new(config: SimulationConfig, table: &'a RawTable) -> Self {
        Self { config, table, schema: None }
    }

    /// Use non-default column names.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Validate the config, normalize the table, and return a [`Replay`].
    ///
    /// Fails on invalid thresholds, missing required columns, or an empty
    /// normalized sequence.
    pub fn build(self) -> ReplayResult<Replay> {
        let player = Player::new(self.config)?;
        let normalizer = Normalizer::new(self.schema.unwrap_or_default());
        let normalized = normalizer.normalize(self.table, player.config())?;
        Ok(Replay {
            player,
            records: normalized.records,
            report:  normalized.report,
        })
    }
}

/// A normalized record sequence bound to a [`Player`].
///
/// The sequence is fixed at build time; each [`run`][Self::run] replays it
/// from the start on a freshly reset aggregator.
pub struct Replay {
    player:  Player,
    records: Vec<TripRecord>,
    report:  NormalizeReport,
}

impl Replay {
    pub fn run<O, C>(&mut self, observer: &mut O, control: &C) -> RunOutcome
    where
        O: ReplayObserver + ?Sized,
        C: PlaybackControl + ?Sized,
    {
        self.player.run(&self.records, observer, control)
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

/// Build and run in one call.
///
/// Build failures become [`RunOutcome::Failed`]; the observer then sees only
/// `on_run_end`, never a snapshot.
pub fn replay_table<O, C>(
    table:    &RawTable,
    config:   SimulationConfig,
    schema:   Schema,
    observer: &mut O,
    control:  &C,
) -> RunOutcome
where
    O: ReplayObserver + ?Sized,
    C: PlaybackControl + ?Sized,
{
    match ReplayBuilder::new(config, table).schema(schema).build() {
        Ok(mut replay) => replay.run(observer, control),
        Err(e) => {
            log::error!("replay could not start: {e}");
            let outcome = RunOutcome::Failed(e);
            observer.on_run_end(&outcome);
            outcome
        }
    }
}
