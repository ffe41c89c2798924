use log::{debug, info};

use crate::judgment::Judgment;
use crate::run_stats::{ResultSummary, RunStats};
use crate::score_rule::ScoreRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregatorPhase {
    #[default]
    NotStarted,
    Running,
    Ended,
}

/// Effect of one accepted judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub judgment: Judgment,
    pub points: u64,
    pub combo: u32,
    pub combo_changed: bool,
}

/// Score/combo aggregation and end-of-song detection for one run.
///
/// Judgments only count while running. The run ends once playback has been
/// stopped with the spawn queue drained for `settle_delay` seconds, at which
/// point the result summary is produced exactly once.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    rule: ScoreRule,
    settle_delay: f64,
    phase: AggregatorPhase,
    stats: RunStats,
    stopped_for: f64,
    discarded: u32,
    summary: Option<ResultSummary>,
}

impl ScoreAggregator {
    pub fn new(rule: ScoreRule, settle_delay: f64) -> Self {
        Self {
            rule,
            settle_delay: settle_delay.max(0.0),
            phase: AggregatorPhase::NotStarted,
            stats: RunStats::default(),
            stopped_for: 0.0,
            discarded: 0,
            summary: None,
        }
    }

    /// Song-start signal. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.phase == AggregatorPhase::NotStarted {
            info!("Score aggregation started");
            self.phase = AggregatorPhase::Running;
        }
    }

    pub fn record(&mut self, judgment: Judgment) -> Option<ScoreUpdate> {
        match self.phase {
            AggregatorPhase::Running => {}
            AggregatorPhase::NotStarted => {
                if self.discarded == 0 {
                    debug!("Discarding {judgment:?} received before song start");
                }
                self.discarded += 1;
                return None;
            }
            AggregatorPhase::Ended => return None,
        }

        let previous_combo = self.stats.combo;
        let points = self.stats.apply(judgment, &self.rule);
        Some(ScoreUpdate {
            judgment,
            points,
            combo: self.stats.combo,
            combo_changed: self.stats.combo != previous_combo,
        })
    }

    /// Advance end-of-song detection. Returns the result summary on the
    /// update that ends the run and `None` on every other call.
    pub fn update(&mut self, dt: f64, is_playing: bool, all_dequeued: bool) -> Option<ResultSummary> {
        if self.phase != AggregatorPhase::Running {
            return None;
        }
        if is_playing || !all_dequeued {
            self.stopped_for = 0.0;
            return None;
        }

        self.stopped_for += dt.max(0.0);
        if self.stopped_for < self.settle_delay {
            return None;
        }

        self.phase = AggregatorPhase::Ended;
        let summary = self.stats.summary();
        info!(
            "Run ended: score {} / max combo {} / accuracy {:.2}% / rank {}",
            summary.final_score,
            summary.max_combo,
            summary.accuracy_percent,
            summary.rank.label()
        );
        self.summary = Some(summary.clone());
        Some(summary)
    }

    pub fn phase(&self) -> AggregatorPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == AggregatorPhase::Ended
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn rule(&self) -> &ScoreRule {
        &self.rule
    }

    /// Judgments dropped because they arrived before the song started.
    pub fn discarded_count(&self) -> u32 {
        self.discarded
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    fn running(settle_delay: f64) -> ScoreAggregator {
        let mut agg = ScoreAggregator::new(ScoreRule::default(), settle_delay);
        agg.start();
        agg
    }

    #[test]
    fn judgments_before_start_are_discarded() {
        let mut agg = ScoreAggregator::new(ScoreRule::default(), 1.0);
        assert_eq!(agg.record(Judgment::Perfect), None);
        assert_eq!(agg.record(Judgment::Miss), None);
        assert_eq!(agg.discarded_count(), 2);
        assert_eq!(*agg.stats(), RunStats::default());

        agg.start();
        assert!(agg.record(Judgment::Perfect).is_some());
        assert_eq!(agg.stats().perfect_count, 1);
    }

    #[test]
    fn start_is_idempotent() {
        let mut agg = running(1.0);
        agg.record(Judgment::Good);
        agg.start();
        assert_eq!(agg.phase(), AggregatorPhase::Running);
        assert_eq!(agg.stats().good_count, 1);
    }

    #[test]
    fn record_reports_combo_changes() {
        let mut agg = running(1.0);
        let first = agg.record(Judgment::Perfect).unwrap();
        assert_eq!(first.points, 100);
        assert_eq!(first.combo, 1);
        assert!(first.combo_changed);

        let miss = agg.record(Judgment::Miss).unwrap();
        assert_eq!(miss.combo, 0);
        assert!(miss.combo_changed);

        let second_miss = agg.record(Judgment::Miss).unwrap();
        assert!(!second_miss.combo_changed);
    }

    #[test]
    fn ends_only_after_settle_delay_while_stopped_and_drained() {
        let mut agg = running(1.0);
        agg.record(Judgment::Perfect);

        assert_eq!(agg.update(0.6, true, true), None);
        assert_eq!(agg.update(0.6, false, false), None);
        assert_eq!(agg.update(0.6, false, true), None);
        // playback resumed: the settle timer restarts
        assert_eq!(agg.update(0.1, true, true), None);
        assert_eq!(agg.update(0.6, false, true), None);
        let summary = agg.update(0.6, false, true).unwrap();

        assert_eq!(summary.final_score, 100);
        assert_eq!(summary.rank, Rank::SS);
        assert!(agg.is_ended());
    }

    #[test]
    fn summary_emitted_once() {
        let mut agg = running(0.0);
        agg.record(Judgment::Good);
        assert!(agg.update(0.016, false, true).is_some());
        for _ in 0..5 {
            assert_eq!(agg.update(0.016, false, true), None);
        }
        assert_eq!(agg.record(Judgment::Perfect), None);
        assert_eq!(agg.stats().perfect_count, 0);
        assert_eq!(agg.summary().map(|s| s.good_count), Some(1));
    }

    #[test]
    fn not_started_never_ends() {
        let mut agg = ScoreAggregator::new(ScoreRule::default(), 0.0);
        assert_eq!(agg.update(10.0, false, true), None);
        assert_eq!(agg.phase(), AggregatorPhase::NotStarted);
    }
}
