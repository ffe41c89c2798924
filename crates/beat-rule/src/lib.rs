// Judgment windows, scoring rule, run statistics, rank, score aggregator

mod aggregator;
mod judgment;
mod rank;
mod run_stats;
mod score_rule;

pub use aggregator::{AggregatorPhase, ScoreAggregator, ScoreUpdate};
pub use judgment::{Judgment, JudgmentWindow, WindowError};
pub use rank::Rank;
pub use run_stats::{ResultSummary, RunStats};
pub use score_rule::ScoreRule;
