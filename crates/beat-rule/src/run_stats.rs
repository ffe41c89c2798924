use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::judgment::Judgment;
use crate::rank::Rank;
use crate::score_rule::ScoreRule;

/// Cumulative score and judgment counts of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
}

impl RunStats {
    /// Count one judgment and return the points it earned.
    pub fn apply(&mut self, judgment: Judgment, rule: &ScoreRule) -> u64 {
        match judgment {
            Judgment::Perfect => self.perfect_count += 1,
            Judgment::Good => self.good_count += 1,
            Judgment::Miss => {
                self.miss_count += 1;
                self.combo = 0;
                return 0;
            }
        }
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        let points = rule.points(judgment, self.combo);
        self.score += points;
        points
    }

    pub fn judged_count(&self) -> u32 {
        self.perfect_count + self.good_count + self.miss_count
    }

    /// Perfect counts fully, Good half. 100 when nothing has been judged yet.
    pub fn accuracy_percent(&self) -> f64 {
        if self.judged_count() == 0 {
            return 100.0;
        }
        let weighted = self.perfect_count as f64 + 0.5 * self.good_count as f64;
        100.0 * weighted / self.judged_count() as f64
    }

    pub fn rank(&self) -> Rank {
        Rank::from_accuracy(self.accuracy_percent())
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            final_score: self.score,
            max_combo: self.max_combo,
            perfect_count: self.perfect_count,
            good_count: self.good_count,
            miss_count: self.miss_count,
            accuracy_percent: self.accuracy_percent(),
            rank: self.rank(),
        }
    }
}

/// Snapshot of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub final_score: u64,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub accuracy_percent: f64,
    pub rank: Rank,
}

impl ResultSummary {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize result summary")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write results: {}", path.display()))
    }
}
