use serde::{Deserialize, Serialize};

use crate::judgment::Judgment;

/// Points per judgment and the stepped combo multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ScoreRule {
    pub perfect_base: u32,
    pub good_base: u32,
    /// Multiplier increment per combo step
    pub combo_rate: f64,
    /// Combo length per multiplier step
    pub combo_step: u32,
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self {
            perfect_base: 100,
            good_base: 50,
            combo_rate: 0.1,
            combo_step: 10,
        }
    }
}

impl ScoreRule {
    /// Multiplier at `combo`: `1 + floor(combo / step) * rate`.
    pub fn multiplier(&self, combo: u32) -> f64 {
        let steps = combo / self.combo_step.max(1);
        1.0 + steps as f64 * self.combo_rate
    }

    /// Points for `judgment` given the combo *after* it was counted.
    pub fn points(&self, judgment: Judgment, combo: u32) -> u64 {
        let base = match judgment {
            Judgment::Perfect => self.perfect_base,
            Judgment::Good => self.good_base,
            Judgment::Miss => return 0,
        };
        (base as f64 * self.multiplier(combo)).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_steps_every_ten() {
        let rule = ScoreRule::default();
        assert_eq!(rule.multiplier(0), 1.0);
        assert_eq!(rule.multiplier(9), 1.0);
        assert!((rule.multiplier(10) - 1.1).abs() < 1e-12);
        assert!((rule.multiplier(25) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn points_per_judgment() {
        let rule = ScoreRule::default();
        assert_eq!(rule.points(Judgment::Perfect, 1), 100);
        assert_eq!(rule.points(Judgment::Good, 1), 50);
        assert_eq!(rule.points(Judgment::Perfect, 10), 110);
        assert_eq!(rule.points(Judgment::Good, 10), 55);
        assert_eq!(rule.points(Judgment::Miss, 10), 0);
    }

    #[test]
    fn zero_step_does_not_divide_by_zero() {
        let rule = ScoreRule {
            combo_step: 0,
            ..Default::default()
        };
        assert!((rule.multiplier(3) - 1.3).abs() < 1e-12);
    }
}
