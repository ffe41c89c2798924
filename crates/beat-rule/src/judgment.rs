use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one resolved note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgment {
    Perfect,
    Good,
    Miss,
}

impl Judgment {
    pub fn is_combo_break(self) -> bool {
        self == Self::Miss
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error("judgment radii must satisfy 0 < perfect ({perfect}) < good ({good})")]
    InvalidRadii { perfect: f32, good: f32 },
}

/// Distance-based judgment window of one drum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgmentWindow {
    pub perfect_radius: f32,
    pub good_radius: f32,
}

impl Default for JudgmentWindow {
    fn default() -> Self {
        Self {
            perfect_radius: 0.3,
            good_radius: 0.6,
        }
    }
}

impl JudgmentWindow {
    pub fn new(perfect_radius: f32, good_radius: f32) -> Result<Self, WindowError> {
        let window = Self {
            perfect_radius,
            good_radius,
        };
        window.check()?;
        Ok(window)
    }

    pub fn check(&self) -> Result<(), WindowError> {
        let ok = self.perfect_radius > 0.0 && self.perfect_radius < self.good_radius;
        if ok && self.good_radius.is_finite() {
            Ok(())
        } else {
            Err(WindowError::InvalidRadii {
                perfect: self.perfect_radius,
                good: self.good_radius,
            })
        }
    }

    /// Whether `distance` lies inside the good radius (inclusive).
    pub fn contains(&self, distance: f32) -> bool {
        distance <= self.good_radius
    }

    /// Classify a strike at `distance` from the judge center. Both bounds are
    /// inclusive; anything beyond the good radius is a Miss.
    pub fn classify(&self, distance: f32) -> Judgment {
        if distance <= self.perfect_radius {
            Judgment::Perfect
        } else if distance <= self.good_radius {
            Judgment::Good
        } else {
            Judgment::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_distance() {
        let window = JudgmentWindow::new(0.3, 0.6).unwrap();
        assert_eq!(window.classify(0.0), Judgment::Perfect);
        assert_eq!(window.classify(0.25), Judgment::Perfect);
        assert_eq!(window.classify(0.3), Judgment::Perfect);
        assert_eq!(window.classify(0.45), Judgment::Good);
        assert_eq!(window.classify(0.6), Judgment::Good);
        assert_eq!(window.classify(0.8), Judgment::Miss);
    }

    #[test]
    fn contains_is_inclusive() {
        let window = JudgmentWindow::default();
        assert!(window.contains(0.6));
        assert!(!window.contains(0.61));
    }

    #[test]
    fn rejects_inverted_radii() {
        assert!(JudgmentWindow::new(0.6, 0.3).is_err());
        assert!(JudgmentWindow::new(0.0, 0.3).is_err());
        assert!(JudgmentWindow::new(0.3, 0.3).is_err());
        assert!(JudgmentWindow::new(0.3, f32::INFINITY).is_err());
    }

    #[test]
    fn only_miss_breaks_combo() {
        assert!(Judgment::Miss.is_combo_break());
        assert!(!Judgment::Good.is_combo_break());
        assert!(!Judgment::Perfect.is_combo_break());
    }
}
