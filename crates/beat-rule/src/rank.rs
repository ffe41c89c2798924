use serde::{Deserialize, Serialize};

/// Letter rank from final accuracy.
///
/// Ordered from lowest (D) to highest (SS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    D,
    C,
    B,
    A,
    S,
    SS,
}

impl Rank {
    /// Accuracy thresholds (percent), highest first.
    const THRESHOLDS: [(f64, Rank); 5] = [
        (95.0, Rank::SS),
        (90.0, Rank::S),
        (80.0, Rank::A),
        (70.0, Rank::B),
        (60.0, Rank::C),
    ];

    pub fn from_accuracy(accuracy_percent: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| accuracy_percent >= *min)
            .map(|&(_, rank)| rank)
            .unwrap_or(Rank::D)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SS => "SS",
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}
