// Lane assignment policies
//
// Each policy maps the n-th hit note (in time order) to a drum lane. Policies
// look at note order only, never at note timing. Obstacles are not part of the
// sequence; any obstacle still unassigned receives a uniform random lane so the
// resulting map is playable.

use beat_model::{BeatMap, LANE_COUNT, NoteKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::modifier::{PatternModifier, hit_note_indices};

const SPIRAL_ORDER: [i32; 4] = [0, 1, 3, 2];
const LEFT_RIGHT_ORDER: [i32; 4] = [0, 3, 1, 2];
const PAIRS: [[i32; 2]; 2] = [[0, 1], [2, 3]];

/// How hit notes are distributed over the four drums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanePolicy {
    /// Uniform random lane; optionally never the same lane twice in a row.
    Random { avoid_repeat: bool },
    /// Every lane used equally often (up to the remainder), in shuffled order.
    BalancedRandom,
    /// 0, 1, 2, 3, 0, 1, ...
    Sequential,
    /// 0, 1, 2, 3, 2, 1, 0, 1, ...
    Mirror,
    /// 0, 1, 3, 2, 0, 1, 3, 2, ...
    Spiral,
    /// 0, 3, 1, 2, 0, 3, 1, 2, ...
    LeftRight,
    /// Two notes on the {0,1} pair, two on the {2,3} pair, repeating.
    AlternatingPairs,
}

impl LanePolicy {
    pub const ALL: &[LanePolicy] = &[
        LanePolicy::Random {
            avoid_repeat: false,
        },
        LanePolicy::Random { avoid_repeat: true },
        LanePolicy::BalancedRandom,
        LanePolicy::Sequential,
        LanePolicy::Mirror,
        LanePolicy::Spiral,
        LanePolicy::LeftRight,
        LanePolicy::AlternatingPairs,
    ];

    /// File-name token for this policy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Random {
                avoid_repeat: false,
            } => "random",
            Self::Random { avoid_repeat: true } => "random_no_repeat",
            Self::BalancedRandom => "balanced_random",
            Self::Sequential => "sequential",
            Self::Mirror => "mirror",
            Self::Spiral => "spiral",
            Self::LeftRight => "left_right",
            Self::AlternatingPairs => "alternating_pairs",
        }
    }

    /// Inverse of [`LanePolicy::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Lane sequence for `count` hit notes.
    pub fn lanes<R: Rng>(self, count: usize, rng: &mut R) -> Vec<i32> {
        let lane_count = LANE_COUNT as i32;
        match self {
            Self::Random { avoid_repeat } => {
                let mut lanes = Vec::with_capacity(count);
                let mut prev: Option<i32> = None;
                for _ in 0..count {
                    let mut lane = rng.gen_range(0..lane_count);
                    if avoid_repeat {
                        while Some(lane) == prev {
                            lane = rng.gen_range(0..lane_count);
                        }
                    }
                    prev = Some(lane);
                    lanes.push(lane);
                }
                lanes
            }
            Self::BalancedRandom => {
                let per_lane = count / LANE_COUNT;
                let mut lanes: Vec<i32> = (0..lane_count)
                    .flat_map(|lane| std::iter::repeat(lane).take(per_lane))
                    .collect();
                while lanes.len() < count {
                    lanes.push(rng.gen_range(0..lane_count));
                }
                lanes.shuffle(rng);
                lanes
            }
            Self::Sequential => (0..count).map(|i| (i % LANE_COUNT) as i32).collect(),
            Self::Mirror => {
                let mut lanes = Vec::with_capacity(count);
                let mut lane = 0;
                let mut step = 1;
                for _ in 0..count {
                    lanes.push(lane);
                    if lane + step < 0 || lane + step >= lane_count {
                        step = -step;
                    }
                    lane += step;
                }
                lanes
            }
            Self::Spiral => cycle(&SPIRAL_ORDER, count),
            Self::LeftRight => cycle(&LEFT_RIGHT_ORDER, count),
            Self::AlternatingPairs => (0..count)
                .map(|i| {
                    let pair = PAIRS[(i / 2) % PAIRS.len()];
                    pair[rng.gen_range(0..pair.len())]
                })
                .collect(),
        }
    }
}

fn cycle(order: &[i32], count: usize) -> Vec<i32> {
    order.iter().copied().cycle().take(count).collect()
}

/// Applies one [`LanePolicy`] to every hit note of a map.
#[derive(Debug, Clone)]
pub struct LaneAssigner {
    pub policy: LanePolicy,
    seed: Option<u64>,
}

impl LaneAssigner {
    pub fn new(policy: LanePolicy) -> Self {
        Self { policy, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn assign(&self, map: &mut BeatMap) {
        let mut rng = self.rng();
        let hits = hit_note_indices(map);
        let lanes = self.policy.lanes(hits.len(), &mut rng);
        for (&idx, lane) in hits.iter().zip(lanes) {
            map.notes[idx].lane = lane;
        }

        let mut obstacles_assigned = 0;
        for note in map
            .notes
            .iter_mut()
            .filter(|n| n.kind == NoteKind::Obstacle && !n.is_assigned())
        {
            note.lane = rng.gen_range(0..LANE_COUNT as i32);
            obstacles_assigned += 1;
        }

        log::debug!(
            "assigned lanes with {} to {} hits and {} obstacles",
            self.policy.name(),
            hits.len(),
            obstacles_assigned
        );
    }
}

impl PatternModifier for LaneAssigner {
    fn modify(&mut self, map: &mut BeatMap) {
        self.assign(map);
    }

    fn pattern_name(&self) -> &'static str {
        self.policy.name()
    }
}
