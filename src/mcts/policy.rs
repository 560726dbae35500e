//! Tree policies for choosing among visited children.
//!
//! Policies see only per-child statistics, so the same policy serves a
//! node's private children and the shared root statistics of the
//! determinized search.

/// Visit count and accumulated reward of one child, from the perspective of
/// the player choosing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChildStats {
    pub visits: u32,
    pub reward: f64,
}

impl ChildStats {
    /// Average reward, 0 when unvisited.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / f64::from(self.visits)
        }
    }
}

/// Policy for selecting which child to descend into.
pub trait TreePolicy: Send + Sync {
    /// Index of the chosen child. Returns 0 for an empty slice.
    fn select(&self, parent_visits: u32, children: &[ChildStats]) -> usize;
}

/// UCB1: `mean + 2 * cp * sqrt(2 * ln(n_parent) / n_child)`.
///
/// Unvisited children score `+inf`. Ties go to the earliest child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ucb1 {
    pub cp: f64,
}

impl Default for Ucb1 {
    fn default() -> Self {
        Self {
            cp: std::f64::consts::FRAC_1_SQRT_2,
        }
    }
}

impl Ucb1 {
    #[must_use]
    pub fn new(cp: f64) -> Self {
        Self { cp }
    }

    /// UCB1 score of one child.
    #[must_use]
    pub fn score(&self, parent_visits: u32, child: &ChildStats) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let ln_parent = f64::from(parent_visits.max(1)).ln();
        let exploration = 2.0 * self.cp * (2.0 * ln_parent / f64::from(child.visits)).sqrt();
        child.mean() + exploration
    }
}

impl TreePolicy for Ucb1 {
    fn select(&self, parent_visits: u32, children: &[ChildStats]) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, child) in children.iter().enumerate() {
            let score = self.score(parent_visits, child);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        best
    }
}

/// Index of the child with the highest average reward. Ties go to the
/// earliest child; 0 for an empty slice.
#[must_use]
pub fn best_by_mean(children: &[ChildStats]) -> usize {
    let mut best = 0;
    let mut best_mean = f64::NEG_INFINITY;
    for (i, child) in children.iter().enumerate() {
        if child.mean() > best_mean {
            best = i;
            best_mean = child.mean();
        }
    }
    best
}
