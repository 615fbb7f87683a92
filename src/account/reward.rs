//! Reward ladder restaurants climb by sharing meals.

use super::{Milestone, RewardsInfo};

const LADDER: [(u64, &str); 6] = [
    (500, "Featured Listing"),
    (1000, "Sustainability Badge"),
    (1500, "Premium Support"),
    (2000, "Marketing Kit"),
    (2500, "Exclusive Events"),
    (3000, "Carbon Credit Certificate"),
];

/// Milestones reached with `points`, and the progress towards the next one.
pub fn progress(points: u64) -> RewardsInfo {
    let milestones: Vec<_> = LADDER
        .iter()
        .map(|&(at, reward)| Milestone {
            points: at,
            reward: reward.to_owned(),
            achieved: points >= at,
        })
        .collect();
    let next = milestones.iter().find(|m| !m.achieved).cloned();
    // below the next threshold, so always under 100
    let progress_percent = next
        .as_ref()
        .map_or(100, |m| (points.saturating_mul(100) / m.points) as u8);

    RewardsInfo {
        points,
        milestones,
        next,
        progress_percent,
    }
}
