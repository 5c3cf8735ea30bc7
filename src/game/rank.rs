//! Rank Calculation
//!
//! Orders players by score, highest first. The sort is stable over the
//! input order, which callers supply in ascending player id; equal scores
//! therefore rank the earlier connection ahead.

use std::fmt;

use crate::game::state::{Player, PlayerId};

/// A player's position in the score ordering, shown as `Rank: R/T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankLabel {
    /// 1-based position
    pub rank: usize,
    /// Number of ranked players
    pub total: usize,
}

impl RankLabel {
    /// Label used when there is nothing to rank against.
    pub const FALLBACK: RankLabel = RankLabel { rank: 1, total: 1 };
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank: {}/{}", self.rank, self.total)
    }
}

/// Stable descending sort by score.
fn sorted_by_score<'a>(players: impl IntoIterator<Item = &'a Player>) -> Vec<&'a Player> {
    let mut sorted: Vec<&Player> = players.into_iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted
}

/// Rank of `target` among `players`.
///
/// An absent target ranks last (`R = T`). An empty snapshot yields
/// [`RankLabel::FALLBACK`].
pub fn rank_of<'a>(target: PlayerId, players: impl IntoIterator<Item = &'a Player>) -> RankLabel {
    let sorted = sorted_by_score(players);
    let total = sorted.len();
    if total == 0 {
        return RankLabel::FALLBACK;
    }

    let rank = sorted
        .iter()
        .position(|p| p.id == target)
        .map(|idx| idx + 1)
        .unwrap_or(total);

    RankLabel { rank, total }
}
