//! Winning-hand decomposition.
//!
//! The search walks tile types from low to high and at each step consumes
//! the lowest remaining tile as a run, pair or triplet. Every choice has a
//! key `tile * 3 + kind` (run 0, pair 1, triplet 2) and keys are only ever
//! taken in non-decreasing order, so each multiset partition is emitted
//! exactly once.

use crate::family::TERMINALS_AND_HONORS;
use crate::tile::{TileCounts, TileType, NUM_TILE_TYPES};
use crate::types::{Meld, MeldType};

const KEY_RUN: usize = 0;
const KEY_PAIR: usize = 1;
const KEY_TRIPLET: usize = 2;

/// One interpretation of a complete hand: the pair followed by the sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decomposition {
    melds: Vec<Meld>,
}

impl Decomposition {
    /// # Panics
    ///
    /// Panics if `melds` does not start with a pair.
    pub fn new(melds: Vec<Meld>) -> Self {
        assert!(
            melds.first().is_some_and(Meld::is_pair),
            "decomposition must lead with its pair"
        );
        Self { melds }
    }

    pub fn pair(&self) -> TileType {
        self.melds[0].tile
    }

    /// Sets after the pair.
    pub fn sets(&self) -> &[Meld] {
        &self.melds[1..]
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Returns a copy with `declared` appended after the concealed sets.
    pub fn with_declared(&self, declared: &[Meld]) -> Self {
        let mut melds = self.melds.clone();
        melds.extend_from_slice(declared);
        Self { melds }
    }
}

/// Every distinct partition of `counts` into sets and exactly one pair.
///
/// `counts` must hold 3n + 2 tiles for some n; other totals yield nothing.
pub fn decompose(counts: &TileCounts) -> Vec<Decomposition> {
    let total: u32 = counts.iter().map(|&c| c as u32).sum();
    let mut found = Vec::new();
    if total % 3 != 2 {
        return found;
    }
    let mut sets = Vec::with_capacity(4);
    search(*counts, 0, None, &mut sets, &mut found);
    log::trace!("{} decompositions", found.len());
    found
}

fn search(
    counts: TileCounts,
    cursor: usize,
    pair: Option<TileType>,
    sets: &mut Vec<Meld>,
    found: &mut Vec<Decomposition>,
) {
    let Some(lowest) = counts.iter().position(|&c| c > 0) else {
        if let Some(pair) = pair {
            let mut melds = Vec::with_capacity(sets.len() + 1);
            melds.push(Meld::new(MeldType::Pair, pair));
            melds.extend_from_slice(sets);
            found.push(Decomposition { melds });
        }
        return;
    };
    let tile = TileType::from_index(lowest);
    let base = lowest * 3;

    if base + KEY_RUN >= cursor
        && tile.can_start_run()
        && counts[lowest + 1] > 0
        && counts[lowest + 2] > 0
    {
        let mut next = counts;
        next[lowest] -= 1;
        next[lowest + 1] -= 1;
        next[lowest + 2] -= 1;
        sets.push(Meld::new(MeldType::ClosedSequence, tile));
        search(next, base + KEY_RUN, pair, sets, found);
        sets.pop();
    }

    if base + KEY_PAIR >= cursor && pair.is_none() && counts[lowest] >= 2 {
        let mut next = counts;
        next[lowest] -= 2;
        search(next, base + KEY_PAIR, Some(tile), sets, found);
    }

    if base + KEY_TRIPLET >= cursor && counts[lowest] >= 3 {
        let mut next = counts;
        next[lowest] -= 3;
        sets.push(Meld::new(MeldType::ClosedTriplet, tile));
        search(next, base + KEY_TRIPLET, pair, sets, found);
        sets.pop();
    }
}

/// True if the counts form at least one standard decomposition.
pub fn is_standard_agari(counts: &TileCounts) -> bool {
    !decompose(counts).is_empty()
}

/// Seven distinct pairs.
pub fn is_chiitoitsu(counts: &TileCounts) -> bool {
    counts.iter().filter(|&&c| c == 2).count() == 7
        && counts.iter().all(|&c| c == 0 || c == 2)
}

/// All thirteen terminal/honor types with one of them doubled.
pub fn is_kokushi(counts: &TileCounts) -> bool {
    let total: u32 = counts.iter().map(|&c| c as u32).sum();
    total == 14
        && TERMINALS_AND_HONORS.covers(counts)
        && TERMINALS_AND_HONORS.iter().all(|t| counts[t.index()] >= 1)
}

/// Any winning shape: standard, seven pairs or thirteen orphans.
pub fn is_agari(counts: &TileCounts) -> bool {
    is_chiitoitsu(counts) || is_kokushi(counts) || is_standard_agari(counts)
}

pub(crate) fn empty_counts() -> TileCounts {
    [0u8; NUM_TILE_TYPES]
}
