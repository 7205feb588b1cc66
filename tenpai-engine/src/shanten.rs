//! Shanten (distance to tenpai).
//!
//! Raw values follow the usual convention: -1 is a complete hand, 0 is
//! tenpai. Declared melds are passed in as already-completed sets.

use crate::family::TERMINALS_AND_HONORS;
use crate::tile::{TileCounts, NUM_SUIT_TILES, NUM_TILE_TYPES};

#[derive(Default)]
struct Search {
    melds: i8,
    partials: i8,
    pair: bool,
    best: i8,
}

impl Search {
    fn score(&self) -> i8 {
        let usable = self.partials.min(4 - self.melds);
        2 * (4 - self.melds) - usable - self.pair as i8
    }

    fn run(&mut self, counts: &mut TileCounts, idx: usize) {
        let mut idx = idx;
        while idx < NUM_TILE_TYPES && counts[idx] == 0 {
            idx += 1;
        }
        if idx >= NUM_TILE_TYPES {
            self.best = self.best.min(self.score());
            return;
        }
        let rank = idx % NUM_SUIT_TILES;
        let suited = idx < 27;

        if counts[idx] >= 3 {
            counts[idx] -= 3;
            self.melds += 1;
            self.run(counts, idx);
            self.melds -= 1;
            counts[idx] += 3;
        }

        if suited && rank <= 6 && counts[idx + 1] > 0 && counts[idx + 2] > 0 {
            counts[idx] -= 1;
            counts[idx + 1] -= 1;
            counts[idx + 2] -= 1;
            self.melds += 1;
            self.run(counts, idx);
            self.melds -= 1;
            counts[idx] += 1;
            counts[idx + 1] += 1;
            counts[idx + 2] += 1;
        }

        if counts[idx] >= 2 {
            counts[idx] -= 2;
            if !self.pair {
                self.pair = true;
                self.run(counts, idx);
                self.pair = false;
            } else if self.melds + self.partials < 4 {
                self.partials += 1;
                self.run(counts, idx);
                self.partials -= 1;
            }
            counts[idx] += 2;
        }

        if self.melds + self.partials < 4 && suited {
            if rank <= 7 && counts[idx + 1] > 0 {
                counts[idx] -= 1;
                counts[idx + 1] -= 1;
                self.partials += 1;
                self.run(counts, idx);
                self.partials -= 1;
                counts[idx] += 1;
                counts[idx + 1] += 1;
            }
            if rank <= 6 && counts[idx + 2] > 0 {
                counts[idx] -= 1;
                counts[idx + 2] -= 1;
                self.partials += 1;
                self.run(counts, idx);
                self.partials -= 1;
                counts[idx] += 1;
                counts[idx + 2] += 1;
            }
        }

        // Leave every remaining copy of this tile isolated.
        let held = counts[idx];
        counts[idx] = 0;
        self.run(counts, idx + 1);
        counts[idx] = held;
    }
}

/// Standard-form shanten (four sets and a pair).
pub fn calc_normal(tiles: &TileCounts, declared_melds: u8) -> i8 {
    let mut counts = *tiles;
    let mut search = Search {
        melds: declared_melds as i8,
        best: i8::MAX,
        ..Search::default()
    };
    search.run(&mut counts, 0);
    search.best
}

/// Seven-pairs shanten.
pub fn calc_chitoi(tiles: &TileCounts) -> i8 {
    let pairs = tiles.iter().filter(|&&c| c >= 2).count() as i8;
    let singles = tiles.iter().filter(|&&c| c == 1).count() as i8;
    6 - pairs + (7 - pairs - singles).max(0)
}

/// Thirteen-orphans shanten.
pub fn calc_kokushi(tiles: &TileCounts) -> i8 {
    let mut kinds = 0i8;
    let mut has_pair = false;
    for t in TERMINALS_AND_HONORS.iter() {
        let c = tiles[t.index()];
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                has_pair = true;
            }
        }
    }
    13 - kinds - has_pair as i8
}

/// Minimum over the three archetypes. Seven pairs and thirteen orphans only
/// apply when nothing has been declared.
pub fn calc_shanten_from_counts(tehai: &TileCounts, declared_melds: u8) -> i8 {
    let shanten = calc_normal(tehai, declared_melds);
    if declared_melds > 0 || shanten < 0 {
        return shanten;
    }
    shanten.min(calc_chitoi(tehai)).min(calc_kokushi(tehai))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agari::{empty_counts, is_agari};

    fn counts_of(ids: &[u8]) -> TileCounts {
        let mut counts = empty_counts();
        for &id in ids {
            counts[id as usize] += 1;
        }
        counts
    }

    #[test]
    fn complete_hand_is_minus_one() {
        let counts = counts_of(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9, 10, 10]);
        assert_eq!(calc_normal(&counts, 0), -1);
        assert_eq!(calc_shanten_from_counts(&counts, 0), -1);
    }

    #[test]
    fn tenpai_is_zero() {
        // 123456789m 111p 2p waiting on 2p
        let counts = counts_of(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9, 10]);
        assert_eq!(calc_shanten_from_counts(&counts, 0), 0);
    }

    #[test]
    fn scattered_hand() {
        // 147m 258p 369s 1234z: no sets, no partials within reach
        let counts = counts_of(&[0, 3, 6, 10, 13, 16, 20, 23, 26, 27, 28, 29, 30]);
        assert_eq!(calc_normal(&counts, 0), 8);
        assert_eq!(calc_chitoi(&counts), 6);
        assert_eq!(calc_kokushi(&counts), 7);
        assert_eq!(calc_shanten_from_counts(&counts, 0), 6);
    }

    #[test]
    fn seven_pairs_tenpai() {
        // 1122334455m 6m 77z
        let counts = counts_of(&[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 33, 33]);
        assert_eq!(calc_chitoi(&counts), 0);
        assert_eq!(calc_shanten_from_counts(&counts, 0), 0);
    }

    #[test]
    fn seven_pairs_with_quad_needs_another_kind() {
        // 1111m 22m 33m 44m 55m 6m: the quad counts as one pair
        let counts = counts_of(&[0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5]);
        assert_eq!(calc_chitoi(&counts), 2);
    }

    #[test]
    fn thirteen_orphans_thirteen_wait() {
        let counts = counts_of(&[0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33]);
        assert_eq!(calc_kokushi(&counts), 0);
        assert_eq!(calc_shanten_from_counts(&counts, 0), 0);
    }

    #[test]
    fn declared_melds_count_as_sets() {
        // one pon declared: 123456789m 2p left
        let counts = counts_of(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 10]);
        assert_eq!(calc_shanten_from_counts(&counts, 1), 0);
        // pair only after four calls
        let counts = counts_of(&[27]);
        assert_eq!(calc_shanten_from_counts(&counts, 4), 0);
    }

    #[test]
    fn special_forms_ignored_after_calls() {
        // seven-pairs shaped 10 tiles with one declared meld
        let counts = counts_of(&[0, 0, 2, 2, 4, 4, 10, 10, 12, 12]);
        assert!(calc_shanten_from_counts(&counts, 1) >= calc_normal(&counts, 1));
        assert_eq!(calc_shanten_from_counts(&counts, 1), calc_normal(&counts, 1));
    }

    #[test]
    fn partial_sets_are_capped() {
        // 13m 57m 13p 57p 13s 57s 1z: six kanchan shapes but only four count
        let counts = counts_of(&[0, 2, 4, 6, 9, 11, 13, 15, 18, 20, 22, 24, 27]);
        assert_eq!(calc_normal(&counts, 0), 4);
    }

    #[test]
    fn every_winning_draw_comes_from_tenpai() {
        let hand = counts_of(&[1, 2, 3, 3, 4, 5, 11, 12, 13, 20, 20, 24, 25]);
        let mut saw_win = false;
        for t in 0..NUM_TILE_TYPES {
            if hand[t] >= 4 {
                continue;
            }
            let mut next = hand;
            next[t] += 1;
            if is_agari(&next) {
                saw_win = true;
                assert_eq!(calc_shanten_from_counts(&hand, 0), 0);
            }
        }
        assert!(saw_win);
    }
}
