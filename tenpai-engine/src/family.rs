//! Named tile families.
//!
//! Each family is a fixed set of tile types with an O(1) membership table,
//! built in `const` context and stored in a `static`.

use crate::tile::{Tile, TileType, NUM_TILE_TYPES};

/// A named, immutable set of tile types.
#[derive(Debug)]
pub struct TileFamily {
    name: &'static str,
    members: [bool; NUM_TILE_TYPES],
    len: u8,
}

impl TileFamily {
    const fn from_ids(name: &'static str, ids: &[u8]) -> Self {
        let mut members = [false; NUM_TILE_TYPES];
        let mut len = 0u8;
        let mut i = 0;
        while i < ids.len() {
            let id = ids[i] as usize;
            assert!(id < NUM_TILE_TYPES, "family member out of range");
            if !members[id] {
                members[id] = true;
                len += 1;
            }
            i += 1;
        }
        TileFamily { name, members, len }
    }

    const fn from_range(name: &'static str, start: u8, end: u8) -> Self {
        let mut members = [false; NUM_TILE_TYPES];
        let mut i = start as usize;
        while i < end as usize {
            members[i] = true;
            i += 1;
        }
        TileFamily {
            name,
            members,
            len: end - start,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn contains(&self, tile_type: TileType) -> bool {
        self.members[tile_type.index()]
    }

    #[inline]
    pub const fn contains_tile(&self, tile: Tile) -> bool {
        self.contains(tile.tile_type())
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = TileType> + '_ {
        (0..NUM_TILE_TYPES)
            .filter(move |&i| self.members[i])
            .map(TileType::from_index)
    }

    /// True if every type with a nonzero count belongs to the family.
    pub fn covers(&self, counts: &[u8; NUM_TILE_TYPES]) -> bool {
        counts
            .iter()
            .enumerate()
            .all(|(i, &c)| c == 0 || self.members[i])
    }
}

pub static ALL: TileFamily = TileFamily::from_range("all", 0, 34);
pub static MANZU: TileFamily = TileFamily::from_range("manzu", 0, 9);
pub static PINZU: TileFamily = TileFamily::from_range("pinzu", 9, 18);
pub static SOUZU: TileFamily = TileFamily::from_range("souzu", 18, 27);
pub static HONORS: TileFamily = TileFamily::from_range("honors", 27, 34);
pub static WINDS: TileFamily = TileFamily::from_range("winds", 27, 31);
pub static DRAGONS: TileFamily = TileFamily::from_range("dragons", 31, 34);

pub static TERMINALS: TileFamily = TileFamily::from_ids("terminals", &[0, 8, 9, 17, 18, 26]);

/// Terminals and honors (yaochuuhai): the thirteen orphans.
pub static TERMINALS_AND_HONORS: TileFamily = TileFamily::from_ids(
    "terminals and honors",
    &[0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33],
);

pub static SIMPLES: TileFamily = TileFamily::from_ids(
    "simples",
    &[
        1, 2, 3, 4, 5, 6, 7, 10, 11, 12, 13, 14, 15, 16, 19, 20, 21, 22, 23, 24, 25,
    ],
);

/// 2s 3s 4s 6s 8s and hatsu.
pub static GREEN: TileFamily = TileFamily::from_ids("green", &[19, 20, 21, 23, 25, 32]);

pub static FIVES: TileFamily = TileFamily::from_ids("fives", &[4, 13, 22]);

/// Ranks 1-7 of each numeric suit.
pub static RUN_STARTS: TileFamily = TileFamily::from_ids(
    "run starts",
    &[
        0, 1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 18, 19, 20, 21, 22, 23, 24,
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::ALL_TILE_TYPES;

    #[test]
    fn family_sizes() {
        assert_eq!(ALL.len(), 34);
        assert_eq!(TERMINALS_AND_HONORS.len(), 13);
        assert_eq!(TERMINALS.len(), 6);
        assert_eq!(HONORS.len(), 7);
        assert_eq!(WINDS.len(), 4);
        assert_eq!(DRAGONS.len(), 3);
        assert_eq!(GREEN.len(), 6);
        assert_eq!(FIVES.len(), 3);
        assert_eq!(RUN_STARTS.len(), 21);
        assert_eq!(SIMPLES.len(), 21);
    }

    #[test]
    fn families_agree_with_tile_predicates() {
        for t in ALL_TILE_TYPES {
            assert_eq!(TERMINALS.contains(t), t.is_terminal(), "{t}");
            assert_eq!(HONORS.contains(t), t.is_honor(), "{t}");
            assert_eq!(WINDS.contains(t), t.is_wind(), "{t}");
            assert_eq!(DRAGONS.contains(t), t.is_dragon(), "{t}");
            assert_eq!(TERMINALS_AND_HONORS.contains(t), t.is_terminal_or_honor(), "{t}");
            assert_eq!(SIMPLES.contains(t), t.is_simple(), "{t}");
            assert_eq!(RUN_STARTS.contains(t), t.can_start_run(), "{t}");
        }
    }

    #[test]
    fn green_tiles_are_souzu_and_hatsu() {
        let names: Vec<String> = GREEN.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["2s", "3s", "4s", "6s", "8s", "6z"]);
    }

    #[test]
    fn contains_tile_uses_type() {
        let red_five = Tile::new(16).unwrap();
        assert!(FIVES.contains_tile(red_five));
        assert!(!TERMINALS.contains_tile(red_five));
    }

    #[test]
    fn covers_counts() {
        let mut counts = [0u8; NUM_TILE_TYPES];
        counts[27] = 3;
        counts[31] = 2;
        assert!(HONORS.covers(&counts));
        counts[0] = 1;
        assert!(!HONORS.covers(&counts));
        assert!(TERMINALS_AND_HONORS.covers(&counts));
    }
}
