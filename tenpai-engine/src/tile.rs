//! Tile representation.
//!
//! Provides the 34-type tile taxonomy used as the counting key everywhere in
//! the engine, the 136 physical tile instances (four copies per type, copy 0
//! of each five being the red five), and the compact `1m`/`5z`/`0p` display
//! names.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile types (0-33).
pub const NUM_TILE_TYPES: usize = 34;

/// Number of tiles per suited category (1-9).
pub const NUM_SUIT_TILES: usize = 9;

/// Total physical tiles in a standard mahjong set.
pub const NUM_TILES_136: usize = 136;

// Suit range starts (tile type indices).
pub const MANZU_START: u8 = 0;
pub const PINZU_START: u8 = 9;
pub const SOUZU_START: u8 = 18;
pub const JIHAI_START: u8 = 27;

// Named honor tile indices for readability.
pub const EAST: u8 = 27;
pub const SOUTH: u8 = 28;
pub const WEST: u8 = 29;
pub const NORTH: u8 = 30;
pub const HAKU: u8 = 31;
pub const HATSU: u8 = 32;
pub const CHUN: u8 = 33;

/// Red 5m instance. The 0th copy of tile type 4 (5m) is red.
pub const RED_MANZU_136: u8 = 16;
/// Red 5p instance. The 0th copy of tile type 13 (5p) is red.
pub const RED_PINZU_136: u8 = 52;
/// Red 5s instance. The 0th copy of tile type 22 (5s) is red.
pub const RED_SOUZU_136: u8 = 88;

/// Per-type histogram of a set of tiles.
pub type TileCounts = [u8; NUM_TILE_TYPES];

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// The four tile categories in Riichi Mahjong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Manzu = 0,
    Pinzu = 1,
    Souzu = 2,
    Jihai = 3,
}

impl Suit {
    /// Returns the starting tile type index for this suit.
    #[inline]
    pub const fn start(self) -> u8 {
        match self {
            Suit::Manzu => MANZU_START,
            Suit::Pinzu => PINZU_START,
            Suit::Souzu => SOUZU_START,
            Suit::Jihai => JIHAI_START,
        }
    }

    /// Notation letter (`m`, `p`, `s`, `z`).
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Suit::Manzu => 'm',
            Suit::Pinzu => 'p',
            Suit::Souzu => 's',
            Suit::Jihai => 'z',
        }
    }

    pub const fn from_letter(c: char) -> Option<Suit> {
        match c {
            'm' => Some(Suit::Manzu),
            'p' => Some(Suit::Pinzu),
            's' => Some(Suit::Souzu),
            'z' => Some(Suit::Jihai),
            _ => None,
        }
    }

    /// The three numeric suits, in encoding order.
    pub const NUMERIC: [Suit; 3] = [Suit::Manzu, Suit::Pinzu, Suit::Souzu];
}

// ---------------------------------------------------------------------------
// TileType newtype
// ---------------------------------------------------------------------------

/// A tile type in the range 0-33. Wraps a `u8` for type safety.
///
/// Serializes as its bare id; out-of-range ids fail to deserialize.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TileType(u8);

impl TryFrom<u8> for TileType {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        TileType::new(id).ok_or_else(|| format!("tile type {} out of range", id))
    }
}

impl From<TileType> for u8 {
    fn from(tile_type: TileType) -> u8 {
        tile_type.0
    }
}

/// Every tile type in encoding order.
pub const ALL_TILE_TYPES: [TileType; NUM_TILE_TYPES] = {
    let mut all = [TileType(0); NUM_TILE_TYPES];
    let mut i = 0;
    while i < NUM_TILE_TYPES {
        all[i] = TileType(i as u8);
        i += 1;
    }
    all
};

impl TileType {
    /// Creates a `TileType` if `id` is in range 0..34.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILE_TYPES as u8 {
            Some(TileType(id))
        } else {
            None
        }
    }

    /// Creates a `TileType` from a count-array index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 34`.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < NUM_TILE_TYPES, "tile type index out of range");
        TileType(index as u8)
    }

    /// Builds the tile of a suit from its 1-based rank.
    ///
    /// Honors use ranks 1-7 (east, south, west, north, haku, hatsu, chun).
    pub const fn from_suit_rank(suit: Suit, rank: u8) -> Option<Self> {
        let max = match suit {
            Suit::Jihai => 7,
            _ => 9,
        };
        if rank == 0 || rank > max {
            return None;
        }
        Some(TileType(suit.start() + rank - 1))
    }

    /// Raw numeric id (0-33).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Position of this type in a [`TileCounts`] array.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Which suit this tile belongs to.
    #[inline]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..9 => Suit::Manzu,
            9..18 => Suit::Pinzu,
            18..27 => Suit::Souzu,
            _ => Suit::Jihai,
        }
    }

    /// 1-based rank within the suit: 1-9 for numeric suits, 1-7 for honors.
    #[inline]
    pub const fn rank(self) -> u8 {
        (self.0 - self.suit().start()) + 1
    }

    /// 1-based number within the suit (1-9), or `None` for honor tiles.
    #[inline]
    pub const fn number(self) -> Option<u8> {
        if self.0 < JIHAI_START {
            Some((self.0 % NUM_SUIT_TILES as u8) + 1)
        } else {
            None
        }
    }

    /// True for 1 or 9 of any suit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        if self.0 >= JIHAI_START {
            return false;
        }
        let num = self.0 % NUM_SUIT_TILES as u8;
        num == 0 || num == 8
    }

    /// True for wind or dragon tiles (indices 27-33).
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.0 >= JIHAI_START
    }

    #[inline]
    pub const fn is_wind(self) -> bool {
        self.0 >= EAST && self.0 <= NORTH
    }

    #[inline]
    pub const fn is_dragon(self) -> bool {
        self.0 >= HAKU
    }

    /// True for terminals or honors (yaochuuhai).
    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_terminal() || self.is_honor()
    }

    /// True for 2-8 of a numeric suit.
    #[inline]
    pub const fn is_simple(self) -> bool {
        !self.is_terminal_or_honor()
    }

    /// True for manzu, pinzu, or souzu (not jihai).
    #[inline]
    pub const fn is_suited(self) -> bool {
        self.0 < JIHAI_START
    }

    /// True if a run may start on this tile (rank 1-7 of a numeric suit).
    #[inline]
    pub const fn can_start_run(self) -> bool {
        self.is_suited() && self.0 % NUM_SUIT_TILES as u8 <= 6
    }

    /// The tile `offset` ranks higher in the same numeric suit.
    pub const fn offset_in_suit(self, offset: i8) -> Option<TileType> {
        if !self.is_suited() {
            return None;
        }
        let num = (self.0 % NUM_SUIT_TILES as u8) as i8 + offset;
        if num < 0 || num >= NUM_SUIT_TILES as i8 {
            return None;
        }
        Some(TileType(self.suit().start() + num as u8))
    }

    /// The four physical instances of this type.
    pub const fn instances(self) -> [Tile; 4] {
        let base = self.0 * 4;
        [Tile(base), Tile(base + 1), Tile(base + 2), Tile(base + 3)]
    }
}

impl fmt::Debug for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileType({}={})", self.0, tile_type_name(self.0))
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(tile_type_name(self.0))
    }
}

// ---------------------------------------------------------------------------
// Tile instance newtype
// ---------------------------------------------------------------------------

/// One physical tile in the range 0-135. `id / 4` is the tile type and
/// `id % 4` the copy; copy 0 of each five is the red five.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    /// Creates a `Tile` if `id` is in range 0..136.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILES_136 as u8 {
            Some(Tile(id))
        } else {
            None
        }
    }

    /// Builds the instance for a given type and copy (0-3).
    ///
    /// # Panics
    ///
    /// Panics if `copy >= 4`.
    #[inline]
    pub const fn from_type(tile_type: TileType, copy: u8) -> Self {
        assert!(copy < 4, "tile copy out of range");
        Tile(tile_type.0 * 4 + copy)
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn tile_type(self) -> TileType {
        TileType(self.0 / 4)
    }

    #[inline]
    pub const fn copy(self) -> u8 {
        self.0 % 4
    }

    #[inline]
    pub const fn suit(self) -> Suit {
        self.tile_type().suit()
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.tile_type().rank()
    }

    /// Returns `true` if this is a red five.
    ///
    /// Convention: index 16 = red 5m, 52 = red 5p, 88 = red 5s.
    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self.0, RED_MANZU_136 | RED_PINZU_136 | RED_SOUZU_136)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({}={})", self.0, self)
    }
}

/// Red fives display with rank 0 (`0m`, `0p`, `0s`).
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_red() {
            write!(f, "0{}", self.suit().letter())
        } else {
            fmt::Display::fmt(&self.tile_type(), f)
        }
    }
}

// ---------------------------------------------------------------------------
// Count helpers
// ---------------------------------------------------------------------------

/// Histogram of a tile slice by type.
pub fn count_tiles(tiles: &[Tile]) -> TileCounts {
    let mut counts = [0u8; NUM_TILE_TYPES];
    for t in tiles {
        counts[t.tile_type().index()] += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

const TILE_NAMES: [&str; NUM_TILE_TYPES] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1p", "2p", "3p", "4p", "5p", "6p", "7p",
    "8p", "9p", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", "1z", "2z", "3z", "4z", "5z",
    "6z", "7z",
];

/// Returns the display name for a tile type (0-33).
/// Out-of-range values return "??".
#[inline]
pub fn tile_type_name(tile_type: u8) -> &'static str {
    TILE_NAMES.get(tile_type as usize).copied().unwrap_or("??")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
