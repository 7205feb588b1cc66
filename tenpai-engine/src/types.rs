use serde::{Deserialize, Serialize};

use crate::agari::Decomposition;
use crate::score::Score;
use crate::tile::{TileType, EAST};
use crate::yaku::Yaku;

/// Represents wind directions in mahjong, used for player seats and round wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl From<u8> for Wind {
    fn from(val: u8) -> Self {
        match val % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            3 => Wind::North,
            _ => unreachable!(),
        }
    }
}

impl Wind {
    /// The honor tile for this wind (1z-4z).
    pub const fn tile(self) -> TileType {
        TileType::from_index((EAST + self as u8) as usize)
    }

    /// Seat wind of `seat` when `dealer` sits East.
    pub fn seat_wind(seat: u8, dealer: u8) -> Wind {
        Wind::from((seat + 4 - dealer % 4) % 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldType {
    /// Concealed run, found by the decomposer.
    ClosedSequence,
    /// Concealed triplet, found by the decomposer.
    ClosedTriplet,
    Chi,
    Pon,
    Daiminkan,
    Ankan,
    Kakan,
    Pair,
}

impl MeldType {
    pub const fn is_sequence(self) -> bool {
        matches!(self, MeldType::ClosedSequence | MeldType::Chi)
    }

    pub const fn is_kan(self) -> bool {
        matches!(self, MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan)
    }

    /// Triplets and kans.
    pub const fn is_triplet_like(self) -> bool {
        matches!(self, MeldType::ClosedTriplet | MeldType::Pon) || self.is_kan()
    }

    /// True for groups that were never revealed by a call on a discard.
    pub const fn is_concealed(self) -> bool {
        matches!(
            self,
            MeldType::ClosedSequence | MeldType::ClosedTriplet | MeldType::Ankan | MeldType::Pair
        )
    }

    /// True for melds declared through a call (including concealed kans).
    pub const fn is_declared(self) -> bool {
        matches!(
            self,
            MeldType::Chi | MeldType::Pon | MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan
        )
    }

    pub const fn tile_count(self) -> usize {
        match self {
            MeldType::Pair => 2,
            MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan => 4,
            _ => 3,
        }
    }
}

/// A group of tiles identified by its kind and lowest tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tile: TileType,
}

impl Meld {
    /// # Panics
    ///
    /// Panics if a run starts on an honor or on rank 8-9.
    pub fn new(meld_type: MeldType, tile: TileType) -> Self {
        assert!(
            !meld_type.is_sequence() || tile.can_start_run(),
            "run cannot start on {}",
            tile
        );
        Self { meld_type, tile }
    }

    pub fn is_sequence(&self) -> bool {
        self.meld_type.is_sequence()
    }

    pub fn is_triplet_like(&self) -> bool {
        self.meld_type.is_triplet_like()
    }

    pub fn is_kan(&self) -> bool {
        self.meld_type.is_kan()
    }

    pub fn is_pair(&self) -> bool {
        self.meld_type == MeldType::Pair
    }

    /// Tile types covered, one entry per tile.
    pub fn tile_types(&self) -> Vec<TileType> {
        if self.is_sequence() {
            (0..3)
                .filter_map(|i| self.tile.offset_in_suit(i))
                .collect()
        } else {
            vec![self.tile; self.meld_type.tile_count()]
        }
    }

    /// True if any tile of the group is `tile_type`.
    pub fn contains(&self, tile_type: TileType) -> bool {
        if self.is_sequence() {
            tile_type.suit() == self.tile.suit()
                && tile_type.id() >= self.tile.id()
                && tile_type.id() <= self.tile.id() + 2
        } else {
            tile_type == self.tile
        }
    }

    /// True if any tile of the group is a terminal or honor.
    pub fn has_terminal_or_honor(&self) -> bool {
        if self.is_sequence() {
            self.tile.is_terminal() || self.tile.rank() == 7
        } else {
            self.tile.is_terminal_or_honor()
        }
    }
}

/// Situational flags of a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Conditions {
    pub tsumo: bool,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub rinshan: bool,
    pub chankan: bool,
    pub haitei: bool,
    pub houtei: bool,
    pub tenhou: bool,
    pub chihou: bool,
}

impl Conditions {
    pub fn tsumo() -> Self {
        Self {
            tsumo: true,
            ..Self::default()
        }
    }

    pub fn ron() -> Self {
        Self::default()
    }
}

/// Shape of the wait the winning tile completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitShape {
    /// Two-sided run wait.
    Ryanmen,
    /// Closed (middle) run wait.
    Kanchan,
    /// Edge run wait (12 waiting on 3, 89 waiting on 7).
    Penchan,
    /// Pair wait.
    Tanki,
    /// Dual-pair wait completing a triplet.
    Shanpon,
}

impl WaitShape {
    /// Classifies the wait given the concealed group the winning tile completed.
    pub fn of(group: &Meld, win_tile: TileType) -> WaitShape {
        match group.meld_type {
            MeldType::Pair => WaitShape::Tanki,
            MeldType::ClosedSequence => {
                let offset = win_tile.id() - group.tile.id();
                match (offset, group.tile.rank()) {
                    (1, _) => WaitShape::Kanchan,
                    (2, 1) | (0, 7) => WaitShape::Penchan,
                    _ => WaitShape::Ryanmen,
                }
            }
            _ => WaitShape::Shanpon,
        }
    }

    /// Single, closed and edge waits earn 2 fu.
    pub const fn fu(self) -> u8 {
        match self {
            WaitShape::Kanchan | WaitShape::Penchan | WaitShape::Tanki => 2,
            WaitShape::Ryanmen | WaitShape::Shanpon => 0,
        }
    }
}

/// Full evaluation of a winning hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinResult {
    pub yaku: Vec<Yaku>,
    pub han: u8,
    pub fu: u8,
    /// Sum of yakuman multipliers; 0 for regular hands.
    pub yakuman_count: u8,
    /// The interpretation the score was computed from. `None` for
    /// seven pairs and counts-only yakuman shapes such as thirteen orphans.
    pub decomposition: Option<Decomposition>,
    pub wait: Option<WaitShape>,
    pub score: Score,
}

impl WinResult {
    pub fn is_yakuman(&self) -> bool {
        self.yakuman_count > 0
    }
}
