//! Fu calculation, base points and settlement.

use serde::{Deserialize, Serialize};

use crate::agari::Decomposition;
use crate::rule::ScoringRule;
use crate::tile::TileType;
use crate::types::{MeldType, WaitShape};
use crate::yaku::YakuContext;

pub const MANGAN_BASE: u32 = 2000;
pub const HANEMAN_BASE: u32 = 3000;
pub const BAIMAN_BASE: u32 = 4000;
pub const SANBAIMAN_BASE: u32 = 6000;
pub const YAKUMAN_BASE: u32 = 8000;

/// Limit bands of the base-point table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    Regular,
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    Yakuman,
}

impl ScoreTier {
    pub fn of(base_points: u32) -> Self {
        match base_points {
            b if b >= YAKUMAN_BASE => ScoreTier::Yakuman,
            b if b >= SANBAIMAN_BASE => ScoreTier::Sanbaiman,
            b if b >= BAIMAN_BASE => ScoreTier::Baiman,
            b if b >= HANEMAN_BASE => ScoreTier::Haneman,
            b if b >= MANGAN_BASE => ScoreTier::Mangan,
            _ => ScoreTier::Regular,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScoreTier::Regular => "",
            ScoreTier::Mangan => "Mangan",
            ScoreTier::Haneman => "Haneman",
            ScoreTier::Baiman => "Baiman",
            ScoreTier::Sanbaiman => "Sanbaiman",
            ScoreTier::Yakuman => "Yakuman",
        }
    }
}

/// Who pays what, each payment already rounded up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payments {
    /// The discarder pays everything.
    Ron { discarder: u32 },
    /// Dealer self-draw: all three opponents pay the same.
    DealerTsumo { each: u32 },
    /// Non-dealer self-draw: the dealer pays double.
    Tsumo { dealer: u32, non_dealer: u32 },
}

impl Payments {
    pub fn total(&self) -> u32 {
        match *self {
            Payments::Ron { discarder } => discarder,
            Payments::DealerTsumo { each } => each * 3,
            Payments::Tsumo { dealer, non_dealer } => dealer + non_dealer * 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub base_points: u32,
    pub total: u32,
    pub payments: Payments,
}

impl Score {
    /// Settles a base-point value.
    pub fn from_base(base_points: u32, is_dealer: bool, is_tsumo: bool) -> Self {
        let payments = match (is_dealer, is_tsumo) {
            (true, true) => Payments::DealerTsumo {
                each: round_up_100(base_points * 2),
            },
            (true, false) => Payments::Ron {
                discarder: round_up_100(base_points * 6),
            },
            (false, true) => Payments::Tsumo {
                dealer: round_up_100(base_points * 2),
                non_dealer: round_up_100(base_points),
            },
            (false, false) => Payments::Ron {
                discarder: round_up_100(base_points * 4),
            },
        };
        Score {
            base_points,
            total: payments.total(),
            payments,
        }
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::of(self.base_points)
    }
}

#[inline]
fn round_up_100(points: u32) -> u32 {
    points.div_ceil(100) * 100
}

/// Rounds raw fu up to the next multiple of 10.
#[inline]
pub fn round_up_fu(fu: u32) -> u32 {
    fu.div_ceil(10) * 10
}

/// True when the han/fu combination reaches the mangan cap or beyond.
pub fn is_mangan(han: u8, fu: u8) -> bool {
    calculate_base_points(han, fu) >= MANGAN_BASE
}

/// Base points: `fu * 2^(2 + han)` capped at mangan, then the limit bands.
pub fn calculate_base_points(han: u8, fu: u8) -> u32 {
    match han {
        0..=4 => {
            let base = fu as u32 * (1u32 << (2 + han));
            base.min(MANGAN_BASE)
        }
        5 => MANGAN_BASE,
        6..=7 => HANEMAN_BASE,
        8..=10 => BAIMAN_BASE,
        11..=12 => SANBAIMAN_BASE,
        _ => YAKUMAN_BASE,
    }
}

/// Base points with the rule's rounding options applied.
pub fn calculate_base_points_with_rule(han: u8, fu: u8, rule: &ScoringRule) -> u32 {
    if rule.kiriage_mangan && matches!((han, fu), (4, 30) | (3, 60)) {
        return MANGAN_BASE;
    }
    calculate_base_points(han, fu)
}

pub fn calculate_score(han: u8, fu: u8, is_dealer: bool, is_tsumo: bool) -> Score {
    Score::from_base(calculate_base_points(han, fu), is_dealer, is_tsumo)
}

/// Fu of one interpretation.
///
/// `win_group` indexes the meld of `decomposition` that the winning tile
/// completed; it must be a concealed group (pair or closed set).
pub fn calculate_fu(
    decomposition: &Decomposition,
    win_group: usize,
    win_tile: TileType,
    ctx: &YakuContext,
) -> u8 {
    let melds = decomposition.melds();
    let wait = WaitShape::of(&melds[win_group], win_tile);
    let is_tsumo = ctx.conditions.tsumo;

    let pair_fu = 2 * ctx.value_tile_count(decomposition.pair()) as u32;

    let mut set_fu = 0u32;
    for (i, meld) in melds.iter().enumerate().skip(1) {
        let fu = match meld.meld_type {
            MeldType::ClosedSequence | MeldType::Chi | MeldType::Pair => 0,
            // A triplet finished by someone else's discard scores as open.
            MeldType::ClosedTriplet if i == win_group && !is_tsumo => 2,
            MeldType::ClosedTriplet => 4,
            MeldType::Pon => 2,
            MeldType::Daiminkan | MeldType::Kakan => 8,
            MeldType::Ankan => 16,
        };
        set_fu += if meld.tile.is_terminal_or_honor() {
            fu * 2
        } else {
            fu
        };
    }

    let all_closed_runs = melds[1..]
        .iter()
        .all(|m| m.meld_type == MeldType::ClosedSequence);
    if ctx.is_menzen && all_closed_runs && pair_fu == 0 && wait == WaitShape::Ryanmen {
        return if is_tsumo { 20 } else { 30 };
    }

    let mut fu = 20 + pair_fu + set_fu + wait.fu() as u32;
    if ctx.is_menzen && !is_tsumo {
        fu += 10;
    }
    if is_tsumo {
        fu += 2;
    }
    if !ctx.is_menzen && fu == 20 {
        return 30;
    }
    round_up_fu(fu).min(u8::MAX as u32) as u8
}
