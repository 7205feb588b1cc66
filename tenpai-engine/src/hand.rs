//! One player's hand: concealed tiles, declared melds and the per-type count
//! cache, plus the call/draw/discard mutators and the evaluation entry points.
//!
//! Mutators check their preconditions up front and return
//! [`HandError::CallRejected`] without touching the hand when one fails.
//! Handing a mutator a physical tile that the hand already holds is a
//! caller bug and panics.

use std::fmt;

use crate::agari::{decompose, is_agari, is_standard_agari, Decomposition};
use crate::errors::{rejected, CallKind, HandError, HandResult};
use crate::parser::{parse_tiles, tiles_to_string};
use crate::rule::ScoringRule;
use crate::score::{calculate_base_points_with_rule, Score, YAKUMAN_BASE};
use crate::shanten::calc_shanten_from_counts;
use crate::tile::{count_tiles, Tile, TileCounts, TileType, NUM_TILES_136, NUM_TILE_TYPES};
use crate::types::{Conditions, Meld, MeldType, WinResult, Wind};
use crate::yaku::{calculate_yaku, Yaku, YakuContext, YakuResult};

/// Tiles held between turns, counting each kan as three.
pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    concealed: Vec<Tile>,
    melds: Vec<Meld>,
    /// Physical tiles locked into `melds`.
    meld_tiles: Vec<Tile>,
    counts: TileCounts,
    round_wind: Wind,
    seat_wind: Wind,
    is_menzen: bool,
    rule: ScoringRule,
}

impl Hand {
    pub fn new(tiles: &[Tile], round_wind: Wind, seat_wind: Wind) -> HandResult<Self> {
        if tiles.len() != HAND_SIZE {
            return Err(HandError::InvalidHand {
                message: format!("expected {} tiles, got {}", HAND_SIZE, tiles.len()),
            });
        }
        let mut seen = [false; NUM_TILES_136];
        for tile in tiles {
            if std::mem::replace(&mut seen[tile.id() as usize], true) {
                return Err(HandError::InvalidHand {
                    message: format!("tile {:?} appears twice", tile),
                });
            }
        }
        let mut concealed = tiles.to_vec();
        concealed.sort_unstable();
        Ok(Self {
            counts: count_tiles(&concealed),
            concealed,
            melds: Vec::new(),
            meld_tiles: Vec::new(),
            round_wind,
            seat_wind,
            is_menzen: true,
            rule: ScoringRule::default(),
        })
    }

    /// Builds a hand from raw instance ids (0-135).
    pub fn from_ids(ids: &[u32], round_wind: Wind, seat_wind: Wind) -> HandResult<Self> {
        let tiles = ids
            .iter()
            .map(|&id| {
                u8::try_from(id)
                    .ok()
                    .and_then(Tile::new)
                    .ok_or(HandError::InvalidTile { id })
            })
            .collect::<HandResult<Vec<_>>>()?;
        Self::new(&tiles, round_wind, seat_wind)
    }

    /// Builds a hand from notation such as `"123m456p789s1122z"`.
    pub fn from_text(text: &str, round_wind: Wind, seat_wind: Wind) -> HandResult<Self> {
        Self::new(&parse_tiles(text)?, round_wind, seat_wind)
    }

    pub fn with_rule(mut self, rule: ScoringRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn concealed(&self) -> &[Tile] {
        &self.concealed
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Per-type counts of the concealed tiles.
    pub fn counts(&self) -> &TileCounts {
        &self.counts
    }

    pub fn round_wind(&self) -> Wind {
        self.round_wind
    }

    pub fn seat_wind(&self) -> Wind {
        self.seat_wind
    }

    pub fn is_dealer(&self) -> bool {
        self.seat_wind == Wind::East
    }

    /// False once a chi, pon or open kan has been declared.
    pub fn is_menzen(&self) -> bool {
        self.is_menzen
    }

    pub fn rule(&self) -> &ScoringRule {
        &self.rule
    }

    /// Every physical tile the hand owns, concealed and declared, sorted.
    pub fn all_tiles(&self) -> Vec<Tile> {
        let mut all: Vec<Tile> = self
            .concealed
            .iter()
            .chain(self.meld_tiles.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all
    }

    pub fn all_counts(&self) -> TileCounts {
        let mut counts = self.counts;
        for tile in &self.meld_tiles {
            counts[tile.tile_type().index()] += 1;
        }
        counts
    }

    pub fn holds(&self, tile: Tile) -> bool {
        self.concealed.binary_search(&tile).is_ok()
    }

    // -----------------------------------------------------------------------
    // Call predicates
    // -----------------------------------------------------------------------

    /// Run starts through which `tile` could be claimed for a chi.
    pub fn chi_options(&self, tile: Tile) -> Vec<TileType> {
        let t = tile.tile_type();
        (-2i8..=0)
            .filter_map(|offset| t.offset_in_suit(offset))
            .filter(|start| start.can_start_run())
            .filter(|start| {
                (0..3)
                    .filter_map(|i| start.offset_in_suit(i))
                    .filter(|&member| member != t)
                    .all(|member| self.counts[member.index()] > 0)
            })
            .collect()
    }

    pub fn can_chi(&self, tile: Tile) -> bool {
        !self.chi_options(tile).is_empty()
    }

    pub fn can_pon(&self, tile: Tile) -> bool {
        self.counts[tile.tile_type().index()] >= 2
    }

    /// Open kan on a discard.
    pub fn can_kan(&self, tile: Tile) -> bool {
        self.counts[tile.tile_type().index()] >= 3
    }

    /// Concealed kan on a freshly drawn tile.
    pub fn can_ankan(&self, tile: Tile) -> bool {
        !self.holds(tile) && self.counts[tile.tile_type().index()] == 3
    }

    /// Upgrading a pon with a freshly drawn tile.
    pub fn can_kakan(&self, tile: Tile) -> bool {
        !self.holds(tile) && self.pon_index(tile.tile_type()).is_some()
    }

    fn pon_index(&self, tile_type: TileType) -> Option<usize> {
        self.melds
            .iter()
            .position(|m| m.meld_type == MeldType::Pon && m.tile == tile_type)
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    /// Claims `call` into the run starting at `run_start`, then discards.
    /// Partners are picked plain copies first; see [`Hand::call_chi_using`]
    /// to choose them.
    pub fn call_chi(&mut self, call: Tile, run_start: TileType, discard: Tile) -> HandResult<()> {
        self.assert_not_owned(call);
        self.check_chi_run(call, run_start)?;
        let mut partners = Vec::with_capacity(2);
        for member in run_partner_types(call, run_start) {
            match self.pick(member, 1, discard) {
                Some(mut picked) => partners.append(&mut picked),
                None => {
                    return rejected(
                        CallKind::Chi,
                        format!("{} is only held as the discard", member),
                    )
                }
            }
        }
        self.commit_call(MeldType::Chi, run_start, call, &partners, discard)
    }

    /// Like [`Hand::call_chi`] with the two partner tiles given, e.g. to
    /// meld the red five instead of a plain one.
    pub fn call_chi_using(
        &mut self,
        call: Tile,
        run_start: TileType,
        partners: [Tile; 2],
        discard: Tile,
    ) -> HandResult<()> {
        self.assert_not_owned(call);
        self.check_chi_run(call, run_start)?;
        let mut given: Vec<TileType> = partners.iter().map(|t| t.tile_type()).collect();
        given.sort_unstable();
        if given != run_partner_types(call, run_start) {
            return rejected(
                CallKind::Chi,
                format!("{:?} do not complete the run from {}", partners, run_start),
            );
        }
        self.check_partners(CallKind::Chi, &partners, discard)?;
        self.commit_call(MeldType::Chi, run_start, call, &partners, discard)
    }

    /// Partners are picked plain copies first; see [`Hand::call_pon_using`].
    pub fn call_pon(&mut self, call: Tile, discard: Tile) -> HandResult<()> {
        self.assert_not_owned(call);
        let t = call.tile_type();
        let Some(partners) = self.pick(t, 2, discard) else {
            return rejected(CallKind::Pon, format!("fewer than two {} held", t));
        };
        self.commit_call(MeldType::Pon, t, call, &partners, discard)
    }

    pub fn call_pon_using(&mut self, call: Tile, partners: [Tile; 2], discard: Tile) -> HandResult<()> {
        self.assert_not_owned(call);
        let t = call.tile_type();
        if partners.iter().any(|p| p.tile_type() != t) {
            return rejected(CallKind::Pon, format!("{:?} are not both {}", partners, t));
        }
        self.check_partners(CallKind::Pon, &partners, discard)?;
        self.commit_call(MeldType::Pon, t, call, &partners, discard)
    }

    fn check_chi_run(&self, call: Tile, run_start: TileType) -> HandResult<()> {
        if !self.chi_options(call).contains(&run_start) {
            return rejected(
                CallKind::Chi,
                format!("no run from {} can take {}", run_start, call),
            );
        }
        Ok(())
    }

    fn check_partners(&self, call: CallKind, partners: &[Tile; 2], discard: Tile) -> HandResult<()> {
        if partners[0] == partners[1] {
            return rejected(call, format!("{:?} given twice", partners[0]));
        }
        if let Some(p) = partners.iter().find(|&&p| p == discard || !self.holds(p)) {
            return rejected(call, format!("{:?} is not free to meld", p));
        }
        Ok(())
    }

    fn commit_call(
        &mut self,
        meld_type: MeldType,
        tile: TileType,
        call: Tile,
        partners: &[Tile],
        discard: Tile,
    ) -> HandResult<()> {
        let kind = if meld_type == MeldType::Chi { CallKind::Chi } else { CallKind::Pon };
        self.check_call_discard(kind, call, discard)?;

        self.remove_concealed(partners);
        self.remove_concealed(&[discard]);
        self.meld_tiles.push(call);
        self.meld_tiles.extend_from_slice(partners);
        self.melds.push(Meld::new(meld_type, tile));
        self.is_menzen = false;
        self.debug_check();
        Ok(())
    }

    /// Open kan on a discard. The replacement draw follows through
    /// [`Hand::draw_and_discard`].
    pub fn call_kan(&mut self, call: Tile) -> HandResult<()> {
        self.assert_not_owned(call);
        let t = call.tile_type();
        let Some(partners) = self.pick(t, 3, call) else {
            return rejected(CallKind::Daiminkan, format!("fewer than three {} held", t));
        };
        self.remove_concealed(&partners);
        self.meld_tiles.push(call);
        self.meld_tiles.extend_from_slice(&partners);
        self.melds.push(Meld::new(MeldType::Daiminkan, t));
        self.is_menzen = false;
        self.debug_check();
        Ok(())
    }

    /// Concealed kan completed by the tile just drawn.
    pub fn perform_ankan(&mut self, drawn: Tile) -> HandResult<()> {
        if !self.can_ankan(drawn) {
            return rejected(
                CallKind::Ankan,
                format!("{:?} is held or three {} are not", drawn, drawn.tile_type()),
            );
        }
        self.assert_not_owned(drawn);
        let t = drawn.tile_type();
        let partners = self.pick(t, 3, drawn).unwrap_or_default();
        self.remove_concealed(&partners);
        self.meld_tiles.push(drawn);
        self.meld_tiles.extend_from_slice(&partners);
        self.melds.push(Meld::new(MeldType::Ankan, t));
        self.debug_check();
        Ok(())
    }

    /// Adds the tile just drawn to an existing pon.
    pub fn perform_kakan(&mut self, drawn: Tile) -> HandResult<()> {
        if self.holds(drawn) {
            return rejected(CallKind::Kakan, format!("{:?} is already held", drawn));
        }
        let Some(idx) = self.pon_index(drawn.tile_type()) else {
            return rejected(
                CallKind::Kakan,
                format!("no pon of {} to extend", drawn.tile_type()),
            );
        };
        self.assert_not_owned(drawn);
        self.melds[idx].meld_type = MeldType::Kakan;
        self.meld_tiles.push(drawn);
        self.debug_check();
        Ok(())
    }

    /// Takes `draw` into the hand and lets go of `discard`, which may be
    /// the drawn tile itself.
    pub fn draw_and_discard(&mut self, draw: Tile, discard: Tile) -> HandResult<()> {
        self.assert_not_owned(draw);
        if discard != draw && !self.holds(discard) {
            return rejected(CallKind::Discard, format!("{:?} is not held", discard));
        }
        if discard != draw {
            self.remove_concealed(&[discard]);
            self.insert_concealed(draw);
        }
        self.debug_check();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------------

    /// Shanten of the current hand; 0 means tenpai.
    ///
    /// Counts shape only. A hand whose every wait is a type it already holds
    /// four of (e.g. `2222456788889m`, waiting on 2m alone) reports 0 while
    /// [`Hand::winning_tiles`] is empty.
    pub fn calc_shanten(&self) -> u8 {
        calc_shanten_from_counts(&self.counts, self.melds.len() as u8).max(0) as u8
    }

    pub fn is_winning_hand(&self, win: Tile) -> bool {
        self.completes(win.tile_type())
    }

    fn completes(&self, win: TileType) -> bool {
        let counts = self.counts_with(win);
        if self.melds.is_empty() {
            is_agari(&counts)
        } else {
            is_standard_agari(&counts)
        }
    }

    /// Every standard decomposition of the hand plus `win`, declared melds
    /// included after the concealed sets.
    pub fn parse_winning_hand(&self, win: Tile) -> Vec<Decomposition> {
        decompose(&self.counts_with(win.tile_type()))
            .iter()
            .map(|d| d.with_declared(&self.melds))
            .collect()
    }

    pub fn yaku_context(&self, conditions: &Conditions) -> YakuContext {
        YakuContext {
            is_menzen: self.is_menzen,
            conditions: *conditions,
            seat_wind: self.seat_wind,
            round_wind: self.round_wind,
            rule: self.rule,
        }
    }

    /// Full classification of the hand completed by `win`.
    pub fn yaku_result(&self, win: Tile, conditions: &Conditions) -> YakuResult {
        calculate_yaku(
            &self.counts_with(win.tile_type()),
            &self.melds,
            win.tile_type(),
            &self.yaku_context(conditions),
        )
    }

    /// Yaku of the best-scoring interpretation; empty if the hand is not
    /// complete or has no yaku.
    pub fn calc_yaku(&self, win: Tile, conditions: &Conditions) -> Vec<Yaku> {
        self.yaku_result(win, conditions).yaku
    }

    /// Yaku, han, fu and settlement of a win on `win`, or `None` when the
    /// hand is not complete or has no yaku.
    pub fn evaluate(&self, win: Tile, conditions: &Conditions) -> Option<WinResult> {
        let result = self.yaku_result(win, conditions);
        if !result.is_complete || result.yaku.is_empty() {
            return None;
        }
        let base_points = if result.yakuman_count > 0 {
            YAKUMAN_BASE * result.yakuman_count as u32
        } else {
            calculate_base_points_with_rule(result.han, result.fu, &self.rule)
        };
        let score = Score::from_base(base_points, self.is_dealer(), conditions.tsumo);
        Some(WinResult {
            yaku: result.yaku,
            han: result.han,
            fu: result.fu,
            yakuman_count: result.yakuman_count,
            decomposition: result.decomposition,
            wait: result.wait,
            score,
        })
    }

    /// Tile types that would complete the hand, skipping types whose four
    /// copies are all already in the hand.
    pub fn winning_tiles(&self) -> Vec<TileType> {
        let all = self.all_counts();
        (0..NUM_TILE_TYPES)
            .map(TileType::from_index)
            .filter(|t| all[t.index()] < 4 && self.completes(*t))
            .collect()
    }

    /// Shanten after drawing `draw` and discarding each distinct held type.
    pub fn discard_shanten(&self, draw: Tile) -> Vec<(TileType, u8)> {
        let counts = self.counts_with(draw.tile_type());
        let declared = self.melds.len() as u8;
        (0..NUM_TILE_TYPES)
            .filter(|&i| counts[i] > 0)
            .map(|i| {
                let mut after = counts;
                after[i] -= 1;
                let shanten = calc_shanten_from_counts(&after, declared).max(0) as u8;
                (TileType::from_index(i), shanten)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn counts_with(&self, extra: TileType) -> TileCounts {
        let mut counts = self.counts;
        counts[extra.index()] += 1;
        counts
    }

    /// Picks `n` concealed tiles of `tile_type`, never `exclude`, plain
    /// copies before the red five.
    fn pick(&self, tile_type: TileType, n: usize, exclude: Tile) -> Option<Vec<Tile>> {
        let mut candidates: Vec<Tile> = self
            .concealed
            .iter()
            .copied()
            .filter(|&t| t.tile_type() == tile_type && t != exclude)
            .collect();
        candidates.sort_by_key(|t| (t.is_red(), t.id()));
        if candidates.len() < n {
            return None;
        }
        candidates.truncate(n);
        Some(candidates)
    }

    fn check_call_discard(&self, call: CallKind, called: Tile, discard: Tile) -> HandResult<()> {
        if discard == called || !self.holds(discard) {
            return rejected(call, format!("{:?} is not held for the discard", discard));
        }
        if discard.tile_type() == called.tile_type() {
            return rejected(
                call,
                format!("cannot discard {} right after calling it", called.tile_type()),
            );
        }
        Ok(())
    }

    fn assert_not_owned(&self, tile: Tile) {
        assert!(
            !self.holds(tile) && !self.meld_tiles.contains(&tile),
            "tile {:?} is already in this hand",
            tile
        );
    }

    fn insert_concealed(&mut self, tile: Tile) {
        let at = self.concealed.partition_point(|&t| t < tile);
        self.concealed.insert(at, tile);
        self.counts[tile.tile_type().index()] += 1;
    }

    fn remove_concealed(&mut self, tiles: &[Tile]) {
        for tile in tiles {
            if let Ok(at) = self.concealed.binary_search(tile) {
                self.concealed.remove(at);
                self.counts[tile.tile_type().index()] -= 1;
            }
        }
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.counts, count_tiles(&self.concealed));
        debug_assert_eq!(self.concealed.len() + 3 * self.melds.len(), HAND_SIZE);
    }
}

/// Run members other than the called tile, in suit order.
fn run_partner_types(call: Tile, run_start: TileType) -> Vec<TileType> {
    (0..3)
        .filter_map(|i| run_start.offset_in_suit(i))
        .filter(|&member| member != call.tile_type())
        .collect()
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tiles_to_string(&self.concealed))?;
        for meld in &self.melds {
            let tiles: Vec<String> = meld.tile_types().iter().map(|t| t.to_string()).collect();
            write!(f, " {:?}[{}]", meld.meld_type, tiles.join(""))?;
        }
        Ok(())
    }
}
