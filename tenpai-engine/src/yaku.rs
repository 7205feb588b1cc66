//! Yaku classification.
//!
//! Classification runs in three tiers. Yakuman shapes are checked first and
//! end the search when any of them match. Seven pairs comes next. Only then
//! is every standard decomposition (and every group the winning tile could
//! have completed) scored, keeping the interpretation with the most han,
//! and the most fu among equals.

use serde::{Deserialize, Serialize};

use crate::agari::{decompose, is_chiitoitsu, is_kokushi, Decomposition};
use crate::family::{GREEN, HONORS, SIMPLES, TERMINALS, TERMINALS_AND_HONORS};
use crate::rule::ScoringRule;
use crate::score::calculate_fu;
use crate::tile::{Suit, TileCounts, TileType, HAKU, HATSU, CHUN, NUM_TILE_TYPES};
use crate::types::{Conditions, Meld, MeldType, WaitShape, Wind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Yaku {
    // 1 han
    MenzenTsumo,
    Riichi,
    Ippatsu,
    Chankan,
    Rinshan,
    Haitei,
    Houtei,
    Haku,
    Hatsu,
    Chun,
    SeatWind,
    RoundWind,
    Tanyao,
    Iipeikou,
    Pinfu,
    // 2 han
    DoubleRiichi,
    Chanta,
    Ittsu,
    Sanshoku,
    SanshokuDoukou,
    Sankantsu,
    Toitoi,
    Sanankou,
    Shousangen,
    Honroutou,
    Chiitoitsu,
    // 3 han and up
    Junchan,
    Honitsu,
    Ryanpeikou,
    Chinitsu,
    // yakuman
    Tenhou,
    Chihou,
    Daisangen,
    Suuankou,
    SuuankouTanki,
    Tsuuiisou,
    Ryuuiisou,
    Chinroutou,
    Kokushi,
    Kokushi13,
    Shousuushii,
    Daisuushii,
    Suukantsu,
    Chuuren,
    JunseiChuuren,
}

impl Yaku {
    pub const ALL: [Yaku; 45] = [
        Yaku::MenzenTsumo,
        Yaku::Riichi,
        Yaku::Ippatsu,
        Yaku::Chankan,
        Yaku::Rinshan,
        Yaku::Haitei,
        Yaku::Houtei,
        Yaku::Haku,
        Yaku::Hatsu,
        Yaku::Chun,
        Yaku::SeatWind,
        Yaku::RoundWind,
        Yaku::Tanyao,
        Yaku::Iipeikou,
        Yaku::Pinfu,
        Yaku::DoubleRiichi,
        Yaku::Chanta,
        Yaku::Ittsu,
        Yaku::Sanshoku,
        Yaku::SanshokuDoukou,
        Yaku::Sankantsu,
        Yaku::Toitoi,
        Yaku::Sanankou,
        Yaku::Shousangen,
        Yaku::Honroutou,
        Yaku::Chiitoitsu,
        Yaku::Junchan,
        Yaku::Honitsu,
        Yaku::Ryanpeikou,
        Yaku::Chinitsu,
        Yaku::Tenhou,
        Yaku::Chihou,
        Yaku::Daisangen,
        Yaku::Suuankou,
        Yaku::SuuankouTanki,
        Yaku::Tsuuiisou,
        Yaku::Ryuuiisou,
        Yaku::Chinroutou,
        Yaku::Kokushi,
        Yaku::Kokushi13,
        Yaku::Shousuushii,
        Yaku::Daisuushii,
        Yaku::Suukantsu,
        Yaku::Chuuren,
        Yaku::JunseiChuuren,
    ];

    /// Han on a concealed or open hand. Yakuman report 13 per single
    /// yakuman; see [`Yaku::yakuman_multiplier`] for doubles.
    pub fn han(self, is_menzen: bool) -> u8 {
        let open_penalty = u8::from(!is_menzen);
        match self {
            Yaku::MenzenTsumo
            | Yaku::Riichi
            | Yaku::Ippatsu
            | Yaku::Chankan
            | Yaku::Rinshan
            | Yaku::Haitei
            | Yaku::Houtei
            | Yaku::Haku
            | Yaku::Hatsu
            | Yaku::Chun
            | Yaku::SeatWind
            | Yaku::RoundWind
            | Yaku::Tanyao
            | Yaku::Iipeikou
            | Yaku::Pinfu => 1,
            Yaku::DoubleRiichi
            | Yaku::SanshokuDoukou
            | Yaku::Sankantsu
            | Yaku::Toitoi
            | Yaku::Sanankou
            | Yaku::Shousangen
            | Yaku::Honroutou
            | Yaku::Chiitoitsu => 2,
            Yaku::Chanta | Yaku::Ittsu | Yaku::Sanshoku => 2 - open_penalty,
            Yaku::Junchan | Yaku::Honitsu => 3 - open_penalty,
            Yaku::Ryanpeikou => 3,
            Yaku::Chinitsu => 6 - open_penalty,
            Yaku::Tenhou
            | Yaku::Chihou
            | Yaku::Daisangen
            | Yaku::Suuankou
            | Yaku::SuuankouTanki
            | Yaku::Tsuuiisou
            | Yaku::Ryuuiisou
            | Yaku::Chinroutou
            | Yaku::Kokushi
            | Yaku::Kokushi13
            | Yaku::Shousuushii
            | Yaku::Daisuushii
            | Yaku::Suukantsu
            | Yaku::Chuuren
            | Yaku::JunseiChuuren => 13,
        }
    }

    pub fn is_yakuman(self) -> bool {
        self >= Yaku::Tenhou
    }

    /// 0 for regular yaku, 1 for yakuman, 2 for double yakuman under `rule`.
    pub fn yakuman_multiplier(self, rule: &ScoringRule) -> u8 {
        let double = match self {
            Yaku::Kokushi13 => rule.is_kokushi_musou_13machi_double,
            Yaku::SuuankouTanki => rule.is_suuankou_tanki_double,
            Yaku::JunseiChuuren => rule.is_junsei_chuurenpoutou_double,
            Yaku::Daisuushii => rule.is_daisuushii_double,
            _ => false,
        };
        match (self.is_yakuman(), double) {
            (false, _) => 0,
            (true, false) => 1,
            (true, true) => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Yaku::MenzenTsumo => "Menzen Tsumo",
            Yaku::Riichi => "Riichi",
            Yaku::Ippatsu => "Ippatsu",
            Yaku::Chankan => "Chankan",
            Yaku::Rinshan => "Rinshan Kaihou",
            Yaku::Haitei => "Haitei Raoyue",
            Yaku::Houtei => "Houtei Raoyui",
            Yaku::Haku => "Yakuhai (Haku)",
            Yaku::Hatsu => "Yakuhai (Hatsu)",
            Yaku::Chun => "Yakuhai (Chun)",
            Yaku::SeatWind => "Yakuhai (Seat Wind)",
            Yaku::RoundWind => "Yakuhai (Round Wind)",
            Yaku::Tanyao => "Tanyao",
            Yaku::Iipeikou => "Iipeikou",
            Yaku::Pinfu => "Pinfu",
            Yaku::DoubleRiichi => "Double Riichi",
            Yaku::Chanta => "Chanta",
            Yaku::Ittsu => "Ittsu",
            Yaku::Sanshoku => "Sanshoku Doujun",
            Yaku::SanshokuDoukou => "Sanshoku Doukou",
            Yaku::Sankantsu => "Sankantsu",
            Yaku::Toitoi => "Toitoi",
            Yaku::Sanankou => "Sanankou",
            Yaku::Shousangen => "Shousangen",
            Yaku::Honroutou => "Honroutou",
            Yaku::Chiitoitsu => "Chiitoitsu",
            Yaku::Junchan => "Junchan",
            Yaku::Honitsu => "Honitsu",
            Yaku::Ryanpeikou => "Ryanpeikou",
            Yaku::Chinitsu => "Chinitsu",
            Yaku::Tenhou => "Tenhou",
            Yaku::Chihou => "Chihou",
            Yaku::Daisangen => "Daisangen",
            Yaku::Suuankou => "Suuankou",
            Yaku::SuuankouTanki => "Suuankou Tanki",
            Yaku::Tsuuiisou => "Tsuuiisou",
            Yaku::Ryuuiisou => "Ryuuiisou",
            Yaku::Chinroutou => "Chinroutou",
            Yaku::Kokushi => "Kokushi Musou",
            Yaku::Kokushi13 => "Kokushi Musou Juusanmen",
            Yaku::Shousuushii => "Shousuushii",
            Yaku::Daisuushii => "Daisuushii",
            Yaku::Suukantsu => "Suukantsu",
            Yaku::Chuuren => "Chuuren Poutou",
            Yaku::JunseiChuuren => "Junsei Chuuren Poutou",
        }
    }

    /// Numeric id in the Mahjong Soul numbering.
    pub fn id(self) -> u32 {
        match self {
            Yaku::MenzenTsumo => 1,
            Yaku::Riichi => 2,
            Yaku::Chankan => 3,
            Yaku::Rinshan => 4,
            Yaku::Haitei => 5,
            Yaku::Houtei => 6,
            Yaku::Haku => 7,
            Yaku::Hatsu => 8,
            Yaku::Chun => 9,
            Yaku::SeatWind => 10,
            Yaku::RoundWind => 11,
            Yaku::Tanyao => 12,
            Yaku::Iipeikou => 13,
            Yaku::Pinfu => 14,
            Yaku::Chanta => 15,
            Yaku::Ittsu => 16,
            Yaku::Sanshoku => 17,
            Yaku::DoubleRiichi => 18,
            Yaku::SanshokuDoukou => 19,
            Yaku::Sankantsu => 20,
            Yaku::Toitoi => 21,
            Yaku::Sanankou => 22,
            Yaku::Shousangen => 23,
            Yaku::Honroutou => 24,
            Yaku::Chiitoitsu => 25,
            Yaku::Junchan => 26,
            Yaku::Honitsu => 27,
            Yaku::Ryanpeikou => 28,
            Yaku::Chinitsu => 29,
            Yaku::Ippatsu => 30,
            Yaku::Tenhou => 35,
            Yaku::Chihou => 36,
            Yaku::Daisangen => 37,
            Yaku::Suuankou => 38,
            Yaku::Tsuuiisou => 39,
            Yaku::Ryuuiisou => 40,
            Yaku::Chinroutou => 41,
            Yaku::Kokushi => 42,
            Yaku::Shousuushii => 43,
            Yaku::Suukantsu => 44,
            Yaku::Chuuren => 45,
            Yaku::JunseiChuuren => 47,
            Yaku::SuuankouTanki => 48,
            Yaku::Kokushi13 => 49,
            Yaku::Daisuushii => 50,
        }
    }

    pub fn from_id(id: u32) -> Option<Yaku> {
        Yaku::ALL.iter().copied().find(|y| y.id() == id)
    }
}

/// Everything about a win that is not the tiles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YakuContext {
    pub is_menzen: bool,
    pub conditions: Conditions,
    pub seat_wind: Wind,
    pub round_wind: Wind,
    pub rule: ScoringRule,
}

impl YakuContext {
    pub fn is_dealer(&self) -> bool {
        self.seat_wind == Wind::East
    }

    /// Number of value roles a tile plays: dragons 1, seat wind 1, round
    /// wind 1 (a double wind counts twice).
    pub fn value_tile_count(&self, tile: TileType) -> u8 {
        if tile.is_dragon() {
            return 1;
        }
        u8::from(tile == self.seat_wind.tile()) + u8::from(tile == self.round_wind.tile())
    }
}

/// The best interpretation found for a hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YakuResult {
    pub yaku: Vec<Yaku>,
    pub han: u8,
    pub fu: u8,
    pub yakuman_count: u8,
    pub decomposition: Option<Decomposition>,
    pub wait: Option<WaitShape>,
    /// Whether the tiles form a winning shape at all.
    pub is_complete: bool,
}

impl YakuResult {
    fn regular(yaku: Vec<Yaku>, ctx: &YakuContext, fu: u8) -> Self {
        let han = yaku.iter().map(|y| y.han(ctx.is_menzen)).sum();
        Self {
            yaku,
            han,
            fu,
            is_complete: true,
            ..Self::default()
        }
    }

    fn yakuman(yaku: Vec<Yaku>, rule: &ScoringRule) -> Self {
        let yakuman_count: u8 = yaku.iter().map(|y| y.yakuman_multiplier(rule)).sum();
        Self {
            yaku,
            han: 13 * yakuman_count,
            yakuman_count,
            is_complete: true,
            ..Self::default()
        }
    }
}

/// Classifies a hand.
///
/// `concealed` holds the concealed tiles including the winning tile;
/// `declared` the called melds and concealed kans.
///
/// Seven pairs scores alongside the situational yaku and the yaku read off
/// the tile set alone (all simples, all terminals and honors, flushes), so
/// `1122334455667m` + 7m is chiitoitsu plus chinitsu for 8 han.
pub fn calculate_yaku(
    concealed: &TileCounts,
    declared: &[Meld],
    win_tile: TileType,
    ctx: &YakuContext,
) -> YakuResult {
    let decompositions = decompose(concealed);
    let special_shapes = declared.is_empty() && (is_chiitoitsu(concealed) || is_kokushi(concealed));
    if decompositions.is_empty() && !special_shapes {
        return YakuResult::default();
    }

    let all = all_counts(concealed, declared);

    let yakuman = yakuman_tier(concealed, &all, declared, win_tile, ctx);
    if !yakuman.is_empty() {
        log::debug!("yakuman: {:?}", yakuman);
        return YakuResult::yakuman(yakuman, &ctx.rule);
    }

    if declared.is_empty() && is_chiitoitsu(concealed) {
        let mut yaku = situational(ctx);
        yaku.push(Yaku::Chiitoitsu);
        yaku.extend(tile_set_yaku(&all, ctx));
        return YakuResult::regular(yaku, ctx, ctx.rule.chiitoitsu_fu);
    }

    let mut best: Option<YakuResult> = None;
    for concealed_part in &decompositions {
        let full = concealed_part.with_declared(declared);
        let mut seen: Vec<Meld> = Vec::new();
        for (group, meld) in concealed_part.melds().iter().enumerate() {
            if !meld.contains(win_tile) || seen.contains(meld) {
                continue;
            }
            seen.push(*meld);

            let yaku = standard_yaku(&full, group, win_tile, &all, ctx);
            let fu = calculate_fu(&full, group, win_tile, ctx);
            let mut candidate = YakuResult::regular(yaku, ctx, fu);
            if best
                .as_ref()
                .is_some_and(|b| (b.han, b.fu) >= (candidate.han, candidate.fu))
            {
                continue;
            }
            candidate.decomposition = Some(full.clone());
            candidate.wait = Some(WaitShape::of(meld, win_tile));
            best = Some(candidate);
        }
    }

    let best = best.unwrap_or_default();
    log::debug!(
        "selected {:?} ({} han {} fu) among {} decompositions",
        best.yaku,
        best.han,
        best.fu,
        decompositions.len()
    );
    best
}

fn all_counts(concealed: &TileCounts, declared: &[Meld]) -> TileCounts {
    let mut all = *concealed;
    for meld in declared {
        for t in meld.tile_types() {
            all[t.index()] += 1;
        }
    }
    all
}

fn situational(ctx: &YakuContext) -> Vec<Yaku> {
    let c = &ctx.conditions;
    let mut yaku = Vec::new();
    if c.double_riichi {
        yaku.push(Yaku::DoubleRiichi);
    } else if c.riichi {
        yaku.push(Yaku::Riichi);
    }
    if c.ippatsu {
        yaku.push(Yaku::Ippatsu);
    }
    if ctx.is_menzen && c.tsumo {
        yaku.push(Yaku::MenzenTsumo);
    }
    if c.rinshan {
        yaku.push(Yaku::Rinshan);
    }
    if c.chankan {
        yaku.push(Yaku::Chankan);
    }
    if c.haitei {
        yaku.push(Yaku::Haitei);
    }
    if c.houtei {
        yaku.push(Yaku::Houtei);
    }
    yaku
}

/// Yaku that depend only on which tiles are present.
fn tile_set_yaku(all: &TileCounts, ctx: &YakuContext) -> Vec<Yaku> {
    let mut yaku = Vec::new();
    if SIMPLES.covers(all) && (ctx.is_menzen || ctx.rule.open_tanyao) {
        yaku.push(Yaku::Tanyao);
    }
    if TERMINALS_AND_HONORS.covers(all) {
        yaku.push(Yaku::Honroutou);
    }
    match flush_suit(all) {
        Some((_, true)) => yaku.push(Yaku::Honitsu),
        Some((_, false)) => yaku.push(Yaku::Chinitsu),
        None => {}
    }
    yaku
}

/// The single numeric suit of a hand and whether honors are mixed in.
fn flush_suit(all: &TileCounts) -> Option<(Suit, bool)> {
    let mut suit = None;
    for &s in &Suit::NUMERIC {
        let start = s.start() as usize;
        if all[start..start + 9].iter().any(|&c| c > 0) {
            if suit.is_some() {
                return None;
            }
            suit = Some(s);
        }
    }
    let has_honors = all[27..].iter().any(|&c| c > 0);
    suit.map(|s| (s, has_honors))
}

fn yakuman_tier(
    concealed: &TileCounts,
    all: &TileCounts,
    declared: &[Meld],
    win_tile: TileType,
    ctx: &YakuContext,
) -> Vec<Yaku> {
    let mut yaku = Vec::new();
    let c = &ctx.conditions;
    let closed = declared.is_empty();

    if c.tsumo && closed {
        if c.tenhou {
            yaku.push(Yaku::Tenhou);
        }
        if c.chihou {
            yaku.push(Yaku::Chihou);
        }
    }

    if closed && is_kokushi(concealed) {
        let mut before = *concealed;
        before[win_tile.index()] = before[win_tile.index()].saturating_sub(1);
        let thirteen_wait = TERMINALS_AND_HONORS.iter().all(|t| before[t.index()] == 1);
        yaku.push(if thirteen_wait {
            Yaku::Kokushi13
        } else {
            Yaku::Kokushi
        });
        return yaku;
    }

    let dragon_sets = [HAKU, HATSU, CHUN]
        .iter()
        .filter(|&&d| all[d as usize] >= 3)
        .count();
    if dragon_sets == 3 {
        yaku.push(Yaku::Daisangen);
    }

    if let Some(form) = four_concealed_triplets(concealed, declared, win_tile, ctx) {
        yaku.push(form);
    }

    if HONORS.covers(all) {
        yaku.push(Yaku::Tsuuiisou);
    }
    if GREEN.covers(all) {
        yaku.push(Yaku::Ryuuiisou);
    }
    if TERMINALS.covers(all) {
        yaku.push(Yaku::Chinroutou);
    }

    let wind_sets = (27..31).filter(|&w| all[w] >= 3).count();
    let wind_pairs = (27..31).filter(|&w| all[w] == 2).count();
    if wind_sets == 4 {
        yaku.push(Yaku::Daisuushii);
    } else if wind_sets == 3 && wind_pairs == 1 {
        yaku.push(Yaku::Shousuushii);
    }

    if declared.iter().filter(|m| m.is_kan()).count() == 4 {
        yaku.push(Yaku::Suukantsu);
    }

    if closed {
        if let Some(form) = nine_gates(concealed, win_tile) {
            yaku.push(form);
        }
    }

    yaku
}

fn four_concealed_triplets(
    concealed: &TileCounts,
    declared: &[Meld],
    win_tile: TileType,
    ctx: &YakuContext,
) -> Option<Yaku> {
    if !ctx.is_menzen {
        return None;
    }
    if concealed.iter().any(|&c| c == 1 || c == 4) {
        return None;
    }
    let pairs = concealed.iter().filter(|&&c| c == 2).count();
    let triplets = concealed.iter().filter(|&&c| c == 3).count()
        + declared.iter().filter(|m| m.meld_type == MeldType::Ankan).count();
    if pairs != 1 || triplets != 4 {
        return None;
    }
    if concealed[win_tile.index()] == 2 {
        Some(Yaku::SuuankouTanki)
    } else if ctx.conditions.tsumo || ctx.rule.suuankou_on_ron {
        Some(Yaku::Suuankou)
    } else {
        None
    }
}

fn nine_gates(concealed: &TileCounts, win_tile: TileType) -> Option<Yaku> {
    let (suit, has_honors) = flush_suit(concealed)?;
    if has_honors {
        return None;
    }
    let start = suit.start() as usize;
    let run = &concealed[start..start + 9];
    let base = [3u8, 1, 1, 1, 1, 1, 1, 1, 3];
    if run.iter().zip(base.iter()).any(|(&have, &need)| have < need) {
        return None;
    }
    let mut before = [0u8; 9];
    before.copy_from_slice(run);
    let pure = match win_tile.index().checked_sub(start) {
        Some(offset) if offset < 9 && before[offset] > 0 => {
            before[offset] -= 1;
            before == base
        }
        _ => false,
    };
    if pure {
        Some(Yaku::JunseiChuuren)
    } else {
        Some(Yaku::Chuuren)
    }
}

fn standard_yaku(
    decomposition: &Decomposition,
    win_group: usize,
    win_tile: TileType,
    all: &TileCounts,
    ctx: &YakuContext,
) -> Vec<Yaku> {
    let melds = decomposition.melds();
    let sets = decomposition.sets();
    let pair = decomposition.pair();
    let is_tsumo = ctx.conditions.tsumo;
    let wait = WaitShape::of(&melds[win_group], win_tile);

    let mut yaku = situational(ctx);

    if SIMPLES.covers(all) && (ctx.is_menzen || ctx.rule.open_tanyao) {
        yaku.push(Yaku::Tanyao);
    }

    if ctx.is_menzen
        && sets.iter().all(|m| m.meld_type == MeldType::ClosedSequence)
        && ctx.value_tile_count(pair) == 0
        && wait == WaitShape::Ryanmen
    {
        yaku.push(Yaku::Pinfu);
    }

    if ctx.is_menzen {
        let mut run_starts = [0u8; NUM_TILE_TYPES];
        for m in sets.iter().filter(|m| m.is_sequence()) {
            run_starts[m.tile.index()] += 1;
        }
        let peikou: u8 = run_starts.iter().map(|&n| n / 2).sum();
        if peikou == 2 {
            yaku.push(Yaku::Ryanpeikou);
        } else if peikou == 1 {
            yaku.push(Yaku::Iipeikou);
        }
    }

    let triplet_tiles: Vec<TileType> = sets
        .iter()
        .filter(|m| m.is_triplet_like())
        .map(|m| m.tile)
        .collect();
    for &t in &triplet_tiles {
        match t.id() {
            HAKU => yaku.push(Yaku::Haku),
            HATSU => yaku.push(Yaku::Hatsu),
            CHUN => yaku.push(Yaku::Chun),
            _ => {}
        }
        if t == ctx.seat_wind.tile() {
            yaku.push(Yaku::SeatWind);
        }
        if t == ctx.round_wind.tile() {
            yaku.push(Yaku::RoundWind);
        }
    }

    if has_in_all_suits(&triplet_tiles) {
        yaku.push(Yaku::SanshokuDoukou);
    }

    if sets.iter().filter(|m| m.is_kan()).count() == 3 {
        yaku.push(Yaku::Sankantsu);
    }

    if sets.len() == 4 && triplet_tiles.len() == 4 {
        yaku.push(Yaku::Toitoi);
    }

    let concealed_triplets = sets
        .iter()
        .enumerate()
        .filter(|&(i, m)| match m.meld_type {
            MeldType::Ankan => true,
            MeldType::ClosedTriplet => is_tsumo || i + 1 != win_group,
            _ => false,
        })
        .count();
    if concealed_triplets >= 3 {
        yaku.push(Yaku::Sanankou);
    }

    let dragon_triplets = triplet_tiles.iter().filter(|t| t.is_dragon()).count();
    if dragon_triplets == 2 && pair.is_dragon() {
        yaku.push(Yaku::Shousangen);
    }

    let is_honroutou = TERMINALS_AND_HONORS.covers(all);
    if is_honroutou {
        yaku.push(Yaku::Honroutou);
    }

    let has_sequence = sets.iter().any(|m| m.is_sequence());
    if has_sequence && melds.iter().all(Meld::has_terminal_or_honor) {
        if HONORS.iter().any(|h| all[h.index()] > 0) {
            yaku.push(Yaku::Chanta);
        } else {
            yaku.push(Yaku::Junchan);
        }
    }

    let run_tiles: Vec<TileType> = sets
        .iter()
        .filter(|m| m.is_sequence())
        .map(|m| m.tile)
        .collect();
    let has_straight = Suit::NUMERIC.iter().any(|&s| {
        [1u8, 4, 7].iter().all(|&r| {
            TileType::from_suit_rank(s, r).is_some_and(|t| run_tiles.contains(&t))
        })
    });
    if has_straight {
        yaku.push(Yaku::Ittsu);
    }
    if has_in_all_suits(&run_tiles) {
        yaku.push(Yaku::Sanshoku);
    }

    match flush_suit(all) {
        Some((_, true)) => yaku.push(Yaku::Honitsu),
        Some((_, false)) => yaku.push(Yaku::Chinitsu),
        None => {}
    }

    yaku
}

/// True if some rank appears among `tiles` in all three numeric suits.
fn has_in_all_suits(tiles: &[TileType]) -> bool {
    let mut suits_by_rank = [0u8; 10];
    for t in tiles.iter().filter(|t| t.is_suited()) {
        suits_by_rank[t.rank() as usize] |= 1 << (t.suit() as u8);
    }
    suits_by_rank.contains(&0b111)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_counts;

    fn tt(text: &str) -> TileType {
        crate::parser::parse_tile(text).unwrap().tile_type()
    }

    fn ctx(conditions: Conditions) -> YakuContext {
        YakuContext {
            is_menzen: true,
            conditions,
            seat_wind: Wind::South,
            round_wind: Wind::East,
            rule: ScoringRule::default(),
        }
    }

    fn classify(hand: &str, win: &str, conditions: Conditions) -> YakuResult {
        let counts = parse_counts(hand).unwrap();
        calculate_yaku(&counts, &[], tt(win), &ctx(conditions))
    }

    fn classify_declared(
        hand: &str,
        declared: &[Meld],
        win: &str,
        conditions: Conditions,
    ) -> YakuResult {
        let counts = parse_counts(hand).unwrap();
        let mut c = ctx(conditions);
        c.is_menzen = declared.iter().all(|m| m.meld_type == MeldType::Ankan);
        calculate_yaku(&counts, declared, tt(win), &c)
    }

    #[test]
    fn ids_are_unique_and_round_trip() {
        let mut ids: Vec<u32> = Yaku::ALL.iter().map(|y| y.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Yaku::ALL.len());
        for y in Yaku::ALL {
            assert_eq!(Yaku::from_id(y.id()), Some(y));
            assert!(!y.name().is_empty());
        }
        assert_eq!(Yaku::from_id(999), None);
    }

    #[test]
    fn open_penalty_only_on_composites() {
        for y in Yaku::ALL {
            let diff = y.han(true) - y.han(false);
            let expected = matches!(
                y,
                Yaku::Chanta
                    | Yaku::Ittsu
                    | Yaku::Sanshoku
                    | Yaku::Junchan
                    | Yaku::Honitsu
                    | Yaku::Chinitsu
            );
            assert_eq!(diff == 1, expected, "{}", y.name());
        }
    }

    #[test]
    fn double_yakuman_follow_rule() {
        let tenhou = ScoringRule::default_tenhou();
        let mjsoul = ScoringRule::default_mjsoul();
        assert_eq!(Yaku::Kokushi13.yakuman_multiplier(&tenhou), 1);
        assert_eq!(Yaku::Kokushi13.yakuman_multiplier(&mjsoul), 2);
        assert_eq!(Yaku::Kokushi.yakuman_multiplier(&mjsoul), 1);
        assert_eq!(Yaku::Tanyao.yakuman_multiplier(&mjsoul), 0);
    }

    #[test]
    fn incomplete_hand_has_no_result() {
        let r = classify("123456789m1122p", "2p", Conditions::tsumo());
        assert!(!r.is_complete);
        assert!(r.yaku.is_empty());
    }

    #[test]
    fn pinfu_tsumo() {
        let r = classify("123456m789p234s55p", "4m", Conditions::tsumo());
        assert!(r.yaku.contains(&Yaku::Pinfu));
        assert!(r.yaku.contains(&Yaku::MenzenTsumo));
        assert_eq!(r.fu, 20);
        assert_eq!(r.wait, Some(WaitShape::Ryanmen));
    }

    #[test]
    fn best_interpretation_wins() {
        // 111222333m: three concealed triplets beat three identical runs
        let r = classify("111222333m456p77s", "7s", Conditions::tsumo());
        assert!(r.yaku.contains(&Yaku::Sanankou), "{:?}", r.yaku);
        assert!(!r.yaku.contains(&Yaku::Iipeikou));
    }

    #[test]
    fn ron_triplet_is_not_concealed() {
        // shanpon on 9m by ron: only two concealed triplets remain
        let r = classify("111m999m555p23466s", "9m", Conditions::ron());
        assert!(!r.yaku.contains(&Yaku::Sanankou), "{:?}", r.yaku);
        let r = classify("111m999m555p23466s", "9m", Conditions::tsumo());
        assert!(r.yaku.contains(&Yaku::Sanankou));
    }

    #[test]
    fn value_tiles() {
        let r = classify("234m567p555z777z22z", "2z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Haku));
        assert!(r.yaku.contains(&Yaku::Chun));
        assert!(!r.yaku.contains(&Yaku::SeatWind), "2z is the pair here");
    }

    #[test]
    fn little_three_dragons() {
        let r = classify("234m567p555z666z77z", "7z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Shousangen));
        assert!(r.yaku.contains(&Yaku::Haku));
        assert!(r.yaku.contains(&Yaku::Hatsu));
    }

    #[test]
    fn three_color_triplets() {
        let r = classify("222m222p222s456m77z", "7z", Conditions::tsumo());
        assert!(r.yaku.contains(&Yaku::SanshokuDoukou), "{:?}", r.yaku);
    }

    #[test]
    fn three_color_straight_and_pure_straight() {
        let r = classify("123m123p123s789s55m", "5m", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Sanshoku));
        let r = classify("123456789p234s11z", "1z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Ittsu));
    }

    #[test]
    fn outside_hands() {
        let r = classify("123m789m123p999s11z", "1z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Chanta), "{:?}", r.yaku);
        let r = classify("123m789m123p999s11p", "1p", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Junchan), "{:?}", r.yaku);
        assert!(!r.yaku.contains(&Yaku::Chanta));
    }

    #[test]
    fn flushes() {
        let r = classify("123456789m11222z", "2z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Honitsu));
        let r = classify("111234567m55588m", "8m", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Chinitsu));
        assert!(!r.yaku.contains(&Yaku::Honitsu));
    }

    #[test]
    fn twice_pure_double_sequence() {
        // also seven pairs shaped; seven pairs is checked first
        let r = classify("112233m445566p77s", "7s", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Chiitoitsu));
        // 2m 3m 4m four times each: runs score better than triplets
        let r = classify("223344m223344m55p", "5p", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Ryanpeikou), "{:?}", r.yaku);
    }

    #[test]
    fn seven_pairs_composes_with_tile_set_yaku() {
        let r = classify("1122334455667m7m", "7m", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Chiitoitsu));
        assert!(r.yaku.contains(&Yaku::Chinitsu));
        assert_eq!(r.fu, 25);
        assert_eq!(r.han, 8);
    }

    #[test]
    fn thirteen_orphans_forms() {
        let r = classify("19m19p19s12345677z", "7z", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Kokushi13]);
        let r = classify("19m19p19s12345667z", "7z", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Kokushi]);
        assert_eq!(r.han, 13);
    }

    #[test]
    fn four_concealed_triplets_forms() {
        let r = classify("111m333m555p777s99s", "9s", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::SuuankouTanki]);
        let r = classify("111m333m555p777s99s", "7s", Conditions::tsumo());
        assert_eq!(r.yaku, vec![Yaku::Suuankou]);
        let r = classify("111m333m555p777s99s", "7s", Conditions::ron());
        assert!(!r.yaku.iter().any(|y| y.is_yakuman()));
        assert!(r.yaku.contains(&Yaku::Sanankou));
        assert!(r.yaku.contains(&Yaku::Toitoi));
    }

    #[test]
    fn winds_and_dragons() {
        let r = classify("111z222z333z444z55m", "5m", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Daisuushii));
        assert!(!r.yaku.contains(&Yaku::Shousuushii));
        let r = classify("111z222z333z44z123m", "3m", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Shousuushii]);
        let r = classify("555z666z777z123m99p", "9p", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Daisangen]);
    }

    #[test]
    fn nine_gates_forms() {
        let r = classify("11123455678999m", "5m", Conditions::tsumo());
        assert_eq!(r.yaku, vec![Yaku::JunseiChuuren]);
        let r = classify("11123455678999m", "4m", Conditions::tsumo());
        assert_eq!(r.yaku, vec![Yaku::Chuuren]);
    }

    #[test]
    fn all_green_and_all_honors() {
        let r = classify("22334466888s666z", "6z", Conditions::ron());
        assert!(r.yaku.contains(&Yaku::Ryuuiisou));
        let r = classify("11223344556677z", "7z", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Tsuuiisou]);
    }

    #[test]
    fn open_hand_discounts() {
        let counts = parse_counts("123456789m11z").unwrap();
        let declared = [Meld::new(MeldType::Pon, tt("2z"))];
        let mut c = ctx(Conditions::ron());
        c.is_menzen = false;
        let r = calculate_yaku(&counts, &declared, tt("1z"), &c);
        assert!(r.yaku.contains(&Yaku::Ittsu));
        assert!(r.yaku.contains(&Yaku::Honitsu));
        assert!(r.yaku.contains(&Yaku::SeatWind));
        // ittsu 1 + honitsu 2 + south seat 1
        assert_eq!(r.han, 4);
    }

    #[test]
    fn first_draw_wins() {
        let tenhou = Conditions {
            tenhou: true,
            ..Conditions::tsumo()
        };
        let r = classify("123456m789p234s55p", "4m", tenhou);
        assert_eq!(r.yaku, vec![Yaku::Tenhou]);
        let r = classify(
            "123456m789p234s55p",
            "4m",
            Conditions {
                tenhou: true,
                ..Conditions::ron()
            },
        );
        assert!(!r.yaku.contains(&Yaku::Tenhou));

        let chihou = Conditions {
            chihou: true,
            ..Conditions::tsumo()
        };
        let r = classify("123456m789p234s55p", "4m", chihou);
        assert_eq!(r.yaku, vec![Yaku::Chihou]);
        let declared = [Meld::new(MeldType::Pon, tt("7z"))];
        let r = classify_declared("123456m789p55p", &declared, "4m", chihou);
        assert!(r.is_complete);
        assert!(!r.yaku.contains(&Yaku::Chihou), "{:?}", r.yaku);
    }

    #[test]
    fn kan_counts() {
        let kan = |meld_type: MeldType, text: &str| Meld::new(meld_type, tt(text));
        let four = [
            kan(MeldType::Daiminkan, "2m"),
            kan(MeldType::Daiminkan, "3p"),
            kan(MeldType::Ankan, "4s"),
            kan(MeldType::Kakan, "6s"),
        ];
        let r = classify_declared("55p", &four, "5p", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Suukantsu]);

        let mut three_and_pon = four;
        three_and_pon[3] = kan(MeldType::Pon, "6s");
        let r = classify_declared("55p", &three_and_pon, "5p", Conditions::ron());
        assert!(!r.yaku.contains(&Yaku::Suukantsu));
        assert!(r.yaku.contains(&Yaku::Sankantsu), "{:?}", r.yaku);

        let r = classify_declared("123s55p", &four[..3], "5p", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Sankantsu]);
        assert_eq!(r.han, 2);

        let two_kans = [
            kan(MeldType::Daiminkan, "2m"),
            kan(MeldType::Pon, "3p"),
            kan(MeldType::Ankan, "4s"),
        ];
        let r = classify_declared("123s55p", &two_kans, "5p", Conditions::ron());
        assert!(!r.yaku.contains(&Yaku::Sankantsu), "{:?}", r.yaku);
    }

    #[test]
    fn terminal_only_hands() {
        let r = classify("111m999m111p999p11s", "1s", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::SuuankouTanki, Yaku::Chinroutou]);

        // an honor pair and a ron on the shanpon: no yakuman at all
        let r = classify("111m999m111p999p11z", "9p", Conditions::ron());
        assert!(!r.yaku.iter().any(|y| y.is_yakuman()), "{:?}", r.yaku);
        assert!(r.yaku.contains(&Yaku::Honroutou));
        assert!(r.yaku.contains(&Yaku::Toitoi));
        assert!(r.yaku.contains(&Yaku::Sanankou));

        let r = classify("111m333m555p777s99s", "7s", Conditions::ron());
        assert!(!r.yaku.contains(&Yaku::Honroutou));
        assert!(!r.yaku.contains(&Yaku::Chinroutou));
    }

    #[test]
    fn pure_double_sequence() {
        let r = classify("112233m456p789s55p", "5p", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Iipeikou]);
        assert_eq!(r.han, 1);

        let declared = [Meld::new(MeldType::Chi, tt("7s"))];
        let r = classify_declared("112233m456p55p", &declared, "5p", Conditions::ron());
        assert!(r.is_complete);
        assert!(!r.yaku.contains(&Yaku::Iipeikou), "{:?}", r.yaku);
    }

    #[test]
    fn situational_yaku() {
        let lucky = Conditions {
            riichi: true,
            double_riichi: true,
            ippatsu: true,
            haitei: true,
            ..Conditions::tsumo()
        };
        let r = classify("123456m789p234s55p", "4m", lucky);
        assert_eq!(
            r.yaku,
            vec![
                Yaku::DoubleRiichi,
                Yaku::Ippatsu,
                Yaku::MenzenTsumo,
                Yaku::Haitei,
                Yaku::Pinfu
            ]
        );
        assert_eq!(r.han, 6);

        let plain = Conditions {
            riichi: true,
            ..Conditions::tsumo()
        };
        let r = classify("123456m789p234s55p", "4m", plain);
        assert_eq!(r.yaku, vec![Yaku::Riichi, Yaku::MenzenTsumo, Yaku::Pinfu]);

        let rinshan = Conditions {
            rinshan: true,
            ..Conditions::tsumo()
        };
        let r = classify("123456m789p234s55p", "4m", rinshan);
        assert!(r.yaku.contains(&Yaku::Rinshan));
        assert!(!r.yaku.contains(&Yaku::Haitei));

        let chankan = Conditions {
            chankan: true,
            ..Conditions::ron()
        };
        let r = classify("123456m789p234s55p", "4m", chankan);
        assert!(r.yaku.contains(&Yaku::Chankan));
        assert!(!r.yaku.contains(&Yaku::Rinshan));

        let houtei = Conditions {
            houtei: true,
            ..Conditions::ron()
        };
        let r = classify("123456m789p234s55p", "4m", houtei);
        assert_eq!(r.yaku, vec![Yaku::Houtei, Yaku::Pinfu]);

        let r = classify("123456m789p234s55p", "4m", Conditions::ron());
        assert_eq!(r.yaku, vec![Yaku::Pinfu]);
    }

    #[test]
    fn open_tanyao_follows_rule() {
        let counts = parse_counts("345p678s456s55p").unwrap();
        let declared = [Meld::new(MeldType::Pon, tt("2m"))];
        let mut c = ctx(Conditions::ron());
        c.is_menzen = false;
        let r = calculate_yaku(&counts, &declared, tt("5p"), &c);
        assert_eq!(r.yaku, vec![Yaku::Tanyao]);

        c.rule.open_tanyao = false;
        let r = calculate_yaku(&counts, &declared, tt("5p"), &c);
        assert!(r.is_complete);
        assert!(r.yaku.is_empty(), "{:?}", r.yaku);

        // closed hands keep it either way
        c.is_menzen = true;
        let r = calculate_yaku(&parse_counts("234m345p678s456s55p").unwrap(), &[], tt("5p"), &c);
        assert!(r.yaku.contains(&Yaku::Tanyao));
    }

    #[test]
    fn four_concealed_triplets_on_ron_follows_rule() {
        let counts = parse_counts("111m333m555p777s99s").unwrap();
        let mut c = ctx(Conditions::ron());
        let r = calculate_yaku(&counts, &[], tt("7s"), &c);
        assert!(!r.yaku.contains(&Yaku::Suuankou));

        c.rule.suuankou_on_ron = true;
        let r = calculate_yaku(&counts, &[], tt("7s"), &c);
        assert_eq!(r.yaku, vec![Yaku::Suuankou]);
        assert_eq!(r.yakuman_count, 1);
    }
}
