//! Deterministic wall shuffles and starting deals.
//!
//! Given the same `(session seed, nonce, round, honba)` tuple the wall, and
//! therefore every dealt hand, is identical on any platform and thread
//! count.
//!
//! Seeds are derived with SHA-256 and fed to `ChaCha8Rng`. The shuffle is a
//! local Fisher-Yates so its output does not depend on `rand`'s slice
//! helpers staying stable across releases.

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tenpai_engine::hand::HAND_SIZE;
use tenpai_engine::tile::{Tile, NUM_TILES_136};
use tenpai_engine::{Hand, ScoringRule, Wind};

/// 34 tile types x 4 copies.
pub const WALL_SIZE: usize = NUM_TILES_136;

pub const NUM_SEATS: usize = 4;

pub fn fisher_yates_shuffle<T>(slice: &mut [T], rng: &mut impl Rng) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// `SHA-256(session_seed || nonce_le || round || honba)`.
pub fn derive_round_seed(session_seed: &[u8; 32], nonce: u64, round: u8, honba: u8) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(session_seed);
    hasher.update(nonce.to_le_bytes());
    hasher.update([round]);
    hasher.update([honba]);
    hasher.finalize().into()
}

/// A shuffled 136-tile wall.
pub fn generate_wall(session_seed: &[u8; 32], nonce: u64, round: u8, honba: u8) -> Vec<Tile> {
    let seed = derive_round_seed(session_seed, nonce, round, honba);
    let mut rng = ChaCha8Rng::from_seed(seed);
    let mut wall: Vec<Tile> = (0..WALL_SIZE as u8).filter_map(Tile::new).collect();
    fisher_yates_shuffle(&mut wall, &mut rng);
    wall
}

/// Four starting hands and the tiles left to draw.
#[derive(Debug, Clone)]
pub struct Deal {
    pub round: u8,
    pub dealer: u8,
    pub hands: Vec<Hand>,
    /// Undrawn tiles in draw order.
    pub live_wall: Vec<Tile>,
}

impl Deal {
    pub fn round_wind(&self) -> Wind {
        Wind::from(self.round / 4)
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.hands[self.dealer as usize]
    }

    /// The next tile to be drawn, if any remain.
    pub fn next_draw(&self) -> Option<Tile> {
        self.live_wall.first().copied()
    }
}

/// Deals 13 tiles to each seat in turn, four at a time for three passes
/// and then one each. Round 0-3 is East, 4-7 South; the dealer is
/// `round % 4`.
pub fn deal_round(
    session_seed: &[u8; 32],
    nonce: u64,
    round: u8,
    honba: u8,
    rule: ScoringRule,
) -> anyhow::Result<Deal> {
    let wall = generate_wall(session_seed, nonce, round, honba);
    let dealer = round % NUM_SEATS as u8;
    let round_wind = Wind::from(round / 4);

    let mut starting: Vec<Vec<Tile>> = vec![Vec::with_capacity(HAND_SIZE); NUM_SEATS];
    let mut cursor = 0;
    for pass in 0..4 {
        let take = if pass < 3 { 4 } else { 1 };
        for offset in 0..NUM_SEATS {
            let seat = (dealer as usize + offset) % NUM_SEATS;
            starting[seat].extend_from_slice(&wall[cursor..cursor + take]);
            cursor += take;
        }
    }

    let hands = starting
        .iter()
        .enumerate()
        .map(|(seat, tiles)| {
            let seat_wind = Wind::seat_wind(seat as u8, dealer);
            Hand::new(tiles, round_wind, seat_wind)
                .map(|hand| hand.with_rule(rule))
                .with_context(|| format!("dealing seat {} of round {}", seat, round))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    log::trace!("dealt round {} honba {} nonce {}", round, honba, nonce);
    Ok(Deal {
        round,
        dealer,
        hands,
        live_wall: wall[cursor..].to_vec(),
    })
}

/// Produces a stream of independent deals from one session seed.
///
/// Each deal uses `SHA-256(session_seed || index_le)` as its own seed.
///
/// ```
/// use tenpai_core::seeding::DealSampler;
///
/// let mut sampler = DealSampler::new([0u8; 32]);
/// let a = sampler.next_deal().unwrap();
/// let b = sampler.next_deal().unwrap();
/// assert_ne!(a.live_wall, b.live_wall);
/// ```
pub struct DealSampler {
    seed: [u8; 32],
    index: u64,
    rule: ScoringRule,
}

impl DealSampler {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            index: 0,
            rule: ScoringRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: ScoringRule) -> Self {
        self.rule = rule;
        self
    }

    /// Number of deals produced so far.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn next_seed(&mut self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.index.to_le_bytes());
        let result: [u8; 32] = hasher.finalize().into();
        self.index += 1;
        result
    }

    pub fn next_deal(&mut self) -> anyhow::Result<Deal> {
        let seed = self.next_seed();
        deal_round(&seed, 0, 0, 0, self.rule)
    }
}
