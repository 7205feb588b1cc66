//! Property-based invariant tests for the hand engine.
//!
//! Uses proptest to generate seeds, deals hands from the seeded wall and
//! checks engine invariants on the resulting hands and on random
//! draw/discard/call sequences.

use proptest::prelude::*;
use tenpai_core::seeding::deal_round;
use tenpai_engine::agari::{decompose, is_chiitoitsu, is_kokushi};
use tenpai_engine::score::calculate_base_points;
use tenpai_engine::tile::{count_tiles, TileType, NUM_TILE_TYPES};
use tenpai_engine::{Conditions, Hand, ScoringRule};

fn seed_bytes(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for chunk in bytes.chunks_mut(8) {
        chunk.copy_from_slice(&seed.to_le_bytes());
    }
    bytes
}

fn dealt(seed: u64, round: u8) -> tenpai_core::Deal {
    deal_round(&seed_bytes(seed), 0, round % 8, 0, ScoringRule::default()).unwrap()
}

/// Concealed plus declared tiles, kans counted as three.
fn logical_total(hand: &Hand) -> usize {
    hand.concealed().len() + 3 * hand.melds().len()
}

fn assert_consistent(hand: &Hand) {
    assert_eq!(*hand.counts(), count_tiles(hand.concealed()));
    let all = hand.all_tiles();
    let mut ids: Vec<u8> = all.iter().map(|t| t.id()).collect();
    ids.dedup();
    assert_eq!(ids.len(), all.len(), "a physical tile is held twice");
}

// ---------------------------------------------------------------------------
// Property-based tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A tile completes the hand exactly when a standard decomposition,
    /// seven pairs or thirteen orphans exists.
    #[test]
    fn winning_matches_shape_predicates(seed in any::<u64>(), round in 0u8..8) {
        let deal = dealt(seed, round);
        for hand in &deal.hands {
            for t in 0..NUM_TILE_TYPES {
                let tile_type = TileType::from_index(t);
                let Some(win) = tile_type
                    .instances()
                    .into_iter()
                    .find(|tile| !hand.all_tiles().contains(tile))
                else {
                    continue;
                };
                let mut counts = *hand.counts();
                counts[t] += 1;
                let expected = !decompose(&counts).is_empty()
                    || is_chiitoitsu(&counts)
                    || is_kokushi(&counts);
                prop_assert_eq!(hand.is_winning_hand(win), expected);
                prop_assert_eq!(hand.parse_winning_hand(win).is_empty(), decompose(&counts).is_empty());
            }
        }
    }

    /// Any hand with a winning tile is tenpai.
    #[test]
    fn waits_imply_tenpai(seed in any::<u64>()) {
        let deal = dealt(seed, 0);
        for hand in &deal.hands {
            if !hand.winning_tiles().is_empty() {
                prop_assert_eq!(hand.calc_shanten(), 0);
            }
        }
    }

    /// Drawing and discarding moves shanten by at most one step, and the
    /// best discard never makes the hand worse.
    #[test]
    fn discard_shanten_moves_one_step(seed in any::<u64>()) {
        let deal = dealt(seed, 0);
        let draw = deal.next_draw().unwrap();
        for hand in &deal.hands {
            let before = hand.calc_shanten();
            let table = hand.discard_shanten(draw);
            prop_assert!(!table.is_empty());
            let best = table.iter().map(|&(_, s)| s).min().unwrap();
            prop_assert!(best <= before);
            prop_assert!(best + 1 >= before);
            prop_assert!(table.iter().all(|&(_, s)| s <= before + 1));
        }
    }

    /// Random draw/discard play keeps thirteen tiles and a consistent cache.
    #[test]
    fn draw_discard_keeps_totals(seed in any::<u64>(), picks in prop::collection::vec(0usize..14, 1..40)) {
        let deal = dealt(seed, 0);
        let mut hand = deal.hands[0].clone();
        for (draw, pick) in deal.live_wall.iter().zip(&picks) {
            let mut options = hand.concealed().to_vec();
            options.push(*draw);
            let discard = options[pick % options.len()];
            hand.draw_and_discard(*draw, discard).unwrap();
            prop_assert_eq!(logical_total(&hand), 13);
            assert_consistent(&hand);
        }
    }

    /// Calls offered from the wall either succeed and keep the totals, or
    /// fail and leave the hand as it was.
    #[test]
    fn calls_are_atomic(seed in any::<u64>(), picks in prop::collection::vec(0usize..64, 1..30)) {
        let deal = dealt(seed, 0);
        let mut hand = deal.hands[1].clone();
        for (offered, pick) in deal.live_wall.iter().zip(&picks) {
            let before = hand.clone();
            let discard = hand.concealed()[pick % hand.concealed().len()];
            let result = match pick % 4 {
                0 => hand.call_pon(*offered, discard),
                1 => match hand.chi_options(*offered).first() {
                    Some(&start) => hand.call_chi(*offered, start, discard),
                    None => hand.call_chi(*offered, offered.tile_type(), discard),
                },
                2 => hand.call_kan(*offered),
                _ => hand.draw_and_discard(*offered, discard),
            };
            match result {
                Ok(()) => {
                    prop_assert_eq!(logical_total(&hand), 13);
                    prop_assert_eq!(hand.all_tiles().len(), before.all_tiles().len() + usize::from(pick % 4 == 2));
                }
                Err(_) => prop_assert_eq!(&hand, &before),
            }
            assert_consistent(&hand);
            if hand.concealed().len() < 2 {
                break;
            }
        }
    }

    /// Fu is a multiple of ten apart from seven pairs' fixed 25.
    #[test]
    fn fu_is_rounded(seed in any::<u64>()) {
        let deal = dealt(seed, 0);
        for hand in &deal.hands {
            for t in hand.winning_tiles() {
                let Some(win) = t.instances().into_iter().find(|tile| !hand.all_tiles().contains(tile)) else {
                    continue;
                };
                let conditions = Conditions { riichi: true, ..Conditions::ron() };
                if let Some(result) = hand.evaluate(win, &conditions) {
                    prop_assert!(result.fu % 10 == 0 || result.fu == 25, "fu {}", result.fu);
                    prop_assert!(result.score.total > 0);
                }
            }
        }
    }

    /// Base points never drop as han rises and cap at yakuman.
    #[test]
    fn base_points_monotonic(fu in prop::sample::select(vec![20u8, 25, 30, 40, 50, 60, 70, 80, 90, 100, 110])) {
        let mut last = 0;
        for han in 1u8..=20 {
            let base = calculate_base_points(han, fu);
            prop_assert!(base >= last, "{} han {} fu", han, fu);
            last = base;
            if han >= 13 {
                prop_assert_eq!(base, 8000);
            }
        }
    }
}
