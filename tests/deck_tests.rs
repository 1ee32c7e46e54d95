//! Deck composition and shuffle distribution tests.
//!
//! The shuffle is the only place randomness enters a game, so it gets both
//! structural checks (composition, bijection) and statistical ones.

use std::collections::HashMap;

use proptest::prelude::*;
use uno_engine::cards::{new_shuffled_deck, reshuffle, shuffle, standard_deck};
use uno_engine::{CardKind, Color, GameRng, ShuffleSource, DECK_SIZE};

/// Plays back a fixed list of indices.
struct Scripted(Vec<usize>);

impl ShuffleSource for Scripted {
    fn index_up_to(&mut self, upper: usize) -> usize {
        let next = self.0.remove(0);
        assert!(next <= upper, "script index {next} exceeds {upper}");
        next
    }
}

/// Every freshly built deck has the exact composition.
#[test]
fn test_fresh_deck_composition() {
    for seed in 0..20 {
        let deck = new_shuffled_deck(&mut GameRng::new(seed));
        assert_eq!(deck.len(), DECK_SIZE);

        let mut counts: HashMap<(Color, CardKind, Option<u8>), usize> = HashMap::new();
        for card in &deck {
            *counts.entry((card.color, card.kind(), card.value())).or_default() += 1;
        }

        for color in Color::SUITS {
            assert_eq!(counts[&(color, CardKind::Number, Some(0))], 1);
            for value in 1..=9 {
                assert_eq!(counts[&(color, CardKind::Number, Some(value))], 2);
            }
            for kind in [CardKind::Skip, CardKind::Reverse, CardKind::DrawTwo] {
                assert_eq!(counts[&(color, kind, None)], 2);
            }
        }
        assert_eq!(counts[&(Color::Wild, CardKind::Wild, None)], 4);
        assert_eq!(counts[&(Color::Wild, CardKind::WildDrawFour, None)], 4);

        let mut ids: Vec<u8> = deck.iter().map(|c| c.id.raw()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DECK_SIZE);
    }
}

/// Number values only appear on number cards and never exceed 9.
#[test]
fn test_values_only_on_numbers() {
    for card in standard_deck() {
        match card.kind() {
            CardKind::Number => assert!(card.value().is_some_and(|v| v <= 9)),
            _ => assert_eq!(card.value(), None),
        }
        assert_eq!(card.color == Color::Wild, card.kind().is_wild());
    }
}

/// A scripted source yields the exact order the algorithm prescribes.
#[test]
fn test_scripted_shuffle_exact_order() {
    // i=4 swaps with 0, i=3 with 3, i=2 with 1, i=1 with 0.
    let mut items = vec!['a', 'b', 'c', 'd', 'e'];
    shuffle(&mut items, &mut Scripted(vec![0, 3, 1, 0]));
    assert_eq!(items, vec!['c', 'e', 'b', 'd', 'a']);
}

/// Same seed, same deck.
#[test]
fn test_seeded_deck_reproducible() {
    let a = new_shuffled_deck(&mut GameRng::new(2024));
    let b = new_shuffled_deck(&mut GameRng::new(2024));
    let c = new_shuffled_deck(&mut GameRng::new(2025));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

/// All 24 orderings of four items appear equally often.
#[test]
fn test_small_shuffle_uniform_over_permutations() {
    let mut rng = GameRng::new(99);
    let trials = 24_000;
    let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
    for _ in 0..trials {
        let mut items = vec![0u8, 1, 2, 3];
        shuffle(&mut items, &mut rng);
        *counts.entry(items).or_default() += 1;
    }

    assert_eq!(counts.len(), 24);
    let expected = trials as f64 / 24.0;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 23 degrees of freedom; 49.7 is the 0.1% critical value.
    assert!(chi_square < 49.7, "chi-square {chi_square:.1} too large");
}

/// Each card lands in each deck position about equally often.
#[test]
fn test_deck_position_frequencies() {
    let mut rng = GameRng::new(7);
    let trials = 10_800;
    let mut first_card_positions = vec![0usize; DECK_SIZE];
    let mut first_position_cards = vec![0usize; DECK_SIZE];
    for _ in 0..trials {
        let deck = new_shuffled_deck(&mut rng);
        let pos = deck.iter().position(|c| c.id.raw() == 0).unwrap();
        first_card_positions[pos] += 1;
        first_position_cards[deck[0].id.raw() as usize] += 1;
    }

    let expected = trials as f64 / DECK_SIZE as f64;
    for counts in [&first_card_positions, &first_position_cards] {
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // 107 degrees of freedom; 158 is roughly the 0.1% critical value.
        assert!(chi_square < 160.0, "chi-square {chi_square:.1} too large");
    }
}

/// Recycling keeps exactly the cards it was given.
#[test]
fn test_reshuffle_preserves_cards() {
    let discards: Vec<_> = standard_deck().into_iter().take(40).collect();
    let mut recycled = reshuffle(discards.clone(), &mut GameRng::new(5));
    assert_eq!(recycled.len(), 40);
    recycled.sort_by_key(|c| c.id);
    assert_eq!(recycled, discards);
}

proptest! {
    /// Shuffling is a bijection for any input and any seed.
    #[test]
    fn prop_shuffle_is_bijection(items in prop::collection::vec(any::<u16>(), 0..200), seed in any::<u64>()) {
        let mut shuffled = items.clone();
        shuffle(&mut shuffled, &mut GameRng::new(seed));

        let mut before = items;
        before.sort_unstable();
        shuffled.sort_unstable();
        prop_assert_eq!(before, shuffled);
    }

    /// Every shuffled deck is a permutation of the standard deck.
    #[test]
    fn prop_shuffled_deck_is_permutation(seed in any::<u64>()) {
        let mut deck = new_shuffled_deck(&mut GameRng::new(seed));
        deck.sort_by_key(|c| c.id);
        prop_assert_eq!(deck, standard_deck());
    }
}
