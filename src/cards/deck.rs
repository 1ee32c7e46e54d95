//! Deck construction and shuffling.
//!
//! ## Composition
//!
//! Per suit: one 0, two each of 1-9, two each of skip/reverse/draw-two
//! (25 cards). Four suits give 100, plus four wilds and four wild-draw-fours:
//! 108 cards. Ids are assigned 0..108 in that order, before shuffling.
//!
//! ## Shuffle
//!
//! Backward Fisher–Yates: for `i` from the last index down to 1, swap
//! position `i` with an index drawn uniformly from `0..=i`. With a uniform
//! `ShuffleSource` every permutation is equally likely.

use crate::core::{CardId, ShuffleSource};

use super::card::{Card, Color, Face};

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 108;

/// Build the full deck in composition order (unshuffled).
#[must_use]
pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    let mut next_id = 0u8;
    let mut alloc = || {
        let id = CardId::new(next_id);
        next_id += 1;
        id
    };

    for color in Color::SUITS {
        cards.push(Card::number(alloc(), color, 0));

        for value in 1..=9 {
            for _ in 0..2 {
                cards.push(Card::number(alloc(), color, value));
            }
        }

        for face in [Face::Skip, Face::Reverse, Face::DrawTwo] {
            for _ in 0..2 {
                cards.push(Card::action(alloc(), color, face));
            }
        }
    }

    for _ in 0..4 {
        cards.push(Card::wild(alloc(), Face::Wild));
        cards.push(Card::wild(alloc(), Face::WildDrawFour));
    }

    debug_assert_eq!(cards.len(), DECK_SIZE);
    cards
}

/// Shuffle a slice in place with backward Fisher–Yates.
pub fn shuffle<T, R: ShuffleSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index_up_to(i);
        items.swap(i, j);
    }
}

/// Build and shuffle a fresh deck.
#[must_use]
pub fn new_shuffled_deck<R: ShuffleSource + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards = standard_deck();
    shuffle(&mut cards, rng);
    cards
}

/// Shuffle recycled discard cards into a new draw pile.
///
/// The caller removes the top discard before handing the rest over.
#[must_use]
pub fn reshuffle<R: ShuffleSource + ?Sized>(mut discard: Vec<Card>, rng: &mut R) -> Vec<Card> {
    shuffle(&mut discard, rng);
    discard
}
