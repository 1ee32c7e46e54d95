//! Shared card piles: the face-down draw pile and the face-up discard pile.
//!
//! - Draw pile: ordered, cards are taken from the head (front).
//! - Discard pile: ordered, the top card is the last one pushed.
//!
//! Both piles are `im::Vector`s so a whole session can be snapshotted in
//! O(1) before an intent is applied.

use im::Vector;
use smallvec::SmallVec;

use crate::cards::{reshuffle, Card};
use crate::core::ShuffleSource;

/// Cards handed out by a single draw. Draws are almost always 1, 2 or 4.
pub type Drawn = SmallVec<[Card; 4]>;

/// Draw pile and discard pile of one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Piles {
    draw: Vector<Card>,
    discard: Vector<Card>,
}

impl Piles {
    /// Create empty piles (lobby state).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `cards` as the draw pile, head first. The discard pile is empty.
    #[must_use]
    pub fn from_deck(cards: Vec<Card>) -> Self {
        Self {
            draw: cards.into_iter().collect(),
            discard: Vector::new(),
        }
    }

    /// Number of cards in the draw pile.
    #[must_use]
    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    /// Number of cards in the discard pile.
    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// The top discard, if any.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.discard.back()
    }

    /// The discard pile, bottom first.
    pub fn discards(&self) -> impl Iterator<Item = &Card> {
        self.discard.iter()
    }

    /// The draw pile, head first.
    pub fn draw_pile(&self) -> impl Iterator<Item = &Card> {
        self.draw.iter()
    }

    /// Put a card on top of the discard pile.
    pub fn push_discard(&mut self, card: Card) {
        self.discard.push_back(card);
    }

    /// Take the head of the draw pile without recycling the discards.
    pub fn pop_draw(&mut self) -> Option<Card> {
        self.draw.pop_front()
    }

    /// Take up to `n` cards from the head of the draw pile without
    /// recycling the discards.
    pub fn take(&mut self, n: usize) -> Drawn {
        let n = n.min(self.draw.len());
        let rest = self.draw.split_off(n);
        let taken = std::mem::replace(&mut self.draw, rest);
        taken.into_iter().collect()
    }

    /// Recycle the discard pile if the draw pile holds fewer than `needed`.
    ///
    /// Everything but the top discard is shuffled and appended to the draw
    /// pile; the top card stays as the sole discard. Nothing happens unless
    /// the discard pile has more than one card. Returns whether a reshuffle
    /// took place.
    pub fn ensure<R: ShuffleSource + ?Sized>(&mut self, needed: usize, rng: &mut R) -> bool {
        if self.draw.len() >= needed || self.discard.len() <= 1 {
            return false;
        }
        let Some(top) = self.discard.pop_back() else {
            return false;
        };
        let recycled: Vec<Card> = std::mem::take(&mut self.discard).into_iter().collect();
        self.draw.extend(reshuffle(recycled, rng));
        self.discard.push_back(top);
        true
    }

    /// Draw up to `n` cards, recycling the discards first when needed.
    ///
    /// Fewer than `n` cards come back only when both piles are exhausted.
    pub fn draw<R: ShuffleSource + ?Sized>(&mut self, n: usize, rng: &mut R) -> Drawn {
        self.ensure(n, rng);
        self.take(n)
    }

    /// Put cards at the bottom (tail) of the draw pile.
    pub fn return_to_bottom(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.draw.extend(cards);
    }

    /// Total cards across both piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.discard.len()
    }
}
