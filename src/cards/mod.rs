//! Card model and deck utilities.
//!
//! ## Key Types
//!
//! - `Color`: The four suits plus `Wild`
//! - `Face` / `CardKind`: Printed face, and its kind without the value
//! - `Card`: Immutable card with a deck-unique `CardId`
//!
//! ## Deck
//!
//! `new_shuffled_deck` builds the fixed 108-card composition and shuffles it.
//! This and `reshuffle` are the only places randomness enters a game.

pub mod card;
pub mod deck;

pub use card::{Card, CardKind, Color, Face};
pub use deck::{new_shuffled_deck, reshuffle, shuffle, standard_deck, DECK_SIZE};
