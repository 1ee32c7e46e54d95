//! Shared card zones of a session.
//!
//! Hands are owned by players (see `core::state::Player`). The two shared
//! zones, the draw pile and the discard pile, live in `Piles`.

pub mod piles;

pub use piles::{Drawn, Piles};
