//! Game sessions.
//!
//! A `GameSession` owns one `SessionState` and is the unit of mutual
//! exclusion: the registry keeps each session behind its own lock.
//!
//! - `game`: roster management, lifecycle, action dispatch
//! - `view`: privacy-filtered projection sent to each seat

pub mod game;
pub mod view;

pub use game::{GameSession, Transition};
pub use view::{project, HandView, SeatView, SessionView};
