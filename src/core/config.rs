//! Rule and registry configuration.
//!
//! - `RuleConfig`: table rules for one session (seat bounds, hand size,
//!   forced-draw policy, house-rule switches)
//! - `RegistryConfig`: rules plus registry-level settings (code length,
//!   RNG seed, orphan sweeping)
//!
//! Defaults reproduce the classic online table: 2-6 seats, 7-card hands,
//! red as the fallback color, forced draws delivered immediately.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Color;

/// How a draw-two / wild-draw-four debt is collected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForcedDrawPolicy {
    /// The next seat receives the cards as part of the play and loses its
    /// turn. The debt never outlives the play that created it.
    #[default]
    Immediate,

    /// The debt stays pending. The next seat must either stack another draw
    /// card (passing the increased debt on) or draw the whole debt, which
    /// ends its turn.
    Stacking,
}

/// A rule table that cannot be played.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Need at least 2 seats to play, got {min}")]
    TooFewSeats { min: usize },

    #[error("min_seats must not exceed max_seats ({min} > {max})")]
    SeatBoundsInverted { min: usize, max: usize },

    #[error("Hands must start with at least one card")]
    EmptyHands,

    #[error("Deck cannot deal {seats} hands of {hand_size}")]
    Undealable { seats: usize, hand_size: usize },

    #[error("Fallback color must be a suit, got {0:?}")]
    WildFallback(Color),
}

/// Table rules for a session.
///
/// Fields are read through getters; the builder methods and deserialization
/// both reject tables the deck cannot serve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleTable", into = "RuleTable")]
pub struct RuleConfig {
    min_seats: usize,
    max_seats: usize,
    hand_size: usize,
    fallback_color: Color,
    forced_draw: ForcedDrawPolicy,
    require_draw_before_pass: bool,
    reverse_skips_heads_up: bool,
}

/// Wire shape of `RuleConfig`, checked on the way in.
#[derive(Serialize, Deserialize)]
struct RuleTable {
    min_seats: usize,
    max_seats: usize,
    hand_size: usize,
    fallback_color: Color,
    forced_draw: ForcedDrawPolicy,
    #[serde(default)]
    require_draw_before_pass: bool,
    #[serde(default)]
    reverse_skips_heads_up: bool,
}

impl TryFrom<RuleTable> for RuleConfig {
    type Error = ConfigError;

    fn try_from(table: RuleTable) -> Result<Self, Self::Error> {
        let rules = Self {
            min_seats: table.min_seats,
            max_seats: table.max_seats,
            hand_size: table.hand_size,
            fallback_color: table.fallback_color,
            forced_draw: table.forced_draw,
            require_draw_before_pass: table.require_draw_before_pass,
            reverse_skips_heads_up: table.reverse_skips_heads_up,
        };
        rules.validate()?;
        Ok(rules)
    }
}

impl From<RuleConfig> for RuleTable {
    fn from(rules: RuleConfig) -> Self {
        Self {
            min_seats: rules.min_seats,
            max_seats: rules.max_seats,
            hand_size: rules.hand_size,
            fallback_color: rules.fallback_color,
            forced_draw: rules.forced_draw,
            require_draw_before_pass: rules.require_draw_before_pass,
            reverse_skips_heads_up: rules.reverse_skips_heads_up,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_seats: 2,
            max_seats: 6,
            hand_size: 7,
            fallback_color: Color::Red,
            forced_draw: ForcedDrawPolicy::Immediate,
            require_draw_before_pass: false,
            reverse_skips_heads_up: false,
        }
    }
}

impl RuleConfig {
    /// Create the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seat bounds.
    ///
    /// Panics if `min < 2`, `min > max`, or the deck cannot deal `max`
    /// hands and still flip a starting card.
    #[must_use]
    pub fn with_seats(mut self, min: usize, max: usize) -> Self {
        self.min_seats = min;
        self.max_seats = max;
        self.checked()
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self.checked()
    }

    /// Set the fallback color. Must be a suit.
    #[must_use]
    pub fn with_fallback_color(mut self, color: Color) -> Self {
        self.fallback_color = color;
        self.checked()
    }

    /// Set the forced-draw policy.
    #[must_use]
    pub fn with_forced_draw(mut self, policy: ForcedDrawPolicy) -> Self {
        self.forced_draw = policy;
        self
    }

    /// Require a draw before a pass.
    #[must_use]
    pub fn require_draw_before_pass(mut self) -> Self {
        self.require_draw_before_pass = true;
        self
    }

    /// Let reverse act as a skip with exactly two seats.
    #[must_use]
    pub fn reverse_skips_heads_up(mut self) -> Self {
        self.reverse_skips_heads_up = true;
        self
    }

    /// Fewest seats needed to start.
    #[must_use]
    pub fn min_seats(&self) -> usize {
        self.min_seats
    }

    /// Most seats a session accepts.
    #[must_use]
    pub fn max_seats(&self) -> usize {
        self.max_seats
    }

    /// Cards dealt to each seat at start.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    /// Active color after a wild played without a usable chosen color, and
    /// after a wild turned up as the first discard.
    #[must_use]
    pub fn fallback_color(&self) -> Color {
        self.fallback_color
    }

    /// How forced-draw debt is collected.
    #[must_use]
    pub fn forced_draw(&self) -> ForcedDrawPolicy {
        self.forced_draw
    }

    /// Is `PassTurn` rejected unless the seat drew during this turn?
    #[must_use]
    pub fn must_draw_before_pass(&self) -> bool {
        self.require_draw_before_pass
    }

    /// With exactly two seats, does reverse act as a skip (the player who
    /// reversed goes again)? Off by default: plain seat arithmetic hands the
    /// turn to the opponent.
    #[must_use]
    pub fn reverse_skips_in_heads_up(&self) -> bool {
        self.reverse_skips_heads_up
    }

    /// Check that the table can be played with one deck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_seats < 2 {
            return Err(ConfigError::TooFewSeats { min: self.min_seats });
        }
        if self.min_seats > self.max_seats {
            return Err(ConfigError::SeatBoundsInverted { min: self.min_seats, max: self.max_seats });
        }
        if self.hand_size == 0 {
            return Err(ConfigError::EmptyHands);
        }
        // Every hand dealt, plus one card to flip.
        if self.max_seats.saturating_mul(self.hand_size) >= crate::cards::DECK_SIZE {
            return Err(ConfigError::Undealable { seats: self.max_seats, hand_size: self.hand_size });
        }
        if !self.fallback_color.is_suit() {
            return Err(ConfigError::WildFallback(self.fallback_color));
        }
        Ok(())
    }

    fn checked(self) -> Self {
        if let Err(err) = self.validate() {
            panic!("{err}");
        }
        self
    }
}

/// Registry-level configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Rules applied to every session created by the registry.
    pub rules: RuleConfig,

    /// Length of generated session codes.
    pub code_length: usize,

    /// Root RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Lobby sessions idle for longer than this are swept even if a seat is
    /// still connected. `None` disables the idle rule.
    pub lobby_idle_timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            code_length: 6,
            seed: None,
            lobby_idle_timeout: None,
        }
    }
}

impl RegistryConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session rules.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Use a fixed root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the session code length.
    #[must_use]
    pub fn with_code_length(mut self, len: usize) -> Self {
        assert!(len >= 3, "Session codes shorter than 3 characters collide too often");
        self.code_length = len;
        self
    }

    /// Sweep lobbies idle for longer than `timeout`.
    #[must_use]
    pub fn with_lobby_idle_timeout(mut self, timeout: Duration) -> Self {
        self.lobby_idle_timeout = Some(timeout);
        self
    }
}
