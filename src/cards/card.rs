//! Card model: colors, faces, and immutable card values.
//!
//! A `Card` pairs a deck-unique `CardId` with its color and face. The face
//! carries the number value only for number cards, so a "skip with value 5"
//! cannot be represented.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Card color. `Wild` is only ever the printed color of wild cards; the
/// active color of a session is always one of the four suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Wild,
}

impl Color {
    /// The four playable suits, in deck composition order.
    pub const SUITS: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Is this one of the four suits?
    #[must_use]
    pub const fn is_suit(self) -> bool {
        !matches!(self, Color::Wild)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Wild => "wild",
        };
        f.write_str(name)
    }
}

/// Kind of a card, without the number value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Number,
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl CardKind {
    /// Wild cards may be declared onto anything.
    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, CardKind::Wild | CardKind::WildDrawFour)
    }

    /// Cards that add to the forced-draw debt.
    #[must_use]
    pub const fn is_draw(self) -> bool {
        matches!(self, CardKind::DrawTwo | CardKind::WildDrawFour)
    }

    /// Cards added to the forced-draw debt when played.
    #[must_use]
    pub const fn draw_penalty(self) -> u32 {
        match self {
            CardKind::DrawTwo => 2,
            CardKind::WildDrawFour => 4,
            _ => 0,
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardKind::Number => "number",
            CardKind::Skip => "skip",
            CardKind::Reverse => "reverse",
            CardKind::DrawTwo => "draw2",
            CardKind::Wild => "wild",
            CardKind::WildDrawFour => "wild4",
        };
        f.write_str(name)
    }
}

/// Printed face of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// Number card, value 0-9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Face {
    /// The kind of this face.
    #[must_use]
    pub const fn kind(self) -> CardKind {
        match self {
            Face::Number(_) => CardKind::Number,
            Face::Skip => CardKind::Skip,
            Face::Reverse => CardKind::Reverse,
            Face::DrawTwo => CardKind::DrawTwo,
            Face::Wild => CardKind::Wild,
            Face::WildDrawFour => CardKind::WildDrawFour,
        }
    }
}

/// An immutable card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Deck-unique identity.
    pub id: CardId,
    /// Printed color (`Wild` for wild cards).
    pub color: Color,
    /// Printed face.
    pub face: Face,
}

impl Card {
    /// Create a number card.
    ///
    /// Panics if `value > 9`: deck construction is the only caller and
    /// always passes 0-9.
    #[must_use]
    pub fn number(id: CardId, color: Color, value: u8) -> Self {
        assert!(value <= 9, "number cards carry 0-9, got {value}");
        Self { id, color, face: Face::Number(value) }
    }

    /// Create a colored action card (skip/reverse/draw-two).
    #[must_use]
    pub const fn action(id: CardId, color: Color, face: Face) -> Self {
        Self { id, color, face }
    }

    /// Create a wild card (`Face::Wild` or `Face::WildDrawFour`).
    #[must_use]
    pub const fn wild(id: CardId, face: Face) -> Self {
        Self { id, color: Color::Wild, face }
    }

    /// The card kind.
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        self.face.kind()
    }

    /// Number value, present only for number cards.
    #[must_use]
    pub const fn value(&self) -> Option<u8> {
        match self.face {
            Face::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Short label used in action log lines: the value for number cards,
    /// the kind name otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        match self.face {
            Face::Number(v) => v.to_string(),
            _ => self.kind().to_string(),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.label())
    }
}
