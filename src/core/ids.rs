//! Identifiers for cards, players, connections, and sessions.
//!
//! ## Layout
//!
//! - `CardId`: 0..108, unique within one deck. Assigned in composition
//!   order before the first shuffle, so an id never changes for the life
//!   of a session.
//! - `PlayerId`: random v4 UUID, globally unique across sessions.
//! - `ConnectionId`: opaque handle owned by the transport. The engine
//!   stores it only to address views; it never reads from it.
//! - `SessionCode`: short, human-shareable, uppercase alphanumeric code.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::rng::GameRng;

/// Identifier for a card within a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Globally unique player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Mint a random v4 id from the given RNG.
    ///
    /// Drawing the bytes from a `GameRng` keeps seeded registries fully
    /// reproducible.
    #[must_use]
    pub fn random(rng: &mut GameRng) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.bytes16()).into_uuid())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-owned connection handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}

/// Characters used for session codes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Rejected session code text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid session code {0:?}: expected non-empty ASCII alphanumerics")]
pub struct InvalidSessionCode(pub String);

/// Human-shareable session code.
///
/// Codes are case-insensitive: parsing normalizes to uppercase, so
/// `"ab12cd"` and `"AB12CD"` name the same session. Deserialization goes
/// through the same normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Parse and normalize user-supplied code text.
    pub fn parse(text: &str) -> Result<Self, InvalidSessionCode> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidSessionCode(text.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Generate a random code of `len` characters.
    ///
    /// Uniqueness against live sessions is the caller's job.
    #[must_use]
    pub fn random(rng: &mut GameRng, len: usize) -> Self {
        let code = (0..len)
            .map(|_| {
                let idx = rng.gen_range_usize(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    /// Borrow the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionCode {
    type Error = InvalidSessionCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for SessionCode {
    type Err = InvalidSessionCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_display() {
        assert_eq!(format!("{}", CardId::new(42)), "Card(42)");
        assert_eq!(CardId::new(7).raw(), 7);
    }

    #[test]
    fn test_session_code_normalizes_case() {
        let lower = SessionCode::parse("ab12cd").unwrap();
        let upper = SessionCode::parse("AB12CD").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "AB12CD");
    }

    #[test]
    fn test_session_code_rejects_garbage() {
        assert!(SessionCode::parse("").is_err());
        assert!(SessionCode::parse("   ").is_err());
        assert!(SessionCode::parse("AB-12").is_err());
        assert!(SessionCode::parse("ÄBC").is_err());
    }

    #[test]
    fn test_session_code_trims() {
        assert_eq!(SessionCode::parse("  xy9 ").unwrap().as_str(), "XY9");
    }

    #[test]
    fn test_random_code_shape() {
        let mut rng = GameRng::new(7);
        for _ in 0..50 {
            let code = SessionCode::random(&mut rng, 6);
            assert_eq!(code.as_str().len(), 6);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_random_code_deterministic() {
        let mut a = GameRng::new(99);
        let mut b = GameRng::new(99);
        assert_eq!(SessionCode::random(&mut a, 6), SessionCode::random(&mut b, 6));
    }

    #[test]
    fn test_player_id_deterministic_and_v4() {
        let mut a = GameRng::new(1);
        let mut b = GameRng::new(1);
        let id_a = PlayerId::random(&mut a);
        let id_b = PlayerId::random(&mut b);
        assert_eq!(id_a, id_b);
        assert_eq!(id_a.0.get_version_num(), 4);
        assert_ne!(id_a, PlayerId::random(&mut a));
    }

    #[test]
    fn test_session_code_serde_normalizes() {
        let code: SessionCode = serde_json::from_str("\"qwe123\"").unwrap();
        assert_eq!(code.as_str(), "QWE123");
        assert!(serde_json::from_str::<SessionCode>("\"no way\"").is_err());
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"QWE123\"");
    }
}
