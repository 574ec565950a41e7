//! Move intents and the squares they name.
//!
//! A rendering surface turns a drag-and-drop gesture into a [`MoveIntent`].
//! Squares use algebraic notation: file `a`..`h`, rank `1`..`8`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RulesError;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// One of the 64 board squares.
///
/// Stored as zero-based file and rank, so `a1` is `(0, 0)` and `h8` is
/// `(7, 7)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Builds a square from zero-based coordinates. Returns `None` when
    /// either is off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Zero-based file (`a` = 0).
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank (`1` = 0).
    pub fn rank(self) -> u8 {
        self.rank
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidSquare(s.to_owned());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::new(file, rank).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Square {
    type Error = RulesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

// ---------------------------------------------------------------------------
// Promotion
// ---------------------------------------------------------------------------

/// Piece a pawn becomes when it reaches the last rank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Lowercase piece letter, as used in move notation.
    pub fn letter(self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'q' => Some(Self::Queen),
            'r' => Some(Self::Rook),
            'b' => Some(Self::Bishop),
            'n' => Some(Self::Knight),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MoveIntent
// ---------------------------------------------------------------------------

/// A move the local participant wants to make.
///
/// The engine decides whether it's legal; the promotion piece only matters
/// when the move actually promotes, and defaults to a queen.
///
/// Parses from and prints as compact coordinate notation: `"e2e4"`, or
/// `"e7e8n"` for an under-promotion. A queen promotion is implied and not
/// printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub promotion: Promotion,
}

impl MoveIntent {
    /// A move with the default (queen) promotion.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Promotion::default(),
        }
    }

    /// Replaces the promotion piece.
    pub fn promoting_to(mut self, promotion: Promotion) -> Self {
        self.promotion = promotion;
        self
    }
}

impl FromStr for MoveIntent {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, rest) = s
            .split_at_checked(2)
            .ok_or_else(|| RulesError::InvalidSquare(s.to_owned()))?;
        let (to, promotion) = rest
            .split_at_checked(2)
            .ok_or_else(|| RulesError::InvalidSquare(rest.to_owned()))?;

        let promotion = match promotion.chars().collect::<Vec<_>>().as_slice() {
            [] => Promotion::default(),
            [letter] => Promotion::from_letter(*letter).ok_or_else(|| {
                RulesError::IllegalMove(format!("unknown promotion piece in {s:?}"))
            })?,
            _ => {
                return Err(RulesError::IllegalMove(format!(
                    "trailing characters in {s:?}"
                )));
            }
        };

        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
            promotion,
        })
    }
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion != Promotion::Queen {
            write!(f, "{}", self.promotion.letter())?;
        }
        Ok(())
    }
}
