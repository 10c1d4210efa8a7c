//! # Token Records

use core::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// Display text carried by unused placeholder tokens.
pub const UNUSED_DISPLAY: &str = "<UNUSED>";

/// Bitset of token flags.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// No flags; an ordinary piece.
    pub const NONE: Self = Self(0);

    /// The unknown token.
    pub const UNKNOWN: Self = Self(1);

    /// A control (special) token with no raw piece.
    pub const CONTROL: Self = Self(2);

    /// A byte-fallback token, covering exactly one raw byte.
    pub const BYTE: Self = Self(4);

    /// An unused placeholder slot.
    pub const UNUSED: Self = Self(8);

    /// Build from raw bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Are no flags set?
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Are all the flags of `other` set?
    pub const fn contains(
        self,
        other: Self,
    ) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TokenFlags {
    type Output = Self;

    fn bitor(
        self,
        rhs: Self,
    ) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TokenFlags {
    fn bitor_assign(
        &mut self,
        rhs: Self,
    ) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TokenFlags {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let names = [
            (Self::UNKNOWN, "UNKNOWN"),
            (Self::CONTROL, "CONTROL"),
            (Self::BYTE, "BYTE"),
            (Self::UNUSED, "UNUSED"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();

        write!(f, "TokenFlags({:#04x}: {})", self.0, names.join(" | "))
    }
}

/// One vocabulary entry.
///
/// The `piece` is the raw byte sequence the token decodes to, and must be
/// at most 255 bytes; `display` is a UTF-8 rendering of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token id; also its position in the token table.
    pub id: usize,

    /// The token flags.
    pub flags: TokenFlags,

    /// The raw piece bytes.
    pub piece: Vec<u8>,

    /// The display string.
    pub display: String,

    /// The merge weight, or native score.
    pub weight: f32,
}

impl Token {
    /// Construct a new token.
    pub fn new(
        id: usize,
        flags: TokenFlags,
        piece: impl Into<Vec<u8>>,
        display: impl Into<String>,
        weight: f32,
    ) -> Self {
        Self {
            id,
            flags,
            piece: piece.into(),
            display: display.into(),
            weight,
        }
    }

    /// An unused placeholder for `id`, with an empty piece.
    pub fn unused(id: usize) -> Self {
        Self::new(id, TokenFlags::UNUSED, Vec::new(), UNUSED_DISPLAY, 0.0)
    }

    /// A control token for `id`, with an empty piece.
    pub fn control(
        id: usize,
        display: impl Into<String>,
    ) -> Self {
        Self::new(id, TokenFlags::CONTROL, Vec::new(), display, 0.0)
    }

    /// Is this an unused placeholder?
    pub fn is_unused(&self) -> bool {
        self.flags.contains(TokenFlags::UNUSED)
    }
}
