use serde::{Deserialize, Serialize};
use std::fmt;

const CHR_BITS: u32 = 8;
const INDEX_BITS: u32 = u64::BITS - CHR_BITS;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Identifier of one (vector-valued) unknown
///
/// Symbol keys pack an ASCII character into the top byte and an index into the
/// remaining bits, so `Key::symbol('x', 1)` displays as `x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(pub u64);

impl Key {
    pub fn new(raw: u64) -> Self {
        Key(raw)
    }

    /// Build a symbol key; non-ASCII characters and oversized indices are truncated
    pub fn symbol(chr: char, index: u64) -> Self {
        let c = (chr as u32 & 0xff) as u64;
        Key((c << INDEX_BITS) | (index & INDEX_MASK))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Character part of a symbol key (`'\0'` for plain keys)
    pub fn chr(&self) -> char {
        ((self.0 >> INDEX_BITS) as u8) as char
    }

    pub fn index(&self) -> u64 {
        self.0 & INDEX_MASK
    }
}

impl From<u64> for Key {
    fn from(raw: u64) -> Self {
        Key(raw)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.chr();
        if c.is_ascii_alphanumeric() {
            write!(f, "{}{}", c, self.index())
        } else {
            write!(f, "{}", self.0)
        }
    }
}
