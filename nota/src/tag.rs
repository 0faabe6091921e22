use core::fmt;
use core::str::FromStr;

use crate::errors::{NotaError, Result};

/// Kind of entity a token can belong to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum EntityKind {
    /// Item name. (e.g. "nasi goreng")
    Item,

    /// Quantity. (e.g. "2", "satu")
    Quantity,

    /// Price. (e.g. "15rb", "rp20.000")
    Price,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "ITEM",
            Self::Quantity => "QTY",
            Self::Price => "PRICE",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "ITEM" => Some(Self::Item),
            "QTY" | "QUANTITY" => Some(Self::Quantity),
            "PRICE" => Some(Self::Price),
            _ => None,
        }
    }
}

/// BIO tag of a token.
///
/// A `Begin` tag always starts a new span. An `Inside` tag continues the most recent span of
/// the same kind, or starts one if there is none. Class names without a BIO prefix (`ITEM`,
/// `QTY`, `PRICE`) are read as `Inside`, so that consecutive tokens of a kind join one span.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Tag {
    #[default]
    Outside,
    Begin(EntityKind),
    Inside(EntityKind),
}

impl Tag {
    pub const fn kind(self) -> Option<EntityKind> {
        match self {
            Self::Outside => None,
            Self::Begin(kind) | Self::Inside(kind) => Some(kind),
        }
    }

    #[inline]
    pub fn is_kind(self, kind: EntityKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Outside => f.write_str("O"),
            Self::Begin(kind) => write!(f, "B-{}", kind.as_str()),
            Self::Inside(kind) => write!(f, "I-{}", kind.as_str()),
        }
    }
}

impl FromStr for Tag {
    type Err = NotaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "O" || s == "OTHER" {
            return Ok(Self::Outside);
        }
        let tag = if let Some(name) = s.strip_prefix("B-") {
            EntityKind::from_name(name).map(Self::Begin)
        } else if let Some(name) = s.strip_prefix("I-") {
            EntityKind::from_name(name).map(Self::Inside)
        } else {
            EntityKind::from_name(s).map(Self::Inside)
        };
        tag.ok_or_else(|| NotaError::invalid_argument("tag", format!("unknown tag: {s:?}")))
    }
}
