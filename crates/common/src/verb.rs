//! HTTP verb permission codec
//!
//! Maps verb tokens found in path items ("get", "post", ...) to bits in a
//! permission mask and back. Tokens outside the fixed verb set are not errors
//! for callers: they classify as [`VerbClass::PassThrough`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;
use thiserror::Error;

/// Token is not one of the HTTP verbs the permission system understands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized HTTP verb: {0}")]
pub struct UnrecognizedVerb(pub String);

/// Bitset with one bit per recognized HTTP verb
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerbMask(u32);

const VERBS: [(&str, VerbMask); 11] = [
    ("get", VerbMask::GET),
    ("post", VerbMask::POST),
    ("put", VerbMask::PUT),
    ("patch", VerbMask::PATCH),
    ("merge", VerbMask::MERGE),
    ("delete", VerbMask::DELETE),
    ("options", VerbMask::OPTIONS),
    ("head", VerbMask::HEAD),
    ("copy", VerbMask::COPY),
    ("trace", VerbMask::TRACE),
    ("connect", VerbMask::CONNECT),
];

impl VerbMask {
    pub const NONE: VerbMask = VerbMask(0);
    pub const GET: VerbMask = VerbMask(1);
    pub const POST: VerbMask = VerbMask(2);
    pub const PUT: VerbMask = VerbMask(4);
    pub const PATCH: VerbMask = VerbMask(8);
    pub const MERGE: VerbMask = VerbMask(16);
    pub const DELETE: VerbMask = VerbMask(32);
    pub const OPTIONS: VerbMask = VerbMask(64);
    pub const HEAD: VerbMask = VerbMask(128);
    pub const COPY: VerbMask = VerbMask(256);
    pub const TRACE: VerbMask = VerbMask(512);
    pub const CONNECT: VerbMask = VerbMask(1024);
    pub const ALL: VerbMask = VerbMask(2047);

    pub const fn from_bits(bits: u32) -> Self {
        VerbMask(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True iff every bit of `verb` is set in `self`
    pub const fn contains(self, verb: VerbMask) -> bool {
        self.0 & verb.0 == verb.0
    }

    /// True iff the two masks share at least one bit
    pub const fn intersects(self, other: VerbMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Map a single verb token to its bit (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// use apidoc_aggregator_common::VerbMask;
    ///
    /// assert_eq!(VerbMask::from_token("GET"), Ok(VerbMask::GET));
    /// assert!(VerbMask::from_token("parameters").is_err());
    /// ```
    pub fn from_token(token: &str) -> Result<Self, UnrecognizedVerb> {
        VERBS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, mask)| *mask)
            .ok_or_else(|| UnrecognizedVerb(token.to_string()))
    }

    /// Union of a list of verb tokens, failing on the first unknown one
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, UnrecognizedVerb>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .try_fold(VerbMask::NONE, |acc, token| {
                Ok(acc | VerbMask::from_token(token.as_ref())?)
            })
    }

    /// Lowercase verb tokens set in this mask, in bit order
    ///
    /// # Examples
    /// ```
    /// use apidoc_aggregator_common::VerbMask;
    ///
    /// assert_eq!((VerbMask::GET | VerbMask::DELETE).verbs(), vec!["get", "delete"]);
    /// ```
    pub fn verbs(self) -> Vec<&'static str> {
        VERBS
            .iter()
            .filter(|(_, mask)| self.contains(*mask))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for VerbMask {
    type Output = VerbMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        VerbMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for VerbMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for VerbMask {
    type Output = VerbMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        VerbMask(self.0 & rhs.0)
    }
}

impl FromStr for VerbMask {
    type Err = UnrecognizedVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerbMask::from_token(s)
    }
}

impl fmt::Display for VerbMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.verbs().join("|"))
    }
}

/// A path-item key is either a permission-filterable verb or metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
    Recognized(VerbMask),
    PassThrough,
}

/// Convert a verb token to its mask bit
pub fn to_mask(token: &str) -> Result<VerbMask, UnrecognizedVerb> {
    VerbMask::from_token(token)
}

/// Classify a path-item key without treating unknown tokens as failures
pub fn classify(token: &str) -> VerbClass {
    match VerbMask::from_token(token) {
        Ok(mask) => VerbClass::Recognized(mask),
        Err(_) => VerbClass::PassThrough,
    }
}

/// True iff the verb's bit is set in `mask`
pub fn has_bit(mask: VerbMask, verb: VerbMask) -> bool {
    mask.intersects(verb)
}
