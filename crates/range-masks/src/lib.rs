// SPDX-FileCopyrightText: 2025 xfnw
//
// SPDX-License-Identifier: MIT

//! split integer ranges into tcam pattern/mask entries
//!
//! ```rust
//! let rules = range_masks::decompose(0x0a000000, 0x0a0000ff).unwrap();
//! assert_eq!(rules.len(), 1);
//! assert_eq!(rules.to_string(), "patt: 0a000000  (167772160 - 167772415)\nmask: ffffff00\n");
//! ```

use std::{fmt, net::Ipv4Addr};

#[derive(Debug, Clone, PartialEq, Eq, foxerror::FoxError)]
pub enum Error {
    /// end must be below 0xffffffff unless start is 0
    RangeTooLarge { st: u32, end: u32 },
    /// range needs more tcam entries than a rule can hold
    CapacityExceeded { st: u32, end: u32 },
    /// start is after end
    InvertedRange { st: u32, end: u32 },
}

/// a single tcam entry
///
/// `mask` is always a run of set bits from the most significant bit,
/// and `pattern` never has bits set where `mask` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixEntry {
    pattern: u32,
    mask: u32,
}

impl PrefixEntry {
    /// create an entry, if the mask is contiguous and covers the pattern
    #[must_use]
    pub const fn new(pattern: u32, mask: u32) -> Option<Self> {
        let wild = !mask;
        if wild & wild.wrapping_add(1) != 0 || pattern & wild != 0 {
            return None;
        }
        Some(Self { pattern, mask })
    }

    #[must_use]
    pub const fn pattern(&self) -> u32 {
        self.pattern
    }

    #[must_use]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// lowest value in the block
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.pattern
    }

    /// highest value in the block
    #[must_use]
    pub const fn last(&self) -> u32 {
        self.pattern | !self.mask
    }

    /// number of values in the block
    ///
    /// this is a `u64` since the block matching everything has 2^32 values
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        u64::from(!self.mask) + 1
    }

    /// number of leading set bits in the mask
    #[must_use]
    pub const fn prefix_len(&self) -> u32 {
        self.mask.leading_ones()
    }

    /// check a value against the entry, the same way a tcam would
    #[must_use]
    pub const fn matches(&self, value: u32) -> bool {
        value & self.mask == self.pattern
    }

    /// display the entry as `a.b.c.d/len`
    #[must_use]
    pub fn prefix(&self) -> Prefix {
        Prefix(*self)
    }
}

impl fmt::Display for PrefixEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "patt: {:08x}  ({} - {})\nmask: {:08x}",
            self.pattern,
            self.first(),
            self.last(),
            self.mask
        )
    }
}

/// a [`PrefixEntry`] in dotted-decimal prefix notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix(PrefixEntry);

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.0.pattern), self.0.prefix_len())
    }
}

/// the tcam entries making up one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    entries: Vec<PrefixEntry>,
}

impl RuleSet {
    /// the most entries a single rule may use
    pub const CAPACITY: usize = 32;

    fn push(&mut self, entry: PrefixEntry) -> bool {
        if self.entries.len() >= Self::CAPACITY {
            return false;
        }
        self.entries.push(entry);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[PrefixEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrefixEntry> {
        self.entries.iter()
    }

    /// check if any entry matches the value
    #[must_use]
    pub fn matches(&self, value: u32) -> bool {
        self.entries.iter().any(|e| e.matches(value))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a PrefixEntry;
    type IntoIter = std::slice::Iter<'a, PrefixEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// split the inclusive range `st..=end` into as few entries as possible
///
/// entries are produced from the top of the range downwards, each one
/// being the biggest aligned block that ends at the current top without
/// going below `st`.
///
/// # Errors
///
/// fails if `end` is `u32::MAX` while `st` is not 0, if `st` is after
/// `end`, or if the range needs more than [`RuleSet::CAPACITY`] entries.
pub fn decompose(st: u32, end: u32) -> Result<RuleSet, Error> {
    if end == u32::MAX && st != 0 {
        return Err(Error::RangeTooLarge { st, end });
    }
    if st > end {
        return Err(Error::InvertedRange { st, end });
    }

    let mut rules = RuleSet::default();
    let mut top = end;
    loop {
        let mut patt = top;
        let mut mask = u32::MAX;
        let mut bit = 1u32;

        // widen while the top is the last value of a bigger block
        while patt & bit != 0 {
            patt ^= bit;
            bit <<= 1;
            mask <<= 1;
        }

        // then narrow until the block no longer reaches below st
        while patt < st {
            bit >>= 1;
            patt |= bit;
            mask |= bit;
        }

        if !rules.push(PrefixEntry {
            pattern: patt,
            mask,
        }) {
            return Err(Error::CapacityExceeded { st, end });
        }

        // patt is the lowest value covered so far, 0 has nothing below it
        if patt == 0 || patt - 1 < st {
            return Ok(rules);
        }
        top = patt - 1;
    }
}

/// how an "accept `start..=end`" policy ended up being encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingChoice {
    /// accept the range itself
    Direct(RuleSet),
    /// reject `0..start`, then accept `0..=end`
    Split { reject: RuleSet, accept: RuleSet },
}

impl EncodingChoice {
    /// total number of tcam entries used
    #[must_use]
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Direct(rules) => rules.len(),
            Self::Split { reject, accept } => reject.len() + accept.len(),
        }
    }

    /// evaluate the policy for a value, with reject entries taking priority
    #[must_use]
    pub fn accepts(&self, value: u32) -> bool {
        match self {
            Self::Direct(rules) => rules.matches(value),
            Self::Split { reject, accept } => !reject.matches(value) && accept.matches(value),
        }
    }
}

/// pick whichever of the direct or split encodings uses fewer entries
///
/// the direct form wins ties, and is the only option when `start` is 0.
/// if the direct form does not fit in a rule at all, the split form is
/// used instead, since each half of it always fits.
///
/// # Errors
///
/// fails for the same inputs [`decompose`] rejects, other than a direct
/// form that is too big.
pub fn choose_best_encoding(start: u32, end: u32) -> Result<EncodingChoice, Error> {
    let Some(below) = start.checked_sub(1) else {
        return decompose(start, end).map(EncodingChoice::Direct);
    };

    let direct = match decompose(start, end) {
        Ok(rules) => Some(rules),
        Err(Error::CapacityExceeded { .. }) => None,
        Err(e) => return Err(e),
    };
    let reject = decompose(0, below)?;
    let accept = decompose(0, end)?;

    Ok(match direct {
        Some(direct) if direct.len() <= reject.len() + accept.len() => {
            EncodingChoice::Direct(direct)
        }
        _ => EncodingChoice::Split { reject, accept },
    })
}
