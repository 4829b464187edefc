//! Semantic version value used for WhiskyWine and bottle metadata.

use crate::{Result, WhiskyError};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LEADING_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

/// A `major.minor.patch` version, ordered lexicographically by its components.
///
/// Field order matters: the derived `Ord` compares `major`, then `minor`,
/// then `patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub const ZERO: SemanticVersion = SemanticVersion::new(0, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `MAJOR.MINOR.PATCH` string.
    ///
    /// Pre-release and build suffixes are accepted but do not take part in
    /// ordering.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed =
            semver::Version::parse(input.trim()).map_err(|e| WhiskyError::InvalidVersion {
                input: input.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Parse whatever version a tool printed, e.g. `wine-9.0 (Staging)`.
    ///
    /// Takes the first run of dotted numbers, padding missing components with
    /// zero. Falls back to `0.0.0` when nothing usable is found.
    pub fn parse_lenient(input: &str) -> Self {
        let Some(caps) = LEADING_VERSION.captures(input) else {
            return Self::ZERO;
        };
        let component = |idx: usize| -> Option<u64> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        match (component(1), component(2), component(3)) {
            (Some(major), Some(minor), Some(patch)) => Self::new(major, minor, patch),
            _ => Self::ZERO,
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = WhiskyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
