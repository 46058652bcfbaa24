//! Timestamp names for snapshot directories

use crate::{Error, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Directory name format for snapshots (local time, second resolution)
pub const NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

const NAME_LEN: usize = 15;

/// Name of one snapshot, e.g. `20250314_213005`
///
/// The fixed-width format makes lexicographic order equal to chronological
/// order, so `Ord` on the parsed timestamp and on the string agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveName(NaiveDateTime);

impl ArchiveName {
    /// Name for a snapshot taken right now
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// Name for the given local time, truncated to whole seconds
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Local timestamp this name encodes
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse a directory name, returning `None` for anything that is not a snapshot
    pub fn parse(name: &str) -> Option<Self> {
        if name.len() != NAME_LEN {
            return None;
        }
        NaiveDateTime::parse_from_str(name, NAME_FORMAT).ok().map(Self)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(NAME_FORMAT))
    }
}

impl FromStr for ArchiveName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidArchiveName(s.to_string()))
    }
}
