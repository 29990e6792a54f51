use crate::commit::CommitRecord;
use crate::error::{Result, RulesmithError};
use crate::types::{BumpKind, CommitType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Fails with `VersionOverflow` when the bumped component is already
    /// `u64::MAX`.
    pub fn bump(self, kind: BumpKind) -> Result<Version> {
        let overflow = || RulesmithError::VersionOverflow(self.to_string());
        Ok(match kind {
            BumpKind::Major => Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpKind::Minor => {
                Version::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            BumpKind::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = RulesmithError;

    /// Exactly three dot-separated runs of ASCII digits. Signs, prefixes,
    /// pre-release and build suffixes are all rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RulesmithError::InvalidVersion(s.to_string());
        let parts: Vec<&str> = s.trim().split('.').collect();
        let &[major, minor, patch] = parts.as_slice() else {
            return Err(invalid());
        };
        let component = |p: &str| -> Result<u64> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            p.parse().map_err(|_| invalid())
        };
        Ok(Version::new(
            component(major)?,
            component(minor)?,
            component(patch)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Release planning
// ---------------------------------------------------------------------------

/// How a commit range was classified and the bump it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    pub bump: BumpKind,
    pub breaking: usize,
    pub features: usize,
    pub fixes: usize,
    pub other: usize,
}

impl ReleasePlan {
    pub fn total(&self) -> usize {
        self.breaking + self.features + self.fixes + self.other
    }
}

/// Classify every commit. A breaking commit counts only as breaking, a
/// feature only as a feature. Bump priority is major, then minor, then patch;
/// an empty range is a patch release.
pub fn plan(commits: &[CommitRecord]) -> ReleasePlan {
    let mut plan = ReleasePlan {
        bump: BumpKind::Patch,
        breaking: 0,
        features: 0,
        fixes: 0,
        other: 0,
    };

    for commit in commits {
        if commit.is_breaking() {
            plan.breaking += 1;
            continue;
        }
        match commit.conventional().map(|c| c.kind) {
            Some(CommitType::Feat) => plan.features += 1,
            Some(CommitType::Fix) => plan.fixes += 1,
            _ => plan.other += 1,
        }
    }

    plan.bump = if plan.breaking > 0 {
        BumpKind::Major
    } else if plan.features > 0 {
        BumpKind::Minor
    } else {
        BumpKind::Patch
    };
    plan
}

pub fn plan_bump(commits: &[CommitRecord]) -> BumpKind {
    plan(commits).bump
}

/// Parse `current`, plan the commits, and return the bumped version.
pub fn next_version(current: &str, commits: &[CommitRecord]) -> Result<Version> {
    let version: Version = current.parse()?;
    version.bump(plan_bump(commits))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
