use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CommitType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
}

impl CommitType {
    pub fn all() -> &'static [CommitType] {
        &[
            CommitType::Feat,
            CommitType::Fix,
            CommitType::Docs,
            CommitType::Style,
            CommitType::Refactor,
            CommitType::Perf,
            CommitType::Test,
            CommitType::Build,
            CommitType::Ci,
            CommitType::Chore,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
            CommitType::Chore => "chore",
        }
    }

    /// Look up a type keyword. Keywords are lowercase; anything else is not
    /// a conventional type.
    pub fn parse(s: &str) -> Option<CommitType> {
        CommitType::all().iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BumpKind
// ---------------------------------------------------------------------------

/// Semantic version component to increment. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_kind_ordering() {
        assert!(BumpKind::Patch < BumpKind::Minor);
        assert!(BumpKind::Minor < BumpKind::Major);
        assert_eq!(
            [BumpKind::Minor, BumpKind::Major, BumpKind::Patch]
                .into_iter()
                .max(),
            Some(BumpKind::Major)
        );
    }

    #[test]
    fn commit_type_lookup() {
        for t in CommitType::all() {
            assert_eq!(CommitType::parse(t.as_str()), Some(*t));
        }
        assert_eq!(CommitType::parse("FEAT"), None);
        assert_eq!(CommitType::parse("wip"), None);
        assert_eq!(CommitType::parse(""), None);
    }

    #[test]
    fn bump_kind_serializes_snake_case() {
        let yaml = serde_yaml::to_string(&BumpKind::Minor).unwrap();
        assert_eq!(yaml.trim(), "minor");
    }
}
