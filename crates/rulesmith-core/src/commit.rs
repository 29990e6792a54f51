use crate::types::CommitType;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Footer tokens that flag a backward-incompatible change.
pub const BREAKING_TOKENS: [&str; 2] = ["BREAKING CHANGE", "BREAKING-CHANGE"];

// ---------------------------------------------------------------------------
// CommitRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CommitRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: None,
        }
    }

    /// One record per message, in order.
    pub fn from_messages<I, S>(messages: I) -> Vec<CommitRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        messages.into_iter().map(CommitRecord::new).collect()
    }

    /// First line of the message.
    pub fn header(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }

    /// Parsed header, if it follows the conventional-commit grammar.
    pub fn conventional(&self) -> Option<ConventionalCommit> {
        ConventionalCommit::parse(self.header())
    }

    /// True for a `!` after the type/scope or a breaking-change footer.
    pub fn is_breaking(&self) -> bool {
        self.conventional().is_some_and(|c| c.breaking) || has_breaking_footer(&self.message)
    }

    pub fn is_feature(&self) -> bool {
        self.conventional()
            .is_some_and(|c| c.kind == CommitType::Feat)
    }
}

// ---------------------------------------------------------------------------
// ConventionalCommit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    pub kind: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub subject: String,
}

static HEADER_RE: OnceLock<Regex> = OnceLock::new();

fn header_re() -> &'static Regex {
    HEADER_RE.get_or_init(|| {
        Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()]*)\))?(?P<bang>!)?: (?P<subject>\S.*)$")
            .unwrap()
    })
}

impl ConventionalCommit {
    /// Parse `type(scope)!: subject` or `type: subject`. Returns `None` when
    /// the header is not conventional or the type is outside the known set.
    pub fn parse(header: &str) -> Option<Self> {
        let caps = header_re().captures(header.trim())?;
        let kind = CommitType::parse(caps.name("type")?.as_str())?;
        let scope = caps
            .name("scope")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        Some(Self {
            kind,
            scope,
            breaking: caps.name("bang").is_some(),
            subject: caps.name("subject")?.as_str().trim().to_string(),
        })
    }
}

/// A footer line (any line after the header) opening with a breaking token,
/// using either the `token: value` or `token #value` separator.
pub fn has_breaking_footer(message: &str) -> bool {
    message.lines().skip(1).any(|line| {
        let line = line.trim_start();
        BREAKING_TOKENS.iter().any(|token| {
            line.strip_prefix(token)
                .is_some_and(|rest| rest.starts_with(':') || rest.starts_with(" #"))
        })
    })
}

/// Split raw commit input into messages.
///
/// Input holding NUL bytes (`git log -z --format=%B`) is split on NUL, each
/// chunk being one multi-line message. Otherwise every non-blank line is a
/// message on its own.
pub fn split_messages(input: &str) -> Vec<String> {
    if input.contains('\0') {
        input
            .split('\0')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        input
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
