use crate::error::{Result, RulesmithError};
use crate::paths;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// RuleDocument
// ---------------------------------------------------------------------------

/// A named rule file, held as its lines. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDocument {
    name: String,
    lines: Vec<String>,
}

impl RuleDocument {
    /// Build a document from raw text. Trailing blank lines are dropped so the
    /// composer controls separation between documents.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        Self {
            name: name.into(),
            lines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

// ---------------------------------------------------------------------------
// RuleLibrary
// ---------------------------------------------------------------------------

/// All rule documents available for composition, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    docs: BTreeMap<String, RuleDocument>,
}

impl RuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.md` file directly inside `dir`. The file stem is the
    /// document name; subdirectories are ignored.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(RulesmithError::RulesDirNotFound(dir.to_path_buf()));
        }
        let mut library = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(paths::RULE_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            library.insert(RuleDocument::from_text(name, &text));
        }
        Ok(library)
    }

    /// Add or replace a document.
    pub fn insert(&mut self, doc: RuleDocument) {
        self.docs.insert(doc.name.clone(), doc);
    }

    pub fn get(&self, name: &str) -> Result<&RuleDocument> {
        self.docs
            .get(name)
            .ok_or_else(|| RulesmithError::DocumentNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.docs.contains_key(name)
    }

    /// Document names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = &RuleDocument> {
        self.docs.values()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl FromIterator<RuleDocument> for RuleLibrary {
    fn from_iter<I: IntoIterator<Item = RuleDocument>>(iter: I) -> Self {
        let mut library = Self::new();
        for doc in iter {
            library.insert(doc);
        }
        library
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
