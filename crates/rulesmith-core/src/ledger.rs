//! Checklist progress documents (`TODO.md` and friends).
//!
//! A checklist is Markdown: headings split it into sections, and lines such
//! as `- [ ] write parser`, `- [x] write parser (done: 2026-01-02T10:00:00Z)`
//! or `- [?] deploy (waiting for credentials)` are items. Every other line is
//! kept verbatim so that parsing and rendering an unchanged document only
//! strips trailing whitespace.

use crate::error::{Result, RulesmithError};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

const DONE_PREFIX: &str = "done:";

// ---------------------------------------------------------------------------
// ItemState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemState {
    Pending,
    Done,
    Blocked { reason: String },
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Pending => "pending",
            ItemState::Done => "done",
            ItemState::Blocked { .. } => "blocked",
        }
    }

    fn mark(&self) -> char {
        match self {
            ItemState::Pending => ' ',
            ItemState::Done => 'x',
            ItemState::Blocked { .. } => '?',
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChecklistItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    description: String,
    #[serde(flatten)]
    state: ItemState,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(skip)]
    indent: String,
    #[serde(skip)]
    bullet: char,
    /// The line this item was read from. Cleared on mutation, after which the
    /// item renders in canonical form.
    #[serde(skip)]
    source: Option<String>,
}

impl ChecklistItem {
    pub fn pending(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            state: ItemState::Pending,
            completed_at: None,
            note: None,
            indent: String::new(),
            bullet: '-',
            source: None,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn blocked_reason(&self) -> Option<&str> {
        match &self.state {
            ItemState::Blocked { reason } => Some(reason),
            _ => None,
        }
    }

    fn render(&self) -> String {
        if let Some(src) = &self.source {
            return src.trim_end().to_string();
        }
        let mut line = format!(
            "{}{} [{}] {}",
            self.indent,
            self.bullet,
            self.state.mark(),
            self.description
        );
        match &self.state {
            ItemState::Done => {
                if let Some(at) = self.completed_at {
                    let ts = format_timestamp(at);
                    match &self.note {
                        Some(note) => line.push_str(&format!(" ({DONE_PREFIX} {ts}; {note})")),
                        None => line.push_str(&format!(" ({DONE_PREFIX} {ts})")),
                    }
                }
            }
            // A description ending in `)` keeps an explicit `()` for an empty reason
            ItemState::Blocked { reason }
                if !reason.is_empty() || self.description.ends_with(')') =>
            {
                line.push_str(&format!(" ({reason})"));
            }
            _ => {}
        }
        line
    }
}

// ---------------------------------------------------------------------------
// Section / Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Item(ChecklistItem),
    /// Prose, blank lines, code: anything that is not an item.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Raw heading line. `None` for lines before the first heading.
    heading: Option<String>,
    entries: Vec<Entry>,
}

impl Section {
    /// Heading text without the leading `#` marks.
    pub fn title(&self) -> Option<&str> {
        self.heading
            .as_deref()
            .map(|h| h.trim_start().trim_start_matches('#').trim())
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Item(item) => Some(item),
            Entry::Text(_) => None,
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Index just past the last non-blank entry.
    fn append_position(&self) -> usize {
        self.entries
            .iter()
            .rposition(|e| !matches!(e, Entry::Text(t) if t.trim().is_empty()))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Checklist {
    sections: Vec<Section>,
}

static ITEM_RE: OnceLock<Regex> = OnceLock::new();

fn item_re() -> &'static Regex {
    ITEM_RE.get_or_init(|| {
        Regex::new(r"^(?P<indent>[ \t]*)(?P<bullet>[-*+]) \[(?P<mark>[ xX?])\] (?P<rest>.*)$")
            .unwrap()
    })
}

impl Checklist {
    /// Parse checklist text. Never fails: lines that are not items or
    /// headings are kept as free text. Fenced code blocks are opaque.
    pub fn parse(text: &str) -> Self {
        let mut sections = vec![Section {
            heading: None,
            entries: Vec::new(),
        }];
        let mut in_fence = false;

        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
            } else if !in_fence && line.starts_with('#') {
                sections.push(Section {
                    heading: Some(line.trim_end().to_string()),
                    entries: Vec::new(),
                });
                continue;
            }

            let entry = if in_fence {
                Entry::Text(line.to_string())
            } else {
                parse_item(line).map_or_else(|| Entry::Text(line.to_string()), Entry::Item)
            };
            if let Some(current) = sections.last_mut() {
                current.entries.push(entry);
            }
        }

        if sections.len() > 1 && sections[0].entries.is_empty() {
            sections.remove(0);
        }
        Self { sections }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::atomic_write(path, self.render().as_bytes())
    }

    /// Serialize back to checklist text, one trailing newline when non-empty.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for section in &self.sections {
            if let Some(h) = &section.heading {
                lines.push(h.trim_end().to_string());
            }
            for entry in &section.entries {
                lines.push(match entry {
                    Entry::Item(item) => item.render(),
                    Entry::Text(t) => t.trim_end().to_string(),
                });
            }
        }
        finish(lines)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.sections.iter().flat_map(Section::items)
    }

    /// First item whose description equals `item_ref` exactly.
    pub fn find(&self, item_ref: &str) -> Option<&ChecklistItem> {
        self.items().find(|i| i.description == item_ref)
    }

    fn find_mut(&mut self, item_ref: &str) -> Result<&mut ChecklistItem> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.entries.iter_mut())
            .find_map(|e| match e {
                Entry::Item(item) if item.description == item_ref => Some(item),
                _ => None,
            })
            .ok_or_else(|| RulesmithError::ItemNotFound(item_ref.to_string()))
    }

    /// Mark an item done. Pending and blocked items transition; an item that
    /// is already done only gets its timestamp and note replaced.
    pub fn mark_done(
        &mut self,
        item_ref: &str,
        at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<()> {
        let note = note.map(single_line).filter(|n| !n.is_empty());
        if let Some(n) = &note {
            check_balanced(n)?;
        }
        let item = self.find_mut(item_ref)?;
        item.state = ItemState::Done;
        item.completed_at = Some(at);
        item.note = note;
        item.source = None;
        Ok(())
    }

    /// Mark a pending item blocked. Re-blocking replaces the reason; a done
    /// item cannot be blocked.
    pub fn mark_blocked(&mut self, item_ref: &str, reason: &str) -> Result<()> {
        let reason = single_line(reason);
        check_balanced(&reason)?;
        let item = self.find_mut(item_ref)?;
        if item.state == ItemState::Done {
            return Err(RulesmithError::InvalidTransition {
                item: item_ref.to_string(),
                from: ItemState::Done.to_string(),
                to: "blocked".to_string(),
            });
        }
        item.state = ItemState::Blocked { reason };
        item.completed_at = None;
        item.note = None;
        item.source = None;
        Ok(())
    }

    /// Append a pending item to the end of the section titled `section`,
    /// creating a `##` section at the end of the document if none matches.
    pub fn add_item(&mut self, section: &str, description: &str) {
        let item = Entry::Item(ChecklistItem::pending(single_line(description)));
        let title = section.trim();

        if let Some(existing) = self
            .sections
            .iter_mut()
            .find(|s| s.title() == Some(title))
        {
            let pos = existing.append_position();
            existing.entries.insert(pos, item);
            return;
        }

        if let Some(last) = self.sections.last_mut() {
            let ends_blank = matches!(last.entries.last(), Some(Entry::Text(t)) if t.trim().is_empty());
            if !ends_blank && (last.heading.is_some() || !last.entries.is_empty()) {
                last.entries.push(Entry::Text(String::new()));
            }
        }
        self.sections.push(Section {
            heading: Some(format!("## {title}")),
            entries: vec![item],
        });
    }

    /// First pending item in document order.
    pub fn next_item(&self) -> Option<&ChecklistItem> {
        self.items().find(|i| i.state == ItemState::Pending)
    }

    /// Human-readable summary: "3/5 done, 1 pending, 1 blocked"
    pub fn summarize(&self) -> String {
        let total = self.items().count();
        let done = self.count(|s| matches!(s, ItemState::Done));
        let pending = self.count(|s| matches!(s, ItemState::Pending));
        let blocked = self.count(|s| matches!(s, ItemState::Blocked { .. }));
        format!("{done}/{total} done, {pending} pending, {blocked} blocked")
    }

    fn count(&self, pred: impl Fn(&ItemState) -> bool) -> usize {
        self.items().filter(|i| pred(&i.state)).count()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip trailing whitespace from every line and trailing blank lines, ending
/// a non-empty document with a single newline.
pub fn normalize(text: &str) -> String {
    finish(text.lines().map(|l| l.trim_end().to_string()).collect())
}

fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Accepts RFC 3339 (`2026-01-02T10:00:00Z`) or a bare date, which is taken
/// as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| RulesmithError::InvalidTimestamp(s.to_string()))
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Notes and reasons are written inside a parenthetical, so they must nest
/// cleanly to parse back.
fn check_balanced(s: &str) -> Result<()> {
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| RulesmithError::UnbalancedParens(s.to_string()))?;
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(RulesmithError::UnbalancedParens(s.to_string()))
    }
}

/// Split `text (inner)` at its final balanced parenthetical.
fn split_trailing_paren(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_end();
    if !s.ends_with(')') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some((s[..i].trim_end(), &s[i + 1..s.len() - 1]));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_item(line: &str) -> Option<ChecklistItem> {
    let caps = item_re().captures(line)?;
    let indent = caps.name("indent")?.as_str().to_string();
    let bullet = caps.name("bullet")?.as_str().chars().next()?;
    let mark = caps.name("mark")?.as_str();
    let rest = caps.name("rest")?.as_str().trim();

    let mut description = rest;
    let mut completed_at = None;
    let mut note = None;
    let state = match mark {
        "x" | "X" => {
            if let Some((head, inner)) = split_trailing_paren(rest) {
                if let Some(meta) = inner.trim().strip_prefix(DONE_PREFIX) {
                    let (ts, n) = match meta.split_once(';') {
                        Some((ts, n)) => (ts, Some(n.trim())),
                        None => (meta, None),
                    };
                    if let Ok(at) = parse_timestamp(ts) {
                        description = head;
                        completed_at = Some(at);
                        note = n.filter(|n| !n.is_empty()).map(str::to_string);
                    }
                }
            }
            ItemState::Done
        }
        "?" => {
            let reason = match split_trailing_paren(rest) {
                Some((head, inner)) => {
                    description = head;
                    inner.trim().to_string()
                }
                None => String::new(),
            };
            ItemState::Blocked { reason }
        }
        _ => ItemState::Pending,
    };

    if description.is_empty() {
        return None;
    }
    Some(ChecklistItem {
        description: description.to_string(),
        state,
        completed_at,
        note,
        indent,
        bullet,
        source: Some(line.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
