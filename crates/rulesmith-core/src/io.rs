use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Composed rule files and ledgers are never left half-written.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// What [`upsert_marked_section`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionWrite {
    Created,
    Replaced,
    Appended,
}

/// Place `block` (which already carries its own markers) into `path`.
///
/// If both markers are present, everything from the first character of
/// `start_marker` through the last character of `end_marker` is replaced.
/// Otherwise the block is appended after a blank line. A missing file is
/// created holding only the block. Text outside the markers is preserved.
pub fn upsert_marked_section(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    block: &str,
) -> Result<SectionWrite> {
    if !path.exists() {
        atomic_write(path, format!("{block}\n").as_bytes())?;
        return Ok(SectionWrite::Created);
    }
    let content = std::fs::read_to_string(path)?;

    if let Some(start_pos) = content.find(start_marker) {
        let search_from = start_pos + start_marker.len();
        if let Some(end_offset) = content[search_from..].find(end_marker) {
            let end_pos = search_from + end_offset + end_marker.len();
            let mut updated = String::with_capacity(content.len() + block.len());
            updated.push_str(&content[..start_pos]);
            updated.push_str(block);
            updated.push_str(&content[end_pos..]);
            atomic_write(path, updated.as_bytes())?;
            return Ok(SectionWrite::Replaced);
        }
    }

    let trimmed = content.trim_end();
    let updated = if trimmed.is_empty() {
        format!("{block}\n")
    } else {
        format!("{trimmed}\n\n{block}\n")
    };
    atomic_write(path, updated.as_bytes())?;
    Ok(SectionWrite::Appended)
}
