use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const RULESMITH_DIR: &str = ".rulesmith";
pub const CONFIG_FILE: &str = ".rulesmith/config.yaml";

pub const DEFAULT_RULES_DIR: &str = "rules";
pub const DEFAULT_OUTPUT: &str = ".cursorrules";
pub const DEFAULT_LEDGER: &str = "TODO.md";

/// Extension of rule documents inside the rules directory.
pub const RULE_EXTENSION: &str = "md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn rulesmith_dir(root: &Path) -> PathBuf {
    root.join(RULESMITH_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured path against the project root. Absolute paths pass
/// through unchanged.
pub fn resolve(root: &Path, configured: &str) -> PathBuf {
    let p = Path::new(configured);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

pub fn rule_file(rules_dir: &Path, name: &str) -> PathBuf {
    rules_dir.join(format!("{name}.{RULE_EXTENSION}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
