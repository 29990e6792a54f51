use crate::error::Result;
use crate::rule::RuleLibrary;

/// Opening marker of the rulesmith-managed block inside a target file.
pub const SECTION_START: &str = "<!-- rulesmith:start -->";
/// Closing marker of the rulesmith-managed block.
pub const SECTION_END: &str = "<!-- rulesmith:end -->";

/// Separator between consecutive documents: exactly one blank line.
const SEPARATOR: &str = "\n\n";

/// Concatenate the requested documents in the order given.
///
/// Every id must name a document in `library`; the first unknown id aborts
/// with `DocumentNotFound`. An empty request yields an empty string.
pub fn compose<S: AsRef<str>>(library: &RuleLibrary, ids: &[S]) -> Result<String> {
    let mut parts = Vec::with_capacity(ids.len());
    for id in ids {
        parts.push(library.get(id.as_ref())?.content());
    }
    Ok(parts.join(SEPARATOR))
}

/// Wrap composed text in the managed-section markers.
pub fn compose_section(body: &str) -> String {
    if body.is_empty() {
        format!("{SECTION_START}\n{SECTION_END}")
    } else {
        format!("{SECTION_START}\n{body}\n{SECTION_END}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulesmithError;
    use crate::rule::RuleDocument;

    fn library() -> RuleLibrary {
        [
            RuleDocument::from_text("general", "A"),
            RuleDocument::from_text("typescript", "B"),
            RuleDocument::from_text("testing", "# Testing\n\n- write tests first\n"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn composes_in_requested_order() {
        let lib = library();
        assert_eq!(compose(&lib, &["general", "typescript"]).unwrap(), "A\n\nB");
        assert_eq!(compose(&lib, &["typescript", "general"]).unwrap(), "B\n\nA");
    }

    #[test]
    fn empty_request_is_empty_output() {
        let lib = library();
        let ids: [&str; 0] = [];
        assert_eq!(compose(&lib, &ids).unwrap(), "");
    }

    #[test]
    fn each_document_appears_once_in_order() {
        let lib = library();
        let out = compose(&lib, &["testing", "general", "typescript"]).unwrap();
        assert_eq!(out.matches("write tests first").count(), 1);
        let testing = out.find("# Testing").unwrap();
        let general = out.find('A').unwrap();
        let typescript = out.find('B').unwrap();
        assert!(testing < general && general < typescript);
        assert_eq!(out, "# Testing\n\n- write tests first\n\nA\n\nB");
    }

    #[test]
    fn unknown_id_fails() {
        let lib = library();
        let err = compose(&lib, &["general", "python"]).unwrap_err();
        assert!(matches!(err, RulesmithError::DocumentNotFound(ref n) if n == "python"));
    }

    #[test]
    fn owned_ids_are_accepted() {
        let lib = library();
        let ids = vec!["general".to_string()];
        assert_eq!(compose(&lib, &ids).unwrap(), "A");
    }

    #[test]
    fn section_wraps_body_in_markers() {
        assert_eq!(
            compose_section("A\n\nB"),
            format!("{SECTION_START}\nA\n\nB\n{SECTION_END}")
        );
        assert_eq!(compose_section(""), format!("{SECTION_START}\n{SECTION_END}"));
    }
}
