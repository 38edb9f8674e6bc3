//! Literal placeholder substitution over `{{KEY}}` markers.
//!
//! The scanner walks the template exactly once. Substituted values are
//! appended verbatim and never re-scanned, so a value containing `{{...}}`
//! cannot trigger further expansion. There is no escaping syntax: anything
//! between braces that is not a well-formed key passes through untouched.

use std::collections::BTreeSet;

use stencil_core::PlaceholderMap;

/// Result of rendering one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The substituted text. Unresolved markers are left literally intact.
    pub text: String,
    /// Distinct marker names with no matching map entry.
    pub unresolved: BTreeSet<String>,
}

impl Rendered {
    /// True when every marker in the template had a map entry.
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitute every `{{KEY}}` marker in `template` from `map`.
///
/// Marker names follow the UPPER_SNAKE convention; the scanner accepts any
/// run of ASCII alphanumerics and underscores between `{{` and `}}`. Keys
/// absent from the map are reported in [`Rendered::unresolved`] and the
/// marker is left in place — the caller decides whether that is fatal.
pub fn render(template: &str, map: &PlaceholderMap) -> Rendered {
    let mut out = String::with_capacity(template.len());
    let mut unresolved = BTreeSet::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_key(&after[..end]) => {
                let key = &after[..end];
                match map.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        unresolved.insert(key.to_string());
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            // No closing braces, or the span between braces is not a key:
            // emit the opening braces literally and keep scanning after them.
            _ => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);

    Rendered { text: out, unresolved }
}

fn is_key(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_keys_and_reports_unknown() {
        let m = map(&[("DEFAULT_BRANCH", "main")]);
        let r = render("branch={{DEFAULT_BRANCH}}, mode={{MODE}}", &m);
        assert_eq!(r.text, "branch=main, mode={{MODE}}");
        assert_eq!(
            r.unresolved.iter().collect::<Vec<_>>(),
            vec![&"MODE".to_string()]
        );
        assert!(!r.is_fully_resolved());
    }

    #[test]
    fn repeated_markers_all_substituted() {
        let m = map(&[("PROJECT_NAME", "copnow")]);
        let r = render("{{PROJECT_NAME}} and {{PROJECT_NAME}} again", &m);
        assert_eq!(r.text, "copnow and copnow again");
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn duplicate_unresolved_markers_reported_once() {
        let r = render("{{MODE}} {{MODE}} {{OTHER}}", &PlaceholderMap::new());
        assert_eq!(r.unresolved.len(), 2);
        assert!(r.unresolved.contains("MODE"));
        assert!(r.unresolved.contains("OTHER"));
    }

    #[test]
    fn values_are_never_rescanned_for_markers() {
        let m = map(&[("A", "{{B}}"), ("B", "boom")]);
        let r = render("x={{A}}", &m);
        assert_eq!(r.text, "x={{B}}", "inserted values must stay verbatim");
        assert!(
            r.unresolved.is_empty(),
            "markers inside values are opaque, not unresolved"
        );
    }

    #[test]
    fn special_characters_in_values_are_opaque() {
        let m = map(&[("TEST_COMMAND", "grep -E '^a|b$' \\ \"quoted\" $VAR")]);
        let r = render("run: {{TEST_COMMAND}}", &m);
        assert_eq!(r.text, "run: grep -E '^a|b$' \\ \"quoted\" $VAR");
    }

    #[test]
    fn non_key_brace_spans_pass_through() {
        let r = render("a {{not a key}} b {{ SPACED }} c", &PlaceholderMap::new());
        assert_eq!(r.text, "a {{not a key}} b {{ SPACED }} c");
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn unterminated_braces_pass_through() {
        let m = map(&[("KEY", "v")]);
        let r = render("tail {{KEY", &m);
        assert_eq!(r.text, "tail {{KEY");
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn extra_brace_before_marker_still_substitutes() {
        let m = map(&[("KEY", "v")]);
        let r = render("{{{{KEY}}", &m);
        assert_eq!(r.text, "{{v");
    }

    #[test]
    fn empty_template_renders_empty() {
        let r = render("", &PlaceholderMap::new());
        assert_eq!(r.text, "");
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn lowercase_keys_are_accepted_by_the_scanner() {
        let m = map(&[("legacy_key", "ok")]);
        let r = render("{{legacy_key}}", &m);
        assert_eq!(r.text, "ok");
    }
}
