//! Marker-delimited merge for destinations that mix toolkit and user content.
//!
//! The toolkit-owned region sits between two sentinel lines. Everything
//! strictly before the begin marker and strictly after the end marker belongs
//! to the user and survives every re-run byte-for-byte. A file may carry at
//! most one marker pair; anything else is refused as malformed rather than
//! guessed at.

use std::path::Path;

use crate::error::SyncError;

/// Sentinel line opening the toolkit-owned region.
pub const BEGIN_MARKER: &str = "# === stencil:begin ===";
/// Sentinel line closing the toolkit-owned region.
pub const END_MARKER: &str = "# === stencil:end ===";

/// The content a marker-merge entry would leave at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// Destination absent: full rendered segment wrapped in a marker pair.
    Fresh(String),
    /// Destination has one marker pair: region between markers replaced.
    Merged(String),
    /// Destination has no markers and the update flag permits adoption:
    /// wrapped segment prepended above the existing content.
    Prepended(String),
    /// Destination has no markers and adoption was not requested; no write.
    NeedsUpdateFlag,
}

/// Decide what a marker-merge write would produce.
///
/// `existing` is the destination's current content (`None` when absent).
/// `destination` is only used to annotate [`SyncError::MalformedMarkers`].
pub fn plan_merge(
    destination: &Path,
    existing: Option<&str>,
    segment: &str,
    adopt_unmarked: bool,
) -> Result<MergePlan, SyncError> {
    let Some(content) = existing else {
        return Ok(MergePlan::Fresh(wrap_segment(segment)));
    };

    let begins = marker_lines(content, BEGIN_MARKER);
    let ends = marker_lines(content, END_MARKER);

    match (begins.as_slice(), ends.as_slice()) {
        ([], []) => {
            if adopt_unmarked {
                let mut out = wrap_segment(segment);
                out.push_str(content);
                Ok(MergePlan::Prepended(out))
            } else {
                Ok(MergePlan::NeedsUpdateFlag)
            }
        }
        ([begin], [end]) if begin.end <= end.start => {
            // Keep the begin marker line (with its newline), replace the
            // region up to the end marker line, keep everything from the end
            // marker onward. Bytes outside the pair are untouched.
            let mut out = String::with_capacity(content.len() + segment.len());
            out.push_str(&content[..begin.end]);
            if !content[..begin.end].ends_with('\n') {
                out.push('\n');
            }
            push_segment(&mut out, segment);
            out.push_str(&content[end.start..]);
            Ok(MergePlan::Merged(out))
        }
        ([begin], [end]) if begin.start > end.start => Err(malformed(
            destination,
            "end marker precedes begin marker",
        )),
        ([], [_]) => Err(malformed(destination, "end marker without begin marker")),
        ([_], []) => Err(malformed(destination, "begin marker without end marker")),
        (b, e) => Err(malformed(
            destination,
            &format!("expected one marker pair, found {} begin / {} end", b.len(), e.len()),
        )),
    }
}

/// Wrap a rendered segment in a fresh marker pair, trailing newline included.
pub fn wrap_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + BEGIN_MARKER.len() + END_MARKER.len() + 3);
    out.push_str(BEGIN_MARKER);
    out.push('\n');
    push_segment(&mut out, segment);
    out.push_str(END_MARKER);
    out.push('\n');
    out
}

fn push_segment(out: &mut String, segment: &str) {
    out.push_str(segment);
    if !segment.is_empty() && !segment.ends_with('\n') {
        out.push('\n');
    }
}

/// Byte span of one line, `end` pointing past the trailing newline (or EOF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    start: usize,
    end: usize,
}

fn marker_lines(content: &str, marker: &str) -> Vec<LineSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for line in content.split_inclusive('\n') {
        let text = line.strip_suffix('\n').unwrap_or(line);
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text == marker {
            spans.push(LineSpan {
                start: pos,
                end: pos + line.len(),
            });
        }
        pos += line.len();
    }
    spans
}

fn malformed(destination: &Path, detail: &str) -> SyncError {
    SyncError::MalformedMarkers {
        path: destination.to_path_buf(),
        detail: detail.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
