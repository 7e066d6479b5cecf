//! Content fingerprinting and line-oriented diffing.
//!
//! Versions store full content snapshots rather than deltas; the difference
//! between two snapshots is computed on demand and rendered into a
//! side-by-side view for display.

use serde::Serialize;
use sha2::{Digest, Sha256};
use similar::{ChangeTag, TextDiff};

/// Returns the SHA-256 digest of the content, as lowercase hex.
///
/// Equal content always yields an equal fingerprint, and any change to the
/// content changes it. Stored on each version as an integrity marker.
#[must_use]
pub fn fingerprint(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    format!("{hash:x}")
}

/// Classification of a [`DiffSegment`], and of each line in the rendered
/// right-hand view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Text present in both contents.
    Equal,
    /// Text present only in the new content.
    Insert,
    /// Text present only in the old content.
    Delete,
}

/// A maximal run of equal, inserted, or deleted text between two contents.
///
/// Segments appear in document order. Concatenating the text of all `Delete`
/// and `Equal` segments reconstructs the old content exactly; `Insert` and
/// `Equal` segments reconstruct the new content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    /// How this run differs between the two contents.
    pub kind: SegmentKind,
    /// The text of the run. May span multiple lines.
    pub text: String,
}

impl DiffSegment {
    const fn new(kind: SegmentKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// Computes the line-level difference between two content strings.
///
/// Identical inputs (the empty string included) short-circuit to a single
/// `Equal` segment without running the diff algorithm. Otherwise consecutive
/// lines with the same classification are merged into maximal segments, so
/// the output reads as blocks of changed text rather than line-by-line noise.
#[must_use]
pub fn diff(old: &str, new: &str) -> Vec<DiffSegment> {
    if old == new {
        return vec![DiffSegment::new(SegmentKind::Equal, old.to_string())];
    }

    let text_diff = TextDiff::from_lines(old, new);
    let mut segments: Vec<DiffSegment> = Vec::new();

    for change in text_diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Equal,
            ChangeTag::Delete => SegmentKind::Delete,
            ChangeTag::Insert => SegmentKind::Insert,
        };

        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => segments.push(DiffSegment::new(kind, change.value().to_string())),
        }
    }

    segments
}

/// A single line of the right-hand diff view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// The line's text, without its line break.
    pub text: String,
    /// How the line differs from the old content.
    pub tag: SegmentKind,
}

/// The two views of a side-by-side diff rendering.
///
/// The left view holds the old content's lines. The right view holds the new
/// content's lines with deleted lines shown in place, each tagged. The two
/// sides are not positionally aligned and may differ in length; consumers
/// scroll them independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideBySideDiff {
    /// Lines of the old content.
    pub left: Vec<String>,
    /// Tagged lines of the new content, with deletions visible in place.
    pub right: Vec<DiffLine>,
}

impl SideBySideDiff {
    /// Returns `true` if any rendered line is an insertion or deletion.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.right.iter().any(|line| line.tag != SegmentKind::Equal)
    }
}

/// Renders a segment sequence into the side-by-side presentation form.
///
/// Each segment's text is split on line breaks. A trailing empty string
/// produced by a trailing line break is dropped, so no phantom blank line is
/// emitted; interior blank lines are kept, since they are meaningful content.
/// Equal and deleted lines land in both views, inserted lines only in the
/// right view.
#[must_use]
pub fn format_for_display(segments: &[DiffSegment]) -> SideBySideDiff {
    let mut view = SideBySideDiff::default();

    for segment in segments {
        for line in segment_lines(&segment.text) {
            match segment.kind {
                SegmentKind::Equal | SegmentKind::Delete => {
                    view.left.push(line.to_string());
                    view.right.push(DiffLine {
                        text: line.to_string(),
                        tag: segment.kind,
                    });
                }
                SegmentKind::Insert => {
                    view.right.push(DiffLine {
                        text: line.to_string(),
                        tag: SegmentKind::Insert,
                    });
                }
            }
        }
    }

    view
}

fn segment_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(segments: &[DiffSegment], keep: SegmentKind) -> String {
        segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Equal || s.kind == keep)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
        assert_ne!(fingerprint("hello"), fingerprint("hello "));
    }

    #[test]
    fn fingerprint_of_empty_content() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_content_short_circuits() {
        let segments = diff("a\nb\nc", "a\nb\nc");
        assert_eq!(
            segments,
            vec![DiffSegment {
                kind: SegmentKind::Equal,
                text: "a\nb\nc".to_string(),
            }]
        );
    }

    #[test]
    fn identical_empty_content_is_a_single_equal_segment() {
        let segments = diff("", "");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Equal);
        assert!(segments[0].text.is_empty());
    }

    #[test]
    fn round_trip_reconstructs_both_inputs() {
        let cases = [
            ("a\nb\nc", "a\nx\nc"),
            ("a\nb\nc\n", "a\nc\n"),
            ("", "one\ntwo\n"),
            ("only old", ""),
            ("shared\nold tail", "shared\nnew tail\nextra"),
            ("no newline at end", "no newline at the end"),
        ];

        for (old, new) in cases {
            let segments = diff(old, new);
            assert_eq!(reconstruct(&segments, SegmentKind::Delete), old);
            assert_eq!(reconstruct(&segments, SegmentKind::Insert), new);
        }
    }

    #[test]
    fn consecutive_lines_merge_into_one_segment() {
        let segments = diff("a\nb\nc\nd", "a\nd");
        assert_eq!(
            segments,
            vec![
                DiffSegment {
                    kind: SegmentKind::Equal,
                    text: "a\n".to_string(),
                },
                DiffSegment {
                    kind: SegmentKind::Delete,
                    text: "b\nc\n".to_string(),
                },
                DiffSegment {
                    kind: SegmentKind::Equal,
                    text: "d".to_string(),
                },
            ]
        );
    }

    #[test]
    fn segments_appear_in_document_order() {
        let segments = diff("a\nb", "a\nx");
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SegmentKind::Equal, SegmentKind::Delete, SegmentKind::Insert]
        );
    }

    #[test]
    fn formatter_reports_no_changes_for_identical_content() {
        let view = format_for_display(&diff("a\nb\nc", "a\nb\nc"));
        assert!(!view.has_changes());
        assert_eq!(view.left, vec!["a", "b", "c"]);
        assert_eq!(view.right.len(), 3);
        assert!(view.right.iter().all(|l| l.tag == SegmentKind::Equal));
    }

    #[test]
    fn deleted_lines_are_visible_in_both_views() {
        let view = format_for_display(&diff("a\nb\nc", "a\nc"));
        assert_eq!(view.left, vec!["a", "b", "c"]);

        let tags: Vec<SegmentKind> = view.right.iter().map(|l| l.tag).collect();
        assert_eq!(
            tags,
            vec![SegmentKind::Equal, SegmentKind::Delete, SegmentKind::Equal]
        );
        assert_eq!(view.right[1].text, "b");
    }

    #[test]
    fn inserted_lines_only_appear_on_the_right() {
        let view = format_for_display(&diff("a\nc", "a\nb\nc"));
        assert_eq!(view.left, vec!["a", "c"]);

        let tags: Vec<SegmentKind> = view.right.iter().map(|l| l.tag).collect();
        assert_eq!(
            tags,
            vec![SegmentKind::Equal, SegmentKind::Insert, SegmentKind::Equal]
        );
        assert_eq!(view.right[1].text, "b");
    }

    #[test]
    fn replaced_line_renders_as_delete_then_insert() {
        let view = format_for_display(&diff("a\nb\nc", "a\nx\nc"));
        assert_eq!(view.left, vec!["a", "b", "c"]);

        let deletions: Vec<&str> = view
            .right
            .iter()
            .filter(|l| l.tag == SegmentKind::Delete)
            .map(|l| l.text.as_str())
            .collect();
        let insertions: Vec<&str> = view
            .right
            .iter()
            .filter(|l| l.tag == SegmentKind::Insert)
            .map(|l| l.text.as_str())
            .collect();
        let equals: Vec<&str> = view
            .right
            .iter()
            .filter(|l| l.tag == SegmentKind::Equal)
            .map(|l| l.text.as_str())
            .collect();

        assert_eq!(deletions, vec!["b"]);
        assert_eq!(insertions, vec!["x"]);
        assert_eq!(equals, vec!["a", "c"]);
    }

    #[test]
    fn trailing_line_break_does_not_emit_a_phantom_line() {
        let view = format_for_display(&diff("x\ny\n", "x\ny\n"));
        assert_eq!(view.left, vec!["x", "y"]);
        assert_eq!(view.right.len(), 2);
    }

    #[test]
    fn line_counts_match_the_input_for_unchanged_content() {
        for content in ["x\ny", "x\ny\n", "single", ""] {
            let view = format_for_display(&diff(content, content));
            let expected = if content.is_empty() {
                0
            } else {
                content.trim_end_matches('\n').split('\n').count()
            };
            assert_eq!(view.left.len(), expected, "content: {content:?}");
            assert_eq!(view.right.len(), expected, "content: {content:?}");
        }
    }

    #[test]
    fn interior_blank_lines_are_preserved() {
        let view = format_for_display(&diff("x\n\ny", "x\n\ny"));
        assert_eq!(view.left, vec!["x", "", "y"]);
    }

    #[test]
    fn formatting_an_empty_diff_yields_empty_views() {
        let view = format_for_display(&diff("", ""));
        assert!(view.left.is_empty());
        assert!(view.right.is_empty());
        assert!(!view.has_changes());
    }
}
