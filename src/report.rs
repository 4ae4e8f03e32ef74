//! Commentary report assembly.
//!
//! A [`CommentaryReport`] is the ordered concatenation of per-frame
//! commentary texts. Assembly is pure: the requester pushes texts in sample
//! order and the report renders them as numbered sections.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// One frame's commentary within a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCommentary {
    /// 1-based frame ordinal within the sampled sequence.
    pub ordinal: usize,
    /// The commentary text returned for this frame.
    pub text: String,
}

/// An ordered collection of per-frame commentary sections.
///
/// Sections are numbered from 1 in the order they are pushed, which is the
/// frame capture order. Rendering produces one `Frame {k} Commentary:` block
/// per section, in ascending `k`.
///
/// # Example
///
/// ```
/// use playcall::CommentaryReport;
///
/// let mut report = CommentaryReport::new();
/// report.push("The striker lines up the shot!");
/// report.push("GOAL! An absolute screamer!");
///
/// let text = report.render();
/// assert!(text.starts_with("Frame 1 Commentary:\n"));
/// assert!(text.contains("Frame 2 Commentary:\n"));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct CommentaryReport {
    sections: Vec<FrameCommentary>,
}

impl CommentaryReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next frame's commentary.
    ///
    /// The section receives the next 1-based ordinal.
    pub fn push(&mut self, text: impl Into<String>) {
        let ordinal = self.sections.len() + 1;
        self.sections.push(FrameCommentary {
            ordinal,
            text: text.into(),
        });
    }

    /// The assembled sections, in ascending ordinal order.
    pub fn sections(&self) -> &[FrameCommentary] {
        &self.sections
    }

    /// Number of sections in the report.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` if no commentary was collected.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render the report as a single text block.
    ///
    /// Each section becomes `Frame {k} Commentary:\n{text}\n\n`. An empty
    /// report renders as an empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!(
                "Frame {} Commentary:\n{}\n\n",
                section.ordinal, section.text
            ));
        }
        out
    }
}

impl Display for CommentaryReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.render())
    }
}
