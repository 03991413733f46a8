//! Keyword-anchored section extraction
//!
//! Scans text for a contiguous run of lines anchored by a target keyword.
//! Pure line-scanning state machine, no I/O.

use crate::config::SectionConfig;

/// Extracts the keyword-anchored section from larger text
///
/// Capture starts at the first line containing any target keyword
/// (case-insensitive). Blank lines inside a captured section are preserved.
/// A line starting with the heading marker terminates the section, but only
/// once the buffer already holds more than `min_lines` lines; the boundary
/// is a heuristic, so both knobs are tunable.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    keywords: Vec<String>,
    heading_marker: String,
    min_lines: usize,
}

impl SectionExtractor {
    pub fn new(keywords: Vec<String>, config: &SectionConfig) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
            heading_marker: config.heading_marker.clone(),
            min_lines: config.min_lines,
        }
    }

    /// Returns the captured section lines, or `None` if no keyword matched
    pub fn extract(&self, content: &str) -> Option<Vec<String>> {
        if self.keywords.is_empty() {
            return None;
        }

        let mut captured: Vec<String> = Vec::new();
        let mut capturing = false;

        for line in content.lines() {
            if !capturing {
                if self.matches_keyword(line) {
                    capturing = true;
                    captured.push(line.to_string());
                }
            } else if line.trim().is_empty() {
                captured.push(line.to_string());
            } else if line.starts_with(&self.heading_marker) && captured.len() > self.min_lines {
                break;
            } else {
                captured.push(line.to_string());
            }
        }

        if captured.is_empty() {
            None
        } else {
            Some(captured)
        }
    }

    fn matches_keyword(&self, line: &str) -> bool {
        let line = line.to_lowercase();
        self.keywords.iter().any(|k| line.contains(k))
    }
}
