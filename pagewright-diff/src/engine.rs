//! LineDiff: extract a [`DiffMap`] from a page by anchoring on the literal
//! separator lines of the template it was derived from.
//!
//! # Algorithm
//!
//! Walk the template's `[sep, placeholder, sep, …]` sequence with a cursor
//! into the page:
//!
//! 1. Every separator line must equal the page line under the cursor.
//! 2. After a separator, if a placeholder follows, page lines are captured
//!    until the *first line* of the next separator (the anchor) is under the
//!    cursor. The captured lines, joined and trimmed, are the replacement.
//!    A last placeholder with an empty final separator captures the rest.
//! 3. Page lines after the final separator are ignored in
//!    [`TrailingMode::Lenient`] and rejected in [`TrailingMode::Strict`].
//!
//! The anchor is matched on a single line, so a replacement that contains the
//! anchor line verbatim ends early and the next separator then fails to align.

use pagewright_core::TrailingMode;

use crate::diff_map::DiffMap;
use crate::error::DiffError;
use crate::template::{split_lines, Template};

impl Template<'_> {
    /// Extract what `page` substituted for each placeholder of this template.
    ///
    /// Either the complete map is returned or an error; there is no partial
    /// result.
    pub fn extract(&self, page: &str, trailing: TrailingMode) -> Result<DiffMap, DiffError> {
        let page_lines = split_lines(page);
        let mut cursor = 0;
        let mut map = DiffMap::new();

        for (index, separator) in self.separators.iter().enumerate() {
            cursor = consume_separator(separator, &page_lines, cursor)?;

            let Some(placeholder) = self.placeholders.get(index) else {
                break;
            };
            let end = match self.separators[index + 1].first() {
                Some(anchor) => find_anchor(anchor, &page_lines, cursor)?,
                None => page_lines.len(),
            };
            let captured = page_lines[cursor..end].concat();
            map.insert(placeholder.name, captured.trim());
            cursor = end;
        }

        if trailing == TrailingMode::Strict {
            if let Some(found) = page_lines.get(cursor) {
                return Err(DiffError::TrailingContent {
                    page_line: cursor + 1,
                    found: (*found).to_owned(),
                });
            }
        }

        tracing::trace!(?map, "extracted placeholder replacements");
        Ok(map)
    }
}

/// Diff `page` against `old_template`, ignoring trailing page content.
pub fn diff(old_template: &str, page: &str) -> Result<DiffMap, DiffError> {
    diff_with(old_template, page, TrailingMode::Lenient)
}

/// Diff `page` against `old_template` with an explicit trailing mode.
pub fn diff_with(old_template: &str, page: &str, trailing: TrailingMode) -> Result<DiffMap, DiffError> {
    Template::parse(old_template)?.extract(page, trailing)
}

/// Apply `map` to `new_template`. See [`DiffMap::patch`].
pub fn patch(map: &DiffMap, new_template: &str) -> String {
    map.patch(new_template)
}

fn consume_separator(separator: &[&str], page: &[&str], mut cursor: usize) -> Result<usize, DiffError> {
    for expected in separator {
        match page.get(cursor) {
            Some(found) if found == expected => cursor += 1,
            Some(found) => {
                return Err(DiffError::Alignment {
                    page_line: cursor + 1,
                    expected: (*expected).to_owned(),
                    found: (*found).to_owned(),
                });
            }
            None => {
                return Err(DiffError::UnexpectedEnd {
                    page_line: cursor + 1,
                    expected: (*expected).to_owned(),
                });
            }
        }
    }
    Ok(cursor)
}

fn find_anchor(anchor: &str, page: &[&str], from: usize) -> Result<usize, DiffError> {
    page[from..]
        .iter()
        .position(|line| *line == anchor)
        .map(|offset| from + offset)
        .ok_or_else(|| DiffError::UnexpectedEnd {
            page_line: page.len() + 1,
            expected: anchor.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
