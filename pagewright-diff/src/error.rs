//! Error types for pagewright-diff.

use thiserror::Error;

/// All errors that can arise from decomposing a template or diffing a page
/// against it. Patching cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// A separator line of the template differs from the page line at the
    /// same position.
    #[error("template and page diverge at page line {page_line}: expected {expected:?}, found {found:?}")]
    Alignment {
        page_line: usize,
        expected: String,
        found: String,
    },

    /// The page ran out of lines while a separator line was still expected.
    #[error("page ended at line {page_line} while expecting {expected:?}")]
    UnexpectedEnd { page_line: usize, expected: String },

    /// Strict mode only: the page continues past the final separator.
    #[error("page has trailing content from line {page_line}: {found:?}")]
    TrailingContent { page_line: usize, found: String },

    #[error("placeholder {name} declared twice (template lines {first_line} and {second_line})")]
    DuplicatePlaceholder {
        name: String,
        first_line: usize,
        second_line: usize,
    },

    /// Two placeholders with no separator line between them leave no anchor
    /// to tell where the first replacement ends.
    #[error("placeholders {first} and {second} are adjacent at template line {line}; separate them with at least one line")]
    AdjacentPlaceholders {
        first: String,
        second: String,
        line: usize,
    },
}

impl DiffError {
    /// True for failures caused by the page diverging from the template,
    /// as opposed to a malformed template.
    pub fn is_alignment(&self) -> bool {
        matches!(
            self,
            DiffError::Alignment { .. }
                | DiffError::UnexpectedEnd { .. }
                | DiffError::TrailingContent { .. }
        )
    }
}
