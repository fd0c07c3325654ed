//! Decomposition of a template into separator blocks and placeholders.
//!
//! A template is read as the alternating sequence
//! `[sep₀, P₁, sep₁, P₂, …, Pₙ, sepₙ]` where each `Pᵢ` is a placeholder line
//! (trimmed content made only of `A-Z` and `_`) and each `sepᵢ` is the
//! possibly empty run of literal lines around it. Lines keep their
//! terminators so `\r\n` and `\n` never compare equal.

use std::collections::HashMap;

use crate::error::DiffError;

/// A placeholder line of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    /// 1-based line number in the template.
    pub line: usize,
}

/// A parsed template borrowing from its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    /// Always exactly one more than `placeholders`.
    pub(crate) separators: Vec<Vec<&'a str>>,
    pub(crate) placeholders: Vec<Placeholder<'a>>,
}

impl<'a> Template<'a> {
    /// Decompose `text`, rejecting duplicate and adjacent placeholders.
    pub fn parse(text: &'a str) -> Result<Self, DiffError> {
        let mut separators: Vec<Vec<&'a str>> = vec![Vec::new()];
        let mut placeholders: Vec<Placeholder<'a>> = Vec::new();
        let mut seen: HashMap<&'a str, usize> = HashMap::new();

        for (index, line) in split_lines(text).into_iter().enumerate() {
            let line_no = index + 1;
            let Some(name) = placeholder_name(line) else {
                if let Some(current) = separators.last_mut() {
                    current.push(line);
                }
                continue;
            };

            if let Some(&first_line) = seen.get(name) {
                return Err(DiffError::DuplicatePlaceholder {
                    name: name.to_owned(),
                    first_line,
                    second_line: line_no,
                });
            }
            let between_is_empty = separators.last().is_some_and(|sep| sep.is_empty());
            if let (Some(previous), true) = (placeholders.last(), between_is_empty) {
                return Err(DiffError::AdjacentPlaceholders {
                    first: previous.name.to_owned(),
                    second: name.to_owned(),
                    line: line_no,
                });
            }

            seen.insert(name, line_no);
            placeholders.push(Placeholder { name, line: line_no });
            separators.push(Vec::new());
        }

        Ok(Self {
            separators,
            placeholders,
        })
    }

    pub fn placeholders(&self) -> &[Placeholder<'a>] {
        &self.placeholders
    }

    /// Separator blocks in order; `separators()[i]` precedes `placeholders()[i]`.
    pub fn separators(&self) -> &[Vec<&'a str>] {
        &self.separators
    }

    pub fn placeholder_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.placeholders.iter().map(|p| p.name)
    }
}

/// The placeholder name on `line`, if the line is a placeholder line.
pub fn placeholder_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let is_placeholder = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b == b'_');
    is_placeholder.then_some(trimmed)
}

/// Split after every `\n`, keeping terminators. A final line without a
/// terminator is kept as-is.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BODY\n", Some("BODY"))]
    #[case("   SIDE_BAR  \r\n", Some("SIDE_BAR"))]
    #[case("___", Some("___"))]
    #[case("\tTITLE", Some("TITLE"))]
    #[case("Body\n", None)]
    #[case("BODY2\n", None)]
    #[case("TWO WORDS\n", None)]
    #[case("<TITLE>\n", None)]
    #[case("   \n", None)]
    #[case("ÄRGER\n", None)]
    fn placeholder_detection(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(placeholder_name(line), expected);
    }

    #[test]
    fn decomposes_into_alternating_sequence() {
        let text = "<html>\n<title>\n  TITLE\n</title>\nBODY\n</html>\n";
        let template = Template::parse(text).expect("parse");

        assert_eq!(template.placeholder_names().collect::<Vec<_>>(), vec!["TITLE", "BODY"]);
        assert_eq!(template.placeholders()[1].line, 5);
        assert_eq!(
            template.separators(),
            &[
                vec!["<html>\n", "<title>\n"],
                vec!["</title>\n"],
                vec!["</html>\n"],
            ]
        );
    }

    #[test]
    fn leading_and_trailing_placeholders_get_empty_separators() {
        let template = Template::parse("HEAD\nmiddle\nTAIL\n").expect("parse");
        assert_eq!(template.separators().len(), 3);
        assert!(template.separators()[0].is_empty());
        assert_eq!(template.separators()[1], vec!["middle\n"]);
        assert!(template.separators()[2].is_empty());
    }

    #[test]
    fn template_without_placeholders_is_one_separator() {
        let template = Template::parse("a\nb").expect("parse");
        assert!(template.placeholders().is_empty());
        assert_eq!(template.separators(), &[vec!["a\n", "b"]]);
    }

    #[test]
    fn empty_template_parses() {
        let template = Template::parse("").expect("parse");
        assert!(template.placeholders().is_empty());
        assert_eq!(template.separators(), &[Vec::<&str>::new()]);
    }

    #[test]
    fn duplicate_placeholder_is_rejected() {
        let err = Template::parse("<a>\nBODY\n<b>\n  BODY\n<c>\n").unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicatePlaceholder {
                name: "BODY".into(),
                first_line: 2,
                second_line: 4,
            }
        );
        assert!(!err.is_alignment());
    }

    #[test]
    fn adjacent_placeholders_are_rejected() {
        let err = Template::parse("<a>\nTITLE\nBODY\n<b>\n").unwrap_err();
        assert!(matches!(err, DiffError::AdjacentPlaceholders { line: 3, .. }), "got: {err}");
    }

    #[test]
    fn crlf_lines_keep_terminators() {
        let template = Template::parse("<a>\r\nBODY\r\n<b>\r\n").expect("parse");
        assert_eq!(template.separators()[1], vec!["<b>\r\n"]);
    }
}
