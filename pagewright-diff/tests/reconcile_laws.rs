//! Behavioural laws of diff/patch over realistic templates.

use pagewright_core::TrailingMode;
use pagewright_diff::{diff, diff_with, patch, DiffError, DiffMap, Template};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PAGE_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
    <title>
        TITLE
    </title>
</head>
<body>
    <nav>menu</nav>
CONTENT
    <aside>
SIDEBAR
    </aside>
</body>
</html>
";

/// A page split into (text, is_separator) runs, as generated from a template.
struct Generated {
    runs: Vec<(String, bool)>,
}

impl Generated {
    /// Substitute each placeholder token of `template` with `fill(name)`.
    fn from_template(template: &str, fill: impl Fn(&str) -> String) -> Self {
        let mut runs = Vec::new();
        for line in template.split_inclusive('\n') {
            match pagewright_diff::placeholder_name(line) {
                Some(name) => runs.push((line.replace(name, &fill(name)), false)),
                None => runs.push((line.to_owned(), true)),
            }
        }
        Self { runs }
    }

    fn text(&self) -> String {
        self.runs.iter().map(|(text, _)| text.as_str()).collect()
    }

    /// Every byte offset of a non-newline character inside separator or
    /// placeholder runs.
    fn offsets(&self, separators: bool) -> Vec<usize> {
        let mut offsets = Vec::new();
        let mut base = 0;
        for (text, is_separator) in &self.runs {
            if *is_separator == separators {
                for (i, ch) in text.char_indices() {
                    if ch != '\n' && ch != '\r' {
                        offsets.push(base + i);
                    }
                }
            }
            base += text.len();
        }
        offsets
    }
}

fn mutate_at(text: &str, offset: usize) -> String {
    let original = text[offset..].chars().next().expect("char at offset");
    let replacement = if original == '#' { '@' } else { '#' };
    let mut mutated = String::with_capacity(text.len());
    mutated.push_str(&text[..offset]);
    mutated.push(replacement);
    mutated.push_str(&text[offset + original.len_utf8()..]);
    mutated
}

fn custom_content(name: &str) -> String {
    match name {
        "TITLE" => "Release notes".to_owned(),
        "CONTENT" => "<h1>Changes</h1>\n<ul>\n  <li>faster</li>\n</ul>".to_owned(),
        "SIDEBAR" => "<a href=\"/\">home</a>".to_owned(),
        other => format!("custom {other}"),
    }
}

// ---------------------------------------------------------------------------
// 1. Round-trip law
// ---------------------------------------------------------------------------

#[rstest]
#[case::full_page(PAGE_TEMPLATE)]
#[case::leading_placeholder("HEADER\n<main>\nBODY\n</main>\n")]
#[case::trailing_placeholder("<main>\nBODY\n")]
#[case::no_final_newline("<p>\n  BODY\n</p>")]
#[case::no_placeholders("<p>static</p>\n")]
#[case::crlf("<p>\r\nBODY\r\n</p>\r\n")]
fn patch_of_diff_against_same_template_reproduces_page(#[case] template: &str) {
    let page = Generated::from_template(template, custom_content).text();
    let map = diff_with(template, &page, TrailingMode::Strict).expect("derived page must diff");
    assert_eq!(patch(&map, template), page);
}

// ---------------------------------------------------------------------------
// 2. Identity law
// ---------------------------------------------------------------------------

#[test]
fn empty_substitutions_map_to_empty_strings() {
    let page = Generated::from_template(PAGE_TEMPLATE, |_| String::new()).text();
    let map = diff(PAGE_TEMPLATE, &page).expect("diff");
    assert_eq!(map.len(), 3);
    for (name, replacement) in map.iter() {
        assert_eq!(replacement, "", "{name} should be empty");
    }
    assert_eq!(patch(&map, PAGE_TEMPLATE), page);
}

// ---------------------------------------------------------------------------
// 3. Alignment detection
// ---------------------------------------------------------------------------

#[test]
fn any_separator_mutation_fails_alignment() {
    let generated = Generated::from_template(PAGE_TEMPLATE, custom_content);
    let page = generated.text();
    let offsets = generated.offsets(true);
    assert!(!offsets.is_empty());

    for offset in offsets {
        let mutated = mutate_at(&page, offset);
        match diff(PAGE_TEMPLATE, &mutated) {
            Err(err) => assert!(err.is_alignment(), "offset {offset}: unexpected {err}"),
            Ok(map) => panic!("offset {offset}: mutation went undetected, got {map:?}"),
        }
    }
}

#[test]
fn placeholder_region_mutation_is_accepted() {
    let generated = Generated::from_template(PAGE_TEMPLATE, custom_content);
    let page = generated.text();

    for offset in generated.offsets(false) {
        let mutated = mutate_at(&page, offset);
        let map = diff(PAGE_TEMPLATE, &mutated)
            .unwrap_or_else(|err| panic!("offset {offset}: {err}"));
        assert_eq!(map.len(), 3);
    }
}

// ---------------------------------------------------------------------------
// 4. Re-templating
// ---------------------------------------------------------------------------

#[test]
fn custom_content_moves_into_new_markup() {
    let page = Generated::from_template(PAGE_TEMPLATE, custom_content).text();
    let new_template = PAGE_TEMPLATE
        .replace("<nav>menu</nav>", "<nav>menu | about</nav>")
        .replace("<body>\n", "<body class=\"v2\">\n");

    let map = diff(PAGE_TEMPLATE, &page).expect("diff");
    let updated = patch(&map, &new_template);

    assert!(updated.contains("<body class=\"v2\">"));
    assert!(updated.contains("<nav>menu | about</nav>"));
    assert!(updated.contains("<h1>Changes</h1>\n<ul>\n  <li>faster</li>\n</ul>"));
    assert_eq!(
        diff(&new_template, &updated).expect("updated page derives from new template"),
        map
    );
}

#[test]
fn placeholder_dropped_from_new_template_drops_its_content() {
    let page = Generated::from_template(PAGE_TEMPLATE, custom_content).text();
    let new_template = PAGE_TEMPLATE.replace("    <aside>\nSIDEBAR\n    </aside>\n", "");
    let updated = patch(&diff(PAGE_TEMPLATE, &page).unwrap(), &new_template);
    assert!(!updated.contains("home"));
    assert!(updated.contains("Release notes"));
}

// ---------------------------------------------------------------------------
// 5. Substring hazard (regression)
// ---------------------------------------------------------------------------

#[test]
fn replacement_containing_another_name_is_substituted_again() {
    let template = "<h1>\nTITLE\n</h1>\n<h2>\nSUBTITLE\n</h2>\n";
    let page = "<h1>\nBig\n</h1>\n<h2>\nAbout the TITLE\n</h2>\n";

    let map = diff(template, page).expect("diff");
    assert_eq!(map.get("SUBTITLE"), Some("About the TITLE"));
    assert_eq!(map.substitution_order(), vec!["SUBTITLE", "TITLE"]);

    // SUBTITLE is substituted first; its text then loses the literal TITLE.
    assert_eq!(
        patch(&map, template),
        "<h1>\nBig\n</h1>\n<h2>\nAbout the Big\n</h2>\n"
    );
}

#[test]
fn substitution_is_deterministic_across_insertion_orders() {
    let forward: DiffMap = [("A_B", "x A y"), ("A", "1"), ("B", "A")].into_iter().collect();
    let backward: DiffMap = [("B", "A"), ("A", "1"), ("A_B", "x A y")].into_iter().collect();
    let template = "A_B\nA\nB\n";
    assert_eq!(patch(&forward, template), patch(&backward, template));
    assert_eq!(patch(&forward, template), "x 1 y\n1\nA\n");
}

// ---------------------------------------------------------------------------
// 6. Template contract
// ---------------------------------------------------------------------------

#[test]
fn duplicate_placeholders_fail_before_reading_the_page() {
    let err = Template::parse("BODY\n<hr/>\nBODY\n").unwrap_err();
    assert!(matches!(err, DiffError::DuplicatePlaceholder { .. }));
}
