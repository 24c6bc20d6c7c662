//! Page-break pass for the book layout.

use std::sync::LazyLock;

use regex::Regex;

/// Marker block inserted before each section heading. Renders as a forced
/// page break in EPUB readers and is ignored by plain markdown viewers.
pub const PAGE_BREAK: &str = "<div style=\"page-break-before: always;\"></div>\n\n";

/// Insert [`PAGE_BREAK`] immediately before every level 2, 3 or 4 heading.
///
/// Level 1 headings (the book title and nothing else in the book layout) and
/// headings of level 5 or deeper are left alone. Heading lines themselves
/// are not modified. Lines may end in `\n`, `\r\n` or a bare `\r`.
pub fn insert_page_breaks(text: &str) -> String {
    static SECTION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?mR)^#{2,4} ").expect("valid regex"));

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in SECTION_RE.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str(PAGE_BREAK);
        last = m.start();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_before_levels_two_to_four() {
        let input = "# Book\n\n## 2023\n\n### Intro\n\n#### Part\n";
        let expected = format!(
            "# Book\n\n{PAGE_BREAK}## 2023\n\n{PAGE_BREAK}### Intro\n\n{PAGE_BREAK}#### Part\n"
        );
        assert_eq!(insert_page_breaks(input), expected);
    }

    #[test]
    fn no_break_before_level_one_or_five() {
        let input = "# Title\n##### Tiny\n###### Tinier\n";
        assert_eq!(insert_page_breaks(input), input);
    }

    #[test]
    fn exactly_one_break_per_heading() {
        let input = "## A\n## B\ntext ## not a heading\n##no-space\n";
        let result = insert_page_breaks(input);
        assert_eq!(result.matches(PAGE_BREAK).count(), 2);
        assert!(result.ends_with("text ## not a heading\n##no-space\n"));
    }

    #[test]
    fn carriage_return_lines_get_breaks() {
        let input = "# Book\r## A\r\n### B\rtext\r";
        let expected = format!("# Book\r{PAGE_BREAK}## A\r\n{PAGE_BREAK}### B\rtext\r");
        assert_eq!(insert_page_breaks(input), expected);
    }

    #[test]
    fn heading_at_start_of_text() {
        let result = insert_page_breaks("## First");
        assert_eq!(result, format!("{PAGE_BREAK}## First"));
    }
}
