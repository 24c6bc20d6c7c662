//! Markdown rewrite passes used while merging year groups.
//!
//! - [`adjust_heading`] / [`adjust_headings`] push every heading one level
//!   deeper so source documents nest under a synthetic year heading.
//! - [`insert_page_breaks`] forces a page break before section headings of
//!   the merged book.

mod page_break;

use std::borrow::Cow;

pub use page_break::{PAGE_BREAK, insert_page_breaks};

/// Heading marker character.
pub const HEADING_MARKER: char = '#';

/// Level of an ATX heading line (`## Title` is 2), or `None` when the line
/// is not a heading. Markers must be followed by a space.
pub fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.len() - line.trim_start_matches(HEADING_MARKER).len();
    if hashes > 0 && line[hashes..].starts_with(' ') {
        Some(hashes)
    } else {
        None
    }
}

/// Shift a single heading line one level deeper.
///
/// `"## Setup\n"` becomes `"### Setup\n"`; the space and everything after it
/// are kept byte for byte. Lines that are not headings come back unchanged,
/// including marker runs without a following space (`"###"`, `"#tag"`).
pub fn adjust_heading(line: &str) -> Cow<'_, str> {
    match heading_level(line) {
        Some(_) => {
            let mut out = String::with_capacity(line.len() + 1);
            out.push(HEADING_MARKER);
            out.push_str(line);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(line),
    }
}

/// Apply [`adjust_heading`] to every line of `text`, keeping line
/// terminators (including a missing final newline) exactly as they were.
///
/// `\n`, `\r\n` and a bare `\r` all end a line.
pub fn adjust_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for line in lines_inclusive(text) {
        out.push_str(&adjust_heading(line));
    }
    out
}

/// Split `text` into lines, each keeping its terminator.
fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\r', '\n']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}
