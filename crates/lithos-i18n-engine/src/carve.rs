// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Balanced delimiter carving.
//!
//! Only the opening delimiter is searched for literally; once inside a region
//! nested `open`/`close` pairs are counted and quoted strings (`"..."`,
//! `` `...` ``) as well as `/* ... */` comments are stepped over, so a `)` or
//! `}}` inside a literal never closes the region early.

/// A top-level delimited region cut out of a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carved<'a> {
    /// Text before the opening delimiter.
    pub prefix: &'a str,
    /// Text between the delimiters, delimiters excluded.
    pub interior: &'a str,
    /// Text after the matching closing delimiter.
    pub suffix: &'a str,
}

/// Finds the first top-level `open ... close` region in `text`.
///
/// Returns `None` when `open` does not occur or when it is never balanced by a
/// matching `close`; callers then treat the whole of `text` as plain prefix.
pub fn carve<'a>(text: &'a str, open: &str, close: &str) -> Option<Carved<'a>> {
    if open.is_empty() || close.is_empty() {
        return None;
    }
    let start = text.find(open)?;
    let body_start = start + open.len();
    let mut depth = 1usize;
    let mut cursor = body_start;

    while cursor < text.len() {
        let rest = &text[cursor..];
        if rest.starts_with(close) {
            depth -= 1;
            if depth == 0 {
                return Some(Carved {
                    prefix: &text[..start],
                    interior: &text[body_start..cursor],
                    suffix: &text[cursor + close.len()..],
                });
            }
            cursor += close.len();
        } else if rest.starts_with(open) {
            depth += 1;
            cursor += open.len();
        } else if let Some(skip) = literal_len(rest) {
            cursor += skip;
        } else {
            cursor += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// Piece of text produced by [`regions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any region.
    Text(&'a str),
    /// Interior of a top-level region, delimiters excluded.
    Region(&'a str),
}

/// Walks every top-level `open ... close` region of `text` from left to right.
///
/// Concatenating the segments, with each region re-wrapped in its delimiters,
/// reproduces `text` exactly.
pub fn regions<'a>(text: &'a str, open: &'a str, close: &'a str) -> Regions<'a> {
    Regions {
        remainder: Some(text),
        pending: None,
        open,
        close,
    }
}

#[derive(Debug, Clone)]
pub struct Regions<'a> {
    remainder: Option<&'a str>,
    pending: Option<&'a str>,
    open: &'a str,
    close: &'a str,
}

impl<'a> Iterator for Regions<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(interior) = self.pending.take() {
            return Some(Segment::Region(interior));
        }
        let remainder = self.remainder.take()?;
        match carve(remainder, self.open, self.close) {
            Some(carved) => {
                self.remainder = Some(carved.suffix);
                if carved.prefix.is_empty() {
                    Some(Segment::Region(carved.interior))
                } else {
                    self.pending = Some(carved.interior);
                    Some(Segment::Text(carved.prefix))
                }
            }
            None if remainder.is_empty() => None,
            None => Some(Segment::Text(remainder)),
        }
    }
}

fn literal_len(rest: &str) -> Option<usize> {
    if let Some(body) = rest.strip_prefix("/*") {
        return body.find("*/").map(|idx| idx + 4);
    }
    let mut chars = rest.char_indices();
    let (_, quote) = chars.next()?;
    match quote {
        '`' => rest[1..].find('`').map(|idx| idx + 2),
        '"' => {
            let mut escaped = false;
            for (idx, ch) in chars {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => return Some(idx + 1),
                    '\n' => return None,
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carves_first_region() {
        let carved = carve("a {{ b }} c {{ d }}", "{{", "}}").unwrap();
        assert_eq!(carved.prefix, "a ");
        assert_eq!(carved.interior, " b ");
        assert_eq!(carved.suffix, " c {{ d }}");
    }

    #[test]
    fn respects_nesting() {
        let carved = carve("x (a (b) c) y", "(", ")").unwrap();
        assert_eq!(carved.interior, "a (b) c");
        assert_eq!(carved.suffix, " y");
    }

    #[test]
    fn skips_literals_and_comments() {
        let carved = carve(r#"(_ "a)" /* ) */ `)`) tail"#, "(", ")").unwrap();
        assert_eq!(carved.interior, r#"_ "a)" /* ) */ `)`"#);
        assert_eq!(carved.suffix, " tail");
    }

    #[test]
    fn unbalanced_is_not_found() {
        assert!(carve("a {{ b", "{{", "}}").is_none());
        assert!(carve("(a (b)", "(", ")").is_none());
        assert!(carve("plain", "{{", "}}").is_none());
    }

    #[test]
    fn regions_reassemble_text() {
        let text = "a{{x}}{{y}}b{{ z";
        let segments: Vec<_> = regions(text, "{{", "}}").collect();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Region("x"),
                Segment::Region("y"),
                Segment::Text("b{{ z"),
            ]
        );
    }
}
