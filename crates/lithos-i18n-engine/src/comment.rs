// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Translator comments: human notes plus source provenance.
//!
//! A coalesced translator comment has the shape
//!
//! ```text
//! /* screen reader only; toolbar */
//! [from: layouts/partials/footer.tmpl, layouts/page.tmpl=2]
//! ```
//!
//! where `=N` records that a source cited the message `N` times.

use std::collections::HashMap;

const COMMENT_OPEN: &str = "/*";
const SOURCE_OPEN: &str = "[from: ";

/// Parsed form of a translator comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatorComment {
    pub comments: Vec<String>,
    pub sources: Vec<String>,
}

impl TranslatorComment {
    /// Runs the comment scanner over `input`.
    ///
    /// Newlines are ignored everywhere. Spans left open at the end of input are
    /// discarded without error.
    pub fn parse(input: &str) -> Self {
        let mut parser = CommentParser::default();
        let mut chars = input.char_indices().peekable();
        while let Some((idx, this)) = chars.next() {
            if parser.skip > 0 {
                parser.skip -= 1;
                continue;
            }
            if this == '\n' {
                continue;
            }
            let next = chars.peek().map(|(_, ch)| *ch);
            parser.step(this, next, &input[idx..]);
        }
        parser.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.sources.is_empty()
    }

    /// Renders the canonical comment string; see [`coalesce`].
    pub fn coalesce(&self) -> String {
        coalesce(&self.comments, &self.sources)
    }
}

/// Scanner state; one variant per span kind.
#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Comment(String),
    Source(String),
}

#[derive(Debug, Default)]
struct CommentParser {
    state: ScanState,
    skip: usize,
    comments: Vec<String>,
    sources: Vec<String>,
}

impl CommentParser {
    fn step(&mut self, this: char, next: Option<char>, rest: &str) {
        self.state = match std::mem::take(&mut self.state) {
            ScanState::Comment(text) => self.in_comment(text, this, next),
            ScanState::Source(text) => self.in_source(text, this, next),
            ScanState::Idle => self.idle(this, next, rest),
        };
    }

    fn in_comment(&mut self, mut text: String, this: char, next: Option<char>) -> ScanState {
        if this == '*' && next == Some('/') {
            self.skip = 1;
            self.comments.push(text.trim().to_string());
            return ScanState::Idle;
        }
        text.push(this);
        ScanState::Comment(text)
    }

    fn in_source(&mut self, mut text: String, this: char, next: Option<char>) -> ScanState {
        if this == ',' && next == Some(' ') {
            self.skip = 1;
            self.sources.push(text.trim().to_string());
            return ScanState::Source(String::new());
        }
        if this == ']' {
            self.sources.push(text.trim().to_string());
            return ScanState::Idle;
        }
        text.push(this);
        ScanState::Source(text)
    }

    fn idle(&mut self, this: char, next: Option<char>, rest: &str) -> ScanState {
        if this == '/' && next == Some('*') {
            self.skip = 1;
            return ScanState::Comment(String::new());
        }
        if rest.starts_with(SOURCE_OPEN) {
            self.skip = SOURCE_OPEN.len() - 1;
            return ScanState::Source(String::new());
        }
        ScanState::Idle
    }

    fn finish(self) -> TranslatorComment {
        TranslatorComment {
            comments: self.comments,
            sources: self.sources,
        }
    }
}

/// Splits a translator comment into its human comments and source names.
pub fn parse_comment(input: &str) -> (Vec<String>, Vec<String>) {
    let parsed = TranslatorComment::parse(input);
    (parsed.comments, parsed.sources)
}

/// Parses `input` and renders it back in canonical form.
pub fn coalesce_comment(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    TranslatorComment::parse(input).coalesce()
}

/// Merges comments and sources into one canonical translator comment.
///
/// Comments are deduplicated in first-seen order and joined with `"; "`.
/// Sources are deduplicated the same way; a source cited more than once gets
/// an `=N` suffix. A source already carrying such a suffix counts `N` times, so
/// merging coalesced comments keeps the totals right. Empty entries are
/// dropped and absent parts produce no markers. A trailing `=N` is always
/// read as a count, so source names must not end in `=` plus digits.
pub fn coalesce<C, S>(comments: &[C], sources: &[S]) -> String
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    let mut unique_comments: Vec<&str> = Vec::new();
    for comment in comments.iter().map(AsRef::as_ref) {
        if !comment.is_empty() && !unique_comments.contains(&comment) {
            unique_comments.push(comment);
        }
    }

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for source in sources.iter().map(AsRef::as_ref) {
        let (name, count) = split_count(source);
        if name.is_empty() {
            continue;
        }
        let total = counts.entry(name).or_insert(0);
        if *total == 0 {
            order.push(name);
        }
        *total += count;
    }

    let mut coalesced = String::new();
    if !unique_comments.is_empty() {
        coalesced.push_str("/* ");
        coalesced.push_str(&unique_comments.join("; "));
        coalesced.push_str(" */");
    }
    if !order.is_empty() {
        let cited: Vec<String> = order
            .iter()
            .map(|name| match counts.get(name) {
                Some(&count) if count > 1 => format!("{name}={count}"),
                _ => (*name).to_string(),
            })
            .collect();
        if !coalesced.is_empty() {
            coalesced.push('\n');
        }
        coalesced.push_str(SOURCE_OPEN);
        coalesced.push_str(&cited.join(", "));
        coalesced.push(']');
    }
    coalesced
}

/// Wraps a source name in provenance syntax: `[from: name]`.
pub fn source_annotation(name: &str) -> String {
    format!("{SOURCE_OPEN}{name}]")
}

/// True when `text` opens with a `/*` comment marker.
pub fn is_comment(text: &str) -> bool {
    text.starts_with(COMMENT_OPEN)
}

fn split_count(source: &str) -> (&str, usize) {
    if let Some((name, count)) = source.rsplit_once('=') {
        if let Ok(count) = count.parse::<usize>() {
            if count > 0 {
                return (name, count);
            }
        }
    }
    (source, 1)
}
