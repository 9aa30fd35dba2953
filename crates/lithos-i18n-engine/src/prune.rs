// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Removal of translator comment annotations before a template is rendered.
//!
//! An annotated action looks like `{{- _ "Save" /* toolbar button */ -}}` or,
//! nested inside a pipeline, `(_ "Save" /* toolbar button */)`. The comment is
//! meant for translators only, so the rendering path strips everything from
//! the `/*` onward while keeping the call itself and its trim markers. An
//! annotation that carries nothing but the marker (`{{ _ /* note */ }}`) loses
//! the marker as well.

use std::borrow::Cow;
use std::time::Instant;

use crate::carve::{regions, Segment};
use crate::lexer::{IdentRule, Lexer, TokenKind};
use crate::telemetry;

const CALL_MARKER: &str = "_ ";
const COMMENT_CLOSE: &str = "*/";

/// Strips annotations from `{{ ... }}` actions at the top level of `text`.
pub fn prune_command_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in regions(text, "{{", "}}") {
        match segment {
            Segment::Text(plain) => out.push_str(plain),
            Segment::Region(body) => {
                let (left, inner, right) = split_trim_markers(body);
                out.push_str("{{");
                out.push_str(left);
                out.push_str(&strip_annotation(inner));
                out.push_str(right);
                out.push_str("}}");
            }
        }
    }
    out
}

/// Strips annotations from `( ... )` sub-expressions directly inside each
/// `{{ ... }}` action. Text outside actions is left untouched.
pub fn prune_inline_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in regions(text, "{{", "}}") {
        match segment {
            Segment::Text(plain) => out.push_str(plain),
            Segment::Region(body) => {
                out.push_str("{{");
                for inner in regions(body, "(", ")") {
                    match inner {
                        Segment::Text(plain) => out.push_str(plain),
                        Segment::Region(expr) => {
                            out.push('(');
                            out.push_str(&strip_annotation(expr));
                            out.push(')');
                        }
                    }
                }
                out.push_str("}}");
            }
        }
    }
    out
}

/// Full pruning pass: nested sub-expressions first, then whole actions.
///
/// The result is a fixed point, so pruning twice equals pruning once.
pub fn prune_all_comments(text: &str) -> String {
    let started = Instant::now();
    let pruned = prune_command_comments(&prune_inline_comments(text));
    telemetry::record_prune(text.len(), pruned.len(), started.elapsed());
    pruned
}

/// True when `body` is `_ ...` ending in a closed comment.
pub fn is_annotation(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.starts_with(CALL_MARKER) && trimmed.ends_with(COMMENT_CLOSE)
}

fn strip_annotation(body: &str) -> Cow<'_, str> {
    if !is_annotation(body) {
        return Cow::Borrowed(body);
    }
    let Some(idx) = Lexer::new(body, IdentRule::Template)
        .find(|token| token.kind == TokenKind::Comment)
        .map(|token| token.span.start)
    else {
        return Cow::Borrowed(body);
    };
    let head = &body[..idx];
    if head.trim() == CALL_MARKER.trim() {
        // nothing but the marker is left
        let indent = head.len() - head.trim_start().len();
        return Cow::Borrowed(&head[..indent]);
    }
    Cow::Borrowed(head)
}

fn split_trim_markers(body: &str) -> (&str, &str, &str) {
    let (left, rest) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body),
    };
    match rest.strip_suffix('-') {
        Some(inner) => (left, inner, "-"),
        None => (left, rest, ""),
    }
}
