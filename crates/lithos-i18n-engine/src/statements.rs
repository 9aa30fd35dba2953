// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Isolation of candidate statements from template source.
//!
//! Every `{{ ... }}` action becomes one statement; every parenthesised
//! sub-expression inside it becomes an additional statement right after it,
//! ordered by where its `(` appears. Sub-expressions are flattened, not nested:
//! `{{ a (b (c)) }}` yields `a (b (c))`, `b (c)` and `c`.

use smallvec::SmallVec;

use crate::lexer::{IdentRule, Lexer, Token, TokenKind};
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Body of a whole `{{ ... }}` action, trim markers removed.
    Action,
    /// Interior of a `( ... )` group inside an action.
    SubExpression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    /// Covers the delimiters: `{{ ... }}` for actions, `( ... )` for groups.
    pub span: Span,
    pub kind: StatementKind,
}

/// Scanner position relative to the `{{`/`}}` delimiters.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    Text,
    OpenBrace { at: usize },
    Block { start: usize },
    CloseBrace { start: usize },
}

/// Scans `input` for actions and their parenthesised sub-expressions.
///
/// Actions left open at the end of input are dropped. A lone `{` or `}` inside
/// an action is not part of the statement text.
pub fn scan_statements(input: &str) -> Vec<Statement> {
    let mut lexer = Lexer::new(input, IdentRule::Template);
    let mut state = ScanState::Text;
    let mut buffer: Vec<Token<'_>> = Vec::new();
    let mut list = Vec::new();

    loop {
        let token = match state {
            ScanState::Text | ScanState::OpenBrace { .. } => lexer.next_raw(),
            ScanState::Block { .. } | ScanState::CloseBrace { .. } => lexer.next_token(),
        };
        let Some(token) = token else {
            break;
        };

        state = match (state, token.kind) {
            (ScanState::Text, TokenKind::Punct('{')) => ScanState::OpenBrace {
                at: token.span.start,
            },
            (ScanState::Text, _) => ScanState::Text,
            (ScanState::OpenBrace { at }, TokenKind::Punct('{')) => {
                buffer.clear();
                ScanState::Block { start: at }
            }
            (ScanState::OpenBrace { .. }, _) => ScanState::Text,
            (ScanState::Block { start } | ScanState::CloseBrace { start }, TokenKind::Punct('{')) => {
                ScanState::Block { start }
            }
            (ScanState::Block { start }, TokenKind::Punct('}')) => ScanState::CloseBrace { start },
            (ScanState::CloseBrace { start }, TokenKind::Punct('}')) => {
                let span = Span::new(start, token.span.end);
                list.push(Statement {
                    text: trim_statement(&concat(&buffer)).to_string(),
                    span,
                    kind: StatementKind::Action,
                });
                list.extend(sub_statements(&buffer));
                buffer.clear();
                ScanState::Text
            }
            (ScanState::Block { start } | ScanState::CloseBrace { start }, _) => {
                buffer.push(token);
                ScanState::Block { start }
            }
        };
    }

    list
}

/// Plain-text variant of [`scan_statements`].
pub fn scan_statement_texts(input: &str) -> Vec<String> {
    scan_statements(input)
        .into_iter()
        .map(|statement| statement.text)
        .collect()
}

/// Removes surrounding whitespace and one trim marker on either side.
pub fn trim_statement(text: &str) -> &str {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('-') {
        trimmed = rest;
    }
    if let Some(rest) = trimmed.strip_suffix('-') {
        trimmed = rest;
    }
    trimmed.trim()
}

struct Frame {
    order: usize,
    open: usize,
    text: String,
}

/// Collects `( ... )` groups from an action's tokens. Each open group keeps its
/// own buffer on an explicit stack; every token is appended to all enclosing
/// buffers so outer groups retain their nested text. Groups still open when
/// the tokens run out are flushed as they are.
fn sub_statements(tokens: &[Token<'_>]) -> Vec<Statement> {
    let mut stack: SmallVec<[Frame; 4]> = SmallVec::new();
    let mut found: Vec<(usize, Statement)> = Vec::new();
    let mut next_order = 0usize;

    for token in tokens {
        if token.is_punct('(') {
            for frame in &mut stack {
                frame.text.push_str(token.text);
            }
            stack.push(Frame {
                order: next_order,
                open: token.span.start,
                text: String::new(),
            });
            next_order += 1;
        } else if token.is_punct(')') {
            let Some(frame) = stack.pop() else {
                continue;
            };
            found.push((
                frame.order,
                Statement {
                    text: frame.text.trim().to_string(),
                    span: Span::new(frame.open, token.span.end),
                    kind: StatementKind::SubExpression,
                },
            ));
            for frame in &mut stack {
                frame.text.push_str(token.text);
            }
        } else {
            for frame in &mut stack {
                frame.text.push_str(token.text);
            }
        }
    }

    let end = tokens.last().map_or(0, |token| token.span.end);
    for frame in stack {
        found.push((
            frame.order,
            Statement {
                text: frame.text.trim().to_string(),
                span: Span::new(frame.open, end),
                kind: StatementKind::SubExpression,
            },
        ));
    }

    found.sort_by_key(|(order, _)| *order);
    found.into_iter().map(|(_, statement)| statement).collect()
}

fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|token| token.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_actions_in_order() {
        let texts = scan_statement_texts(r#"<a>{{ _ "one" }}</a> {{- .Two -}} {{three}}"#);
        assert_eq!(texts, vec![r#"_ "one""#, ".Two", "three"]);
    }

    #[test]
    fn flattens_nested_groups() {
        let statements = scan_statements(r#"{{ _ "hi" (foo (bar "x")) }}"#);
        let texts: Vec<_> = statements.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![r#"_ "hi" (foo (bar "x"))"#, r#"foo (bar "x")"#, r#"bar "x""#]
        );
        assert_eq!(statements[0].kind, StatementKind::Action);
        assert_eq!(statements[1].kind, StatementKind::SubExpression);
        assert_eq!(statements[2].span, Span::new(15, 24));
    }

    #[test]
    fn braces_in_literals_do_not_close() {
        let texts = scan_statement_texts(r#"{{ _ "a }} b" /* } */ }}"#);
        assert_eq!(texts, vec![r#"_ "a }} b" /* } */"#]);
    }

    #[test]
    fn quotes_in_text_do_not_hide_actions() {
        let texts = scan_statement_texts(r#"<a href="{{ _ "x" }}">don't {{ .Y }}</a>"#);
        assert_eq!(texts, vec![r#"_ "x""#, ".Y"]);
    }

    #[test]
    fn lone_braces_are_ignored() {
        assert!(scan_statement_texts("a { b } c }}").is_empty());
        assert_eq!(scan_statement_texts("{{ a } b }}"), vec!["a  b"]);
    }

    #[test]
    fn unterminated_action_is_dropped() {
        assert_eq!(scan_statement_texts("{{ a }} {{ b"), vec!["a"]);
    }

    #[test]
    fn unterminated_group_is_flushed() {
        let texts = scan_statement_texts("{{ a (b (c }}");
        assert_eq!(texts, vec!["a (b (c", "b (c", "c"]);
    }
}
