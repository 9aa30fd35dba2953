// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Parsing of a single translation call statement.

use lithos_i18n_engine::comment::is_comment;
use lithos_i18n_engine::{unquote, IdentRule, Lexer, Token, TokenKind};

/// Intermediate record for one accepted translation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    /// The format string, quotes removed.
    pub format: String,
    /// Arguments in call order; quoted literals are unquoted.
    pub argv: Vec<String>,
    /// Inline `/* ... */` comments, newline-joined.
    pub comment: String,
}

/// Returns the call body of `statement` when it starts with `marker` followed
/// by a space. With `pipeline_cutoff` the body is cut at the first `|` that is
/// neither inside a literal nor inside a parenthesised group.
pub fn translatable_body<'a>(
    statement: &'a str,
    marker: &str,
    pipeline_cutoff: bool,
) -> Option<&'a str> {
    let body = statement.strip_prefix(marker)?.strip_prefix(' ')?;
    if !pipeline_cutoff {
        return Some(body);
    }
    let mut depth = 0usize;
    for token in Lexer::new(body, IdentRule::Argument) {
        match token.kind {
            TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct(')') => depth = depth.saturating_sub(1),
            TokenKind::Punct('|') if depth == 0 => {
                return Some(body[..token.span.start].trim());
            }
            _ => {}
        }
    }
    Some(body)
}

/// Parses a call body into its format string, arguments and comments.
///
/// The first token longer than two characters must be a quoted literal; a call
/// whose key is a variable or expression returns `None`. A bare token directly
/// following a lone `$` or `.` argument is glued onto it, and a parenthesised
/// group is taken as one argument with its source text as the expression.
pub fn parse_statement(body: &str) -> Option<ParseState> {
    let mut lexer = Lexer::new(body, IdentRule::Argument);
    let mut state = ParseState::default();
    let mut has_format = false;

    while let Some(token) = lexer.next_token() {
        if token.kind == TokenKind::Whitespace {
            continue;
        }
        if !has_format {
            if token.text.len() > 2 {
                if !token.is_quoted() {
                    tracing::trace!(statement = body, "skipping call with a dynamic key");
                    return None;
                }
                state.format = unquote(token.text)?;
                has_format = true;
            }
            continue;
        }

        if token.kind == TokenKind::Comment && is_comment(token.text) {
            if !state.comment.is_empty() {
                state.comment.push('\n');
            }
            state.comment.push_str(token.text);
        } else if token.is_quoted() {
            state.argv.push(unquote(token.text).unwrap_or_default());
        } else if token.is_punct('(') {
            state.argv.push(read_group(body, &mut lexer, token).to_string());
        } else {
            push_bare(&mut state.argv, token.text);
        }
    }

    has_format.then_some(state)
}

fn push_bare(argv: &mut Vec<String>, text: &str) {
    if let Some(last) = argv.last_mut() {
        if last == "$" || last == "." {
            last.push_str(text);
            return;
        }
    }
    argv.push(text.to_string());
}

/// Consumes tokens up to the `)` matching `open`; an unterminated group runs
/// to the end of the body.
fn read_group<'a>(body: &'a str, lexer: &mut Lexer<'a>, open: Token<'a>) -> &'a str {
    let mut depth = 1usize;
    for token in lexer.by_ref() {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth -= 1;
            if depth == 0 {
                return &body[open.span.start..token.span.end];
            }
        }
    }
    &body[open.span.start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_requires_marker() {
        assert_eq!(translatable_body(r#"_ "hi""#, "_", true), Some(r#""hi""#));
        assert_eq!(translatable_body(r#"_"hi""#, "_", true), None);
        assert_eq!(translatable_body(r#"T "hi""#, "_", true), None);
        assert_eq!(translatable_body(r#"T "hi""#, "T", true), Some(r#""hi""#));
    }

    #[test]
    fn body_is_cut_at_pipe_outside_literals() {
        assert_eq!(
            translatable_body(r#"_ "a|b" .X | upper"#, "_", true),
            Some(r#""a|b" .X"#)
        );
        assert_eq!(
            translatable_body(r#"_ "a %s" (.B | date) | upper"#, "_", true),
            Some(r#""a %s" (.B | date)"#)
        );
        assert_eq!(
            translatable_body(r#"_ "a" | upper"#, "_", false),
            Some(r#""a" | upper"#)
        );
    }

    #[test]
    fn parses_format_arguments_and_comments() {
        let state =
            parse_statement(r#""Hello %[1]s from %[2]s" $.User.Name "home" /* greeting */ /* header */"#)
                .unwrap();
        assert_eq!(state.format, "Hello %[1]s from %[2]s");
        assert_eq!(state.argv, vec!["$.User.Name", "home"]);
        assert_eq!(state.comment, "/* greeting */\n/* header */");
    }

    #[test]
    fn rejects_dynamic_keys() {
        assert_eq!(parse_statement("$.DynamicKey"), None);
        assert_eq!(parse_statement("printf \"%s\" .X"), None);
        assert_eq!(parse_statement(""), None);
    }

    #[test]
    fn glues_tokens_after_lone_dollar_or_dot() {
        let state = parse_statement(r#""%s %s" $1 .5"#).unwrap();
        assert_eq!(state.argv, vec!["$1", ".5"]);
    }

    #[test]
    fn parenthesised_group_is_one_argument() {
        let state = parse_statement(r#""Total: %[1]s" (printf "%d" (len .Items)) .Y"#).unwrap();
        assert_eq!(state.argv, vec![r#"(printf "%d" (len .Items))"#, ".Y"]);
    }

    #[test]
    fn short_leading_tokens_are_skipped() {
        let state = parse_statement(r#"$x "Hi""#).unwrap();
        assert_eq!(state.format, "Hi");
    }
}
