// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Decomposition of a format string into labelled substitutions.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use heck::ToUpperCamelCase;
use lithos_i18n_engine::{Error, Span};

/// One verb of a format string, bound to a call argument by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub label: String,
    /// The verb as written, e.g. `%-5[2]d`.
    pub verb: String,
    pub type_name: String,
    /// 1-based argument position.
    pub pos: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Format with each verb replaced by `{Label}`.
    pub replaced: String,
    /// Format with each verb replaced by `{Label:verb}`.
    pub labelled: String,
    pub substitutions: Vec<Substitution>,
}

/// Splits a format string into its substitutions.
///
/// Implemented for closures so callers can plug in other verb dialects.
pub trait Decomposer: Send + Sync {
    fn decompose(&self, format: &str, argv: &[String]) -> Result<Decomposition, Error>;
}

impl<F> Decomposer for F
where
    F: Fn(&str, &[String]) -> Result<Decomposition, Error> + Send + Sync,
{
    fn decompose(&self, format: &str, argv: &[String]) -> Result<Decomposition, Error> {
        self(format, argv)
    }
}

/// Decomposer for Go `fmt` verbs: `%[flags][[n]][width][.prec][[n]]verb`.
///
/// `%%` is a literal percent. An explicit `[n]` selects argument `n` and later
/// verbs continue from `n+1`; a `*` width or precision consumes an argument
/// without producing a substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoVerbDecomposer;

impl Decomposer for GoVerbDecomposer {
    fn decompose(&self, format: &str, argv: &[String]) -> Result<Decomposition, Error> {
        let mut out = Decomposition::default();
        let mut labels = Labels::default();
        let mut next_arg = 1usize;
        let mut chars = format.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            if ch != '%' {
                out.replaced.push(ch);
                out.labelled.push(ch);
                continue;
            }

            let verb = parse_verb(format, start, &mut chars, &mut next_arg)?;
            if verb.verb == '%' {
                out.replaced.push('%');
                out.labelled.push('%');
                continue;
            }

            let label = labels.label_for(verb.pos, argv);
            out.replaced.push_str(&format!("{{{label}}}"));
            out.labelled.push_str(&format!("{{{label}:{}}}", verb.text));
            out.substitutions.push(Substitution {
                label,
                verb: verb.text.to_string(),
                type_name: verb_type(verb.verb).to_string(),
                pos: verb.pos,
            });
        }

        Ok(out)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb)
    }
}

struct Verb<'a> {
    text: &'a str,
    verb: char,
    pos: usize,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

fn parse_verb<'a>(
    format: &'a str,
    start: usize,
    chars: &mut Chars<'_>,
    next_arg: &mut usize,
) -> Result<Verb<'a>, Error> {
    let span_to = |end: usize| Span::new(start, end);

    while let Some(&(_, ch)) = chars.peek() {
        if matches!(ch, '+' | '-' | '#' | ' ' | '0') {
            chars.next();
        } else {
            break;
        }
    }

    let mut index = arg_index(format, start, chars)?;
    if take_star_or_digits(chars) {
        *next_arg = following(index.take().unwrap_or(*next_arg), span_to(format.len()))?;
    }
    if chars.next_if(|&(_, ch)| ch == '.').is_some() {
        if let Some(explicit) = arg_index(format, start, chars)? {
            index = Some(explicit);
        }
        if take_star_or_digits(chars) {
            *next_arg = following(index.take().unwrap_or(*next_arg), span_to(format.len()))?;
        }
    }
    if let Some(explicit) = arg_index(format, start, chars)? {
        index = Some(explicit);
    }

    let Some((at, verb)) = chars.next() else {
        return Err(Error::decompose_with_span(
            "missing verb at end of format",
            span_to(format.len()),
        ));
    };
    let end = at + verb.len_utf8();
    if verb != '%' && !verb.is_alphabetic() {
        return Err(Error::decompose_with_span(
            format!("invalid verb '{verb}'"),
            span_to(end),
        ));
    }

    let pos = if verb == '%' {
        0
    } else {
        let pos = index.unwrap_or(*next_arg);
        *next_arg = following(pos, span_to(end))?;
        pos
    };

    Ok(Verb {
        text: &format[start..end],
        verb,
        pos,
    })
}

/// Largest accepted explicit argument index.
const MAX_ARG_INDEX: usize = u16::MAX as usize;

fn following(pos: usize, span: Span) -> Result<usize, Error> {
    pos.checked_add(1)
        .ok_or_else(|| Error::decompose_with_span("argument position out of range", span))
}

/// Consumes an optional `[n]`; `n` must be in `1..=MAX_ARG_INDEX`.
fn arg_index(format: &str, start: usize, chars: &mut Chars<'_>) -> Result<Option<usize>, Error> {
    let Some((open, _)) = chars.next_if(|&(_, ch)| ch == '[') else {
        return Ok(None);
    };
    let mut digits = String::new();
    for (at, ch) in chars.by_ref() {
        if ch == ']' {
            return match digits.parse::<usize>() {
                Ok(n) if (1..=MAX_ARG_INDEX).contains(&n) => Ok(Some(n)),
                _ => Err(Error::decompose_with_span(
                    format!("bad argument index '[{digits}]'"),
                    Span::new(start, at + 1),
                )),
            };
        }
        digits.push(ch);
    }
    Err(Error::decompose_with_span(
        "unterminated argument index",
        Span::new(open, format.len()),
    ))
}

/// Consumes a `*` or a run of digits; true for `*`.
fn take_star_or_digits(chars: &mut Chars<'_>) -> bool {
    if chars.next_if(|&(_, ch)| ch == '*').is_some() {
        return true;
    }
    while chars.next_if(|&(_, ch)| ch.is_ascii_digit()).is_some() {}
    false
}

fn verb_type(verb: char) -> &'static str {
    match verb {
        'd' | 'b' | 'o' | 'O' | 'c' | 'U' => "int",
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' => "float64",
        't' => "bool",
        _ => "string",
    }
}

#[derive(Default)]
struct Labels {
    assigned: Vec<(usize, String)>,
}

impl Labels {
    fn label_for(&mut self, pos: usize, argv: &[String]) -> String {
        if let Some((_, label)) = self.assigned.iter().find(|(p, _)| *p == pos) {
            return label.clone();
        }
        let base = argv
            .get(pos.wrapping_sub(1))
            .map(|expr| label_from_expr(expr.as_str()))
            .filter(|label| label.chars().next().is_some_and(char::is_alphabetic))
            .unwrap_or_else(|| format!("Arg{pos}"));
        let label = if self.assigned.iter().any(|(_, taken)| *taken == base) {
            format!("{base}{pos}")
        } else {
            base
        };
        self.assigned.push((pos, label.clone()));
        label
    }
}

/// `$.User.Name` → `Name`, `"two words"` → `TwoWords`.
fn label_from_expr(expr: &str) -> String {
    let expr = expr.trim();
    if expr.starts_with('$') || expr.starts_with('.') {
        let last = expr
            .trim_start_matches('$')
            .rsplit('.')
            .find(|segment| !segment.is_empty())
            .unwrap_or("");
        return last.to_upper_camel_case();
    }
    expr.to_upper_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_verbs_from_arguments() {
        let out = GoVerbDecomposer
            .decompose("Hello %[1]s, you have %d new %s", &args(&["$.User.Name", "$.Count"]))
            .unwrap();
        assert_eq!(out.replaced, "Hello {Name}, you have {Count} new {Arg3}");
        assert_eq!(
            out.labelled,
            "Hello {Name:%[1]s}, you have {Count:%d} new {Arg3:%s}"
        );
        let positions: Vec<_> = out.substitutions.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(out.substitutions[1].type_name, "int");
    }

    #[test]
    fn percent_literal_is_not_a_substitution() {
        let out = GoVerbDecomposer.decompose("100%% done", &[]).unwrap();
        assert_eq!(out.replaced, "100% done");
        assert!(out.substitutions.is_empty());
    }

    #[test]
    fn explicit_index_resets_the_counter() {
        let out = GoVerbDecomposer
            .decompose("%[2]s %s %[1]s", &args(&["\"a\"", "\"b\"", "\"c\""]))
            .unwrap();
        let positions: Vec<_> = out.substitutions.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![2, 3, 1]);
    }

    #[test]
    fn repeated_position_reuses_label_and_clashes_get_suffix() {
        let out = GoVerbDecomposer
            .decompose("%[1]s %[1]s %[2]s", &args(&["$.Name", ".Other.Name"]))
            .unwrap();
        assert_eq!(out.replaced, "{Name} {Name} {Name2}");
    }

    #[test]
    fn width_and_precision_are_part_of_the_verb() {
        let out = GoVerbDecomposer
            .decompose("%-8.2f|%*d", &args(&["$.Price", "$.Width", "$.Qty"]))
            .unwrap();
        assert_eq!(out.substitutions[0].verb, "%-8.2f");
        assert_eq!(out.substitutions[0].type_name, "float64");
        assert_eq!(out.substitutions[1].verb, "%*d");
        assert_eq!(out.substitutions[1].pos, 3);
    }

    #[test]
    fn malformed_verbs_are_errors() {
        let err = GoVerbDecomposer.decompose("50%", &[]).unwrap_err();
        assert!(err.to_string().contains("missing verb"));
        let err = GoVerbDecomposer.decompose("a %[x]s", &[]).unwrap_err();
        assert_eq!(err.span(), Some(Span::new(2, 6)));
        assert!(GoVerbDecomposer.decompose("50%!", &[]).is_err());
    }

    #[test]
    fn oversized_argument_index_is_an_error() {
        let err = GoVerbDecomposer
            .decompose("%[18446744073709551615]s", &args(&["$.X"]))
            .unwrap_err();
        assert!(err.to_string().contains("bad argument index"));
        assert_eq!(err.span(), Some(Span::new(0, 23)));
        assert!(GoVerbDecomposer.decompose("%[65536]d", &[]).is_err());
        let out = GoVerbDecomposer.decompose("%[65535]d", &[]).unwrap();
        assert_eq!(out.substitutions[0].pos, 65535);
    }

    #[test]
    fn closures_are_decomposers() {
        let plain = |format: &str, _argv: &[String]| -> Result<Decomposition, Error> {
            Ok(Decomposition {
                replaced: format.to_string(),
                labelled: format.to_string(),
                substitutions: Vec::new(),
            })
        };
        let out = plain.decompose("%s", &[]).unwrap();
        assert_eq!(out.replaced, "%s");
    }
}
