// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Lossless tokenizer for template action bodies.
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! `text` of a token run reproduces the source it was cut from. The lexer never
//! fails: literals that are not terminated fall back to single punctuation
//! tokens and scanning resumes right after the opening quote.

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// True for string, raw string and character literals.
    pub fn is_quoted(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::String | TokenKind::RawString | TokenKind::Char
        )
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    /// `"..."` with Go escapes.
    String,
    /// `` `...` ``, taken verbatim.
    RawString,
    /// `'x'` or `'\n'`.
    Char,
    /// `/* ... */`; an unterminated comment runs to the end of input.
    Comment,
    Whitespace,
    Punct(char),
}

/// Identifier classification used while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentRule {
    /// Template action bodies: `$`, `.`, `_`, letters and digits (not leading).
    #[default]
    Template,
    /// Translation call arguments: identifiers start with `$`, `.`, `_` or a
    /// letter and only accept digits from the third character on, so `$1`
    /// lexes as `$` followed by `1`.
    Argument,
}

impl IdentRule {
    fn is_start(self, ch: char) -> bool {
        ch.is_alphabetic() || ch == '_' || ch == '$' || ch == '.'
    }

    fn is_part(self, ch: char, index: usize) -> bool {
        match self {
            IdentRule::Template => {
                ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.'
            }
            IdentRule::Argument => {
                ch.is_alphabetic() || ch == '_' || ch == '.' || (ch.is_ascii_digit() && index > 1)
            }
        }
    }
}

/// Tokenizes `input` using the template identifier rule.
pub fn scan(input: &str) -> Vec<Token<'_>> {
    scan_with(input, IdentRule::Template)
}

pub fn scan_with(input: &str, rule: IdentRule) -> Vec<Token<'_>> {
    Lexer::new(input, rule).collect()
}

/// Streaming lexer over a borrowed source.
///
/// Besides [`Lexer::next_token`] it offers [`Lexer::next_raw`], which yields a
/// single character without any literal or identifier recognition. Callers
/// scanning free template text use the raw mode so that quotes or apostrophes
/// outside of actions never swallow an action.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    rule: IdentRule,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, rule: IdentRule) -> Self {
        Self {
            input,
            pos: 0,
            rule,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_raw(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        let chr = self.bump_char()?;
        let kind = if chr.is_whitespace() {
            TokenKind::Whitespace
        } else {
            TokenKind::Punct(chr)
        };
        Some(self.token(kind, start))
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        let chr = self.bump_char()?;

        let kind = match chr {
            c if c.is_whitespace() => TokenKind::Whitespace,
            '"' => self.literal_or_punct(start, chr, Self::read_string, TokenKind::String),
            '`' => self.literal_or_punct(start, chr, Self::read_raw_string, TokenKind::RawString),
            '\'' => self.literal_or_punct(start, chr, Self::read_char, TokenKind::Char),
            '/' if self.peek_char() == Some('*') => {
                self.bump_char();
                self.read_comment();
                TokenKind::Comment
            }
            c if self.rule.is_start(c) => {
                self.read_identifier();
                TokenKind::Identifier
            }
            c if c.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            other => TokenKind::Punct(other),
        };

        Some(self.token(kind, start))
    }

    fn literal_or_punct(
        &mut self,
        start: usize,
        quote: char,
        read: fn(&mut Self) -> bool,
        kind: TokenKind,
    ) -> TokenKind {
        if read(self) {
            kind
        } else {
            self.pos = start + quote.len_utf8();
            TokenKind::Punct(quote)
        }
    }

    fn read_identifier(&mut self) {
        let mut index = 1;
        while let Some(ch) = self.peek_char() {
            if !self.rule.is_part(ch, index) {
                break;
            }
            self.bump_char();
            index += 1;
        }
    }

    fn read_number(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == '.' {
                self.bump_char();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self) -> bool {
        while let Some(ch) = self.bump_char() {
            match ch {
                '"' => return true,
                '\n' => return false,
                '\\' => {
                    if self.bump_char().is_none() {
                        return false;
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn read_raw_string(&mut self) -> bool {
        while let Some(ch) = self.bump_char() {
            if ch == '`' {
                return true;
            }
        }
        false
    }

    fn read_char(&mut self) -> bool {
        match self.bump_char() {
            None | Some('\'' | '\n') => return false,
            Some('\\') => {
                if self.bump_char().is_none() {
                    return false;
                }
            }
            Some(_) => {}
        }
        self.bump_char() == Some('\'')
    }

    fn read_comment(&mut self) {
        match self.input[self.pos..].find("*/") {
            Some(idx) => self.pos += idx + 2,
            None => self.pos = self.input.len(),
        }
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.input[start..self.pos],
            span: Span::new(start, self.pos),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Strips the quotes from a quoted token.
///
/// Double quoted strings and character literals have their Go escapes decoded;
/// raw strings are returned verbatim. Returns `None` when `text` is not a
/// complete quoted literal.
pub fn unquote(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let quote = chars.next()?;
    if !matches!(quote, '"' | '`' | '\'') || text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let body = &text[1..text.len() - 1];
    if quote == '`' {
        return Some(body.to_string());
    }

    let mut literal = String::with_capacity(body.len());
    let mut body_chars = body.chars();
    while let Some(ch) = body_chars.next() {
        if ch != '\\' {
            literal.push(ch);
            continue;
        }
        match body_chars.next() {
            Some('n') => literal.push('\n'),
            Some('r') => literal.push('\r'),
            Some('t') => literal.push('\t'),
            Some('\\') => literal.push('\\'),
            Some('"') => literal.push('"'),
            Some('\'') => literal.push('\''),
            Some(other) => {
                literal.push('\\');
                literal.push(other);
            }
            None => literal.push('\\'),
        }
    }
    Some(literal)
}
