#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Scanning layer for translation calls in Go-style text templates.
//!
//! The crate finds `{{ _ "..." }}` actions and their nested sub-expressions,
//! parses and coalesces translator comments, and prunes translator-only
//! annotations out of a template before it is rendered. Everything here is
//! pure and total: malformed input degrades to partial output, never to an
//! error. Message assembly lives in `lithos-i18n-core`.

pub mod carve;
pub mod comment;
mod error;
pub mod lexer;
pub mod prune;
mod span;
pub mod statements;
pub mod telemetry;

pub use carve::{carve, regions, Carved, Segment};
pub use comment::{coalesce, coalesce_comment, parse_comment, TranslatorComment};
pub use error::Error;
pub use lexer::{unquote, IdentRule, Lexer, Token, TokenKind};
pub use prune::{prune_all_comments, prune_command_comments, prune_inline_comments};
pub use span::Span;
pub use statements::{scan_statement_texts, scan_statements, Statement, StatementKind};
