#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Extraction of translatable messages from Go-style text templates.
//!
//! Translation calls are written as `{{ _ "Hello %[1]s" $.User.Name }}`,
//! optionally annotated for translators with inline `/* ... */` comments.
//! [`Extractor`] scans a template, parses every call with a literal format
//! string and folds calls sharing a key into one [`Message`] whose
//! placeholders record the argument expressions bound at each call site.

pub use lithos_i18n_engine::{
    carve, coalesce, coalesce_comment, parse_comment, prune_all_comments, prune_command_comments,
    prune_inline_comments, regions, scan_statement_texts, scan_statements, telemetry, unquote,
    Carved, Error, IdentRule, Lexer, Segment, Span, Statement, StatementKind, Token, TokenKind,
    TranslatorComment,
};

mod assemble;
mod catalog;
mod decompose;
mod message;
mod parse;

pub use assemble::{Extraction, ParsedPlaceholders, SkippedMessage};
pub use catalog::Catalog;
pub use decompose::{Decomposer, Decomposition, GoVerbDecomposer, Substitution};
pub use message::{Message, Placeholder, Translation, UNBOUND_EXPR};
pub use parse::{parse_statement, translatable_body, ParseState};

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Default marker introducing a translation call.
pub const DEFAULT_MARKER: &str = "_";

/// Configured message extractor. Cloning is cheap.
#[derive(Clone)]
pub struct Extractor {
    decomposer: Arc<dyn Decomposer>,
    marker: Arc<str>,
    pipeline_cutoff: bool,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("marker", &self.marker)
            .field("pipeline_cutoff", &self.pipeline_cutoff)
            .finish()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Extractor for `_` calls with Go `fmt` verbs.
    pub fn new() -> Self {
        ExtractorBuilder::new().build()
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Bodies of every translation call in `text`, marker removed and cut at
    /// the pipeline when configured to.
    pub fn translatable_statements(&self, text: &str) -> Vec<String> {
        scan_statements(text)
            .iter()
            .filter_map(|statement| {
                translatable_body(&statement.text, &self.marker, self.pipeline_cutoff)
            })
            .map(str::to_string)
            .collect()
    }

    /// Parsed calls with a literal format string, in source order.
    pub fn parse_states(&self, text: &str) -> Vec<ParseState> {
        self.translatable_statements(text)
            .iter()
            .filter_map(|body| parse_statement(body))
            .collect()
    }

    pub fn extract(&self, text: &str) -> Extraction {
        self.run(None, text)
    }

    /// Like [`Extractor::extract`], tagging each message with
    /// `[from: source_name]` once per call site.
    pub fn extract_from(&self, source_name: &str, text: &str) -> Extraction {
        self.run(Some(source_name), text)
    }

    pub fn parse_placeholders(
        &self,
        format: &str,
        argv: &[String],
    ) -> Result<ParsedPlaceholders, Error> {
        assemble::parse_placeholders(self.decomposer.as_ref(), format, argv)
    }

    pub fn build_message(
        &self,
        format: &str,
        comment: &str,
        argv: &[String],
    ) -> Result<Message, Error> {
        assemble::build_message(self.decomposer.as_ref(), format, comment, argv)
    }

    fn run(&self, source: Option<&str>, text: &str) -> Extraction {
        let started = Instant::now();
        let states = self.parse_states(text);
        let extraction = assemble::assemble(self.decomposer.as_ref(), &states, source);
        tracing::debug!(
            source = source.unwrap_or("<inline>"),
            calls = states.len(),
            messages = extraction.messages.len(),
            skipped = extraction.skipped.len(),
            "extracted messages"
        );
        telemetry::record_extract(
            source.unwrap_or(""),
            text.len(),
            started.elapsed(),
            extraction.messages.len(),
        );
        extraction
    }
}

/// Builder for [`Extractor`].
pub struct ExtractorBuilder {
    decomposer: Arc<dyn Decomposer>,
    marker: String,
    pipeline_cutoff: bool,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self {
            decomposer: Arc::new(GoVerbDecomposer),
            marker: DEFAULT_MARKER.to_string(),
            pipeline_cutoff: true,
        }
    }

    /// Replaces the placeholder decomposition used for every message.
    pub fn decomposer(&mut self, decomposer: impl Decomposer + 'static) -> &mut Self {
        self.decomposer = Arc::new(decomposer);
        self
    }

    /// Sets the call marker; a call is `marker`, one space, then the format.
    pub fn marker(&mut self, marker: impl Into<String>) -> &mut Self {
        self.marker = marker.into();
        self
    }

    /// Whether a call is cut at its first top-level `|`.
    pub fn pipeline_cutoff(&mut self, enabled: bool) -> &mut Self {
        self.pipeline_cutoff = enabled;
        self
    }

    pub fn build(&self) -> Extractor {
        Extractor {
            decomposer: Arc::clone(&self.decomposer),
            marker: Arc::from(self.marker.as_str()),
            pipeline_cutoff: self.pipeline_cutoff,
        }
    }
}

/// Extracts the messages of `text` with the default [`Extractor`].
///
/// Never fails today; messages whose format cannot be decomposed are logged
/// and left out.
pub fn extract_messages(text: &str) -> Result<Vec<Message>, Error> {
    Ok(Extractor::new().extract(text).messages)
}

/// Decomposes `format` with Go `fmt` verb rules.
pub fn parse_placeholders(format: &str, argv: &[String]) -> Result<ParsedPlaceholders, Error> {
    assemble::parse_placeholders(&GoVerbDecomposer, format, argv)
}

/// Builds one fuzzy message for `format`, coalescing `comment`.
pub fn build_message(format: &str, comment: &str, argv: &[String]) -> Result<Message, Error> {
    assemble::build_message(&GoVerbDecomposer, format, comment, argv)
}
