// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::span::Span;
use thiserror::Error;

/// Unified error type for message extraction.
///
/// Scanning and pruning are total and never fail; errors only arise when a
/// format string cannot be decomposed into placeholders or when a catalog
/// cannot be (de)serialised. Decomposition errors carry the `Span` of the
/// offending verb inside the format string when it is known.
#[derive(Debug, Error)]
pub enum Error {
    #[error("decompose error: {message}")]
    Decompose {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        span: Option<Span>,
    },
    #[error("catalog error: {message}")]
    Catalog {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub fn decompose(message: impl Into<String>, span: Option<Span>) -> Self {
        Error::Decompose {
            message: message.into(),
            source: None,
            span,
        }
    }

    pub fn decompose_with_span(message: impl Into<String>, span: Span) -> Self {
        Self::decompose(message, Some(span))
    }

    pub fn catalog(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Catalog {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Location of the failure inside the format string, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Decompose { span, .. } => *span,
            Error::Catalog { .. } => None,
        }
    }
}
