// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Grouping of parsed calls into unique messages.

use std::collections::HashMap;

use lithos_i18n_engine::comment::source_annotation;
use lithos_i18n_engine::{coalesce_comment, telemetry, Error};

use crate::decompose::Decomposer;
use crate::message::{Message, Placeholder, Translation, UNBOUND_EXPR};
use crate::parse::ParseState;

/// Result of one extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Unique messages in order of first appearance.
    pub messages: Vec<Message>,
    /// Keys dropped because their format string could not be decomposed.
    pub skipped: Vec<SkippedMessage>,
}

#[derive(Debug)]
pub struct SkippedMessage {
    pub key: String,
    pub error: Error,
}

/// Replaced text, labelled identifier and placeholders of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPlaceholders {
    pub replaced: String,
    pub labelled: String,
    pub placeholders: Vec<Placeholder>,
}

pub(crate) fn parse_placeholders(
    decomposer: &dyn Decomposer,
    format: &str,
    argv: &[String],
) -> Result<ParsedPlaceholders, Error> {
    let decomposition = decomposer.decompose(format, argv)?;
    let placeholders = decomposition
        .substitutions
        .into_iter()
        .map(|sub| Placeholder {
            string: sub.to_string(),
            id: sub.label,
            underlying_type: sub.type_name.clone(),
            type_name: sub.type_name,
            arg_num: sub.pos,
            expr: UNBOUND_EXPR.to_string(),
        })
        .collect();
    Ok(ParsedPlaceholders {
        replaced: decomposition.replaced,
        labelled: decomposition.labelled,
        placeholders,
    })
}

pub(crate) fn build_message(
    decomposer: &dyn Decomposer,
    format: &str,
    comment: &str,
    argv: &[String],
) -> Result<Message, Error> {
    let parsed = parse_placeholders(decomposer, format, argv)?;
    Ok(Message {
        id: parsed.labelled,
        key: format.to_string(),
        translation: Translation {
            msg: parsed.replaced.clone(),
        },
        message: parsed.replaced,
        translator_comment: coalesce_comment(comment),
        placeholders: parsed.placeholders,
        fuzzy: true,
    })
}

/// Groups records by format string, keeping first-seen key order.
pub(crate) fn group_by_format(states: &[ParseState]) -> Vec<Vec<&ParseState>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&ParseState>> = Vec::new();
    for state in states {
        match index.get(state.format.as_str()) {
            Some(&at) => groups[at].push(state),
            None => {
                index.insert(state.format.as_str(), groups.len());
                groups.push(vec![state]);
            }
        }
    }
    groups
}

/// Seeds with the first record's comment, then appends every later non-empty
/// comment that no other record in the group carries verbatim.
pub(crate) fn merge_comments(records: &[&ParseState]) -> String {
    let Some(seed) = records.first() else {
        return String::new();
    };
    let mut comment = seed.comment.clone();
    for (idx, record) in records.iter().enumerate().skip(1) {
        if record.comment.is_empty() {
            continue;
        }
        let duplicate = records
            .iter()
            .enumerate()
            .any(|(jdx, other)| jdx != idx && other.comment == record.comment);
        if duplicate {
            continue;
        }
        if !comment.is_empty() {
            comment.push('\n');
        }
        comment.push_str(&record.comment);
    }
    comment
}

/// Binds every record's arguments to the placeholders by 1-based position.
pub(crate) fn bind_arguments(message: &mut Message, records: &[&ParseState]) {
    for record in records {
        for placeholder in &mut message.placeholders {
            let Some(expr) = placeholder
                .arg_num
                .checked_sub(1)
                .and_then(|index| record.argv.get(index))
            else {
                continue;
            };
            placeholder.bind(expr);
        }
    }
}

pub(crate) fn assemble(
    decomposer: &dyn Decomposer,
    states: &[ParseState],
    source: Option<&str>,
) -> Extraction {
    let mut extraction = Extraction::default();

    for records in group_by_format(states) {
        let seed = records[0];
        let mut comment = merge_comments(&records);
        if let Some(name) = source {
            for _ in &records {
                if !comment.is_empty() {
                    comment.push('\n');
                }
                comment.push_str(&source_annotation(name));
            }
        }

        match build_message(decomposer, &seed.format, &comment, &seed.argv) {
            Ok(mut message) => {
                bind_arguments(&mut message, &records);
                extraction.messages.push(message);
            }
            Err(error) => {
                tracing::warn!(key = %seed.format, %error, "skipping message");
                telemetry::record_skipped(&seed.format);
                extraction.skipped.push(SkippedMessage {
                    key: seed.format.clone(),
                    error,
                });
            }
        }
    }

    extraction
}
