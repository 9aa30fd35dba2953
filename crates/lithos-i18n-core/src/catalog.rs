// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::collections::HashMap;

use lithos_i18n_engine::{coalesce_comment, Error};
use serde::{Deserialize, Serialize};

use crate::{Extractor, Message};

/// Messages collected across many templates for one language.
///
/// Messages are unique by key and keep the order in which keys were first
/// seen. Adding a message whose key is already present merges the two:
/// translator comments are re-coalesced (repeated sources add up their
/// counts) and placeholder expressions are unioned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CatalogDocument")]
pub struct Catalog {
    language: String,
    messages: Vec<Message>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    language: String,
    #[serde(default)]
    messages: Vec<Message>,
}

impl From<CatalogDocument> for Catalog {
    fn from(document: CatalogDocument) -> Self {
        let mut catalog = Catalog::new(document.language);
        catalog.extend(document.messages);
        catalog
    }
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            messages: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Message> {
        self.index.get(key).map(|&at| &self.messages[at])
    }

    /// Extracts the messages of one template, citing `source_name` as their
    /// origin, and merges them in. Returns the number of messages the template
    /// contributed.
    pub fn add_template(&mut self, extractor: &Extractor, source_name: &str, text: &str) -> usize {
        let extraction = extractor.extract_from(source_name, text);
        let count = extraction.messages.len();
        self.extend(extraction.messages);
        count
    }

    pub fn insert(&mut self, message: Message) {
        match self.index.get(&message.key) {
            Some(&at) => merge_into(&mut self.messages[at], message),
            None => {
                self.index.insert(message.key.clone(), self.messages.len());
                self.messages.push(message);
            }
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
            .map_err(|err| Error::catalog("failed to serialise catalog", err))
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|err| Error::catalog("failed to parse catalog", err))
    }
}

impl Extend<Message> for Catalog {
    fn extend<T: IntoIterator<Item = Message>>(&mut self, iter: T) {
        for message in iter {
            self.insert(message);
        }
    }
}

fn merge_into(existing: &mut Message, incoming: Message) {
    if existing.translator_comment.is_empty() {
        existing.translator_comment = incoming.translator_comment;
    } else if !incoming.translator_comment.is_empty() {
        existing.translator_comment = coalesce_comment(&format!(
            "{}\n{}",
            existing.translator_comment, incoming.translator_comment
        ));
    }

    for (slot, other) in existing
        .placeholders
        .iter_mut()
        .zip(incoming.placeholders.iter())
    {
        if slot.arg_num != other.arg_num {
            continue;
        }
        for expr in other.exprs() {
            slot.bind(expr);
        }
    }
}
