// SPDX-License-Identifier: Apache-2.0 OR MIT
use serde::{Deserialize, Serialize};

/// Expression recorded for a placeholder no call site has bound yet.
pub const UNBOUND_EXPR: &str = "-";

/// One substitution site inside a format string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub id: String,
    /// The verb exactly as written, e.g. `%[1]s`.
    pub string: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub underlying_type: String,
    /// 1-based position of the call argument feeding this placeholder.
    pub arg_num: usize,
    pub expr: String,
}

impl Placeholder {
    pub fn is_bound(&self) -> bool {
        self.expr != UNBOUND_EXPR
    }

    /// Individual expressions bound to this placeholder.
    pub fn exprs(&self) -> impl Iterator<Item = &str> {
        let bound = self.is_bound();
        self.expr.split(", ").filter(move |_| bound)
    }

    /// Adds `expr` to the bindings unless it is already present.
    pub fn bind(&mut self, expr: &str) {
        if !self.is_bound() {
            self.expr = expr.to_string();
        } else if !self.exprs().any(|existing| existing == expr) {
            self.expr.push_str(", ");
            self.expr.push_str(expr);
        }
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub msg: String,
}

/// One unique translatable string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// The format string as written in the template.
    pub key: String,
    pub message: String,
    pub translation: Translation,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub translator_comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<Placeholder>,
    pub fuzzy: bool,
}

impl Message {
    /// Placeholder fed by the 1-based argument `arg_num`, if any.
    pub fn placeholder(&self, arg_num: usize) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.arg_num == arg_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder() -> Placeholder {
        Placeholder {
            id: "Name".into(),
            string: "%[1]s".into(),
            type_name: "string".into(),
            underlying_type: "string".into(),
            arg_num: 1,
            expr: UNBOUND_EXPR.into(),
        }
    }

    #[test]
    fn bind_accumulates_distinct_expressions() {
        let mut p = placeholder();
        assert!(!p.is_bound());
        assert_eq!(p.exprs().count(), 0);
        p.bind("$.Name");
        p.bind("$.User");
        p.bind("$.Name");
        assert_eq!(p.expr, "$.Name, $.User");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let message = Message {
            id: "Hello {Name:%[1]s}".into(),
            key: "Hello %[1]s".into(),
            message: "Hello {Name}".into(),
            translation: Translation {
                msg: "Hello {Name}".into(),
            },
            translator_comment: String::new(),
            placeholders: vec![placeholder()],
            fuzzy: true,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["placeholders"][0]["argNum"], 1);
        assert_eq!(value["placeholders"][0]["type"], "string");
        assert_eq!(value["translation"]["msg"], "Hello {Name}");
        assert!(value.get("translatorComment").is_none());

        assert_eq!(message.placeholder(1).map(|p| p.id.as_str()), Some("Name"));
        assert!(message.placeholder(2).is_none());
    }
}
