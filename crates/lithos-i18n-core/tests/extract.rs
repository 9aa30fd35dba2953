// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_i18n_core::{
    extract_messages, parse_placeholders, prune_all_comments, Catalog, Error, Extractor,
    UNBOUND_EXPR,
};
use serde_json::Value;

const PAGE: &str = r#"<header>
  {{- _ "Welcome back, %[1]s" .User.Name /* header greeting */ -}}
</header>
<main>
  <p>{{ _ "You have %[1]d new messages" .Inbox.Unread }}</p>
  <p>{{ printf "%s" (_ "Last login: %[1]s" (.User.LastLogin | date)) }}</p>
  <a href="/logout">{{ _ "Log out" /* nav link */ }}</a>
</main>"#;

#[test]
fn extracts_a_page_in_source_order() {
    let messages = extract_messages(PAGE).unwrap();
    let keys: Vec<_> = messages.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "Welcome back, %[1]s",
            "You have %[1]d new messages",
            "Last login: %[1]s",
            "Log out",
        ]
    );

    let unread = &messages[1];
    assert_eq!(unread.message, "You have {Unread} new messages");
    assert_eq!(unread.placeholders[0].type_name, "int");
    assert_eq!(unread.placeholders[0].expr, ".Inbox.Unread");

    let login = &messages[2];
    assert_eq!(login.placeholders[0].expr, "(.User.LastLogin | date)");
    assert_eq!(messages[3].translator_comment, "/* nav link */");
}

#[test]
fn pruned_template_keeps_calls_but_loses_comments() {
    let pruned = prune_all_comments(PAGE);
    assert!(!pruned.contains("/*"));
    let keys: Vec<_> = extract_messages(&pruned)
        .unwrap()
        .into_iter()
        .map(|m| m.key)
        .collect();
    assert_eq!(keys.len(), 4);
}

#[test]
fn pipeline_cutoff_can_be_disabled() {
    let template = r#"{{ _ "Hi %s" .Name | upper }}"#;
    let cut = Extractor::new().translatable_statements(template);
    assert_eq!(cut, vec![r#""Hi %s" .Name"#]);

    let mut builder = Extractor::builder();
    builder.pipeline_cutoff(false);
    let whole = builder.build().translatable_statements(template);
    assert_eq!(whole, vec![r#""Hi %s" .Name | upper"#]);
}

#[test]
fn skipped_messages_carry_the_decomposition_error() {
    let extraction = Extractor::new().extract(r#"{{ _ "100%" }}{{ _ "ok" }}"#);
    assert_eq!(extraction.messages.len(), 1);
    assert_eq!(extraction.skipped.len(), 1);
    let skipped = &extraction.skipped[0];
    assert_eq!(skipped.key, "100%");
    assert!(matches!(skipped.error, Error::Decompose { .. }));
}

#[test]
fn placeholders_start_unbound() {
    let parsed = parse_placeholders("%[2]s and %[1]s", &[]).unwrap();
    assert_eq!(parsed.replaced, "{Arg2} and {Arg1}");
    assert_eq!(parsed.labelled, "{Arg2:%[2]s} and {Arg1:%[1]s}");
    assert!(parsed
        .placeholders
        .iter()
        .all(|p| p.expr == UNBOUND_EXPR));
}

#[test]
fn catalog_serialises_messages_in_camel_case() {
    let mut catalog = Catalog::new("en");
    catalog.add_template(&Extractor::new(), "page.tmpl", PAGE);
    catalog.add_template(
        &Extractor::new(),
        "mail.tmpl",
        r#"{{ _ "Log out" }} {{ _ "Unsubscribe" }}"#,
    );
    assert_eq!(catalog.len(), 5);
    assert_eq!(
        catalog.get("Log out").unwrap().translator_comment,
        "/* nav link */\n[from: page.tmpl, mail.tmpl]"
    );

    let json: Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
    let first = &json["messages"][0];
    assert_eq!(first["key"], "Welcome back, %[1]s");
    assert_eq!(first["translation"]["msg"], "Welcome back, {Name}");
    assert_eq!(first["placeholders"][0]["argNum"], 1);
    assert_eq!(first["placeholders"][0]["underlyingType"], "string");
    assert_eq!(first["fuzzy"], true);
    assert!(json["messages"][4].get("translatorComment").is_some());
}

#[test]
fn huge_argument_index_is_skipped_not_fatal() {
    let extraction =
        Extractor::new().extract(r#"{{ _ "%[18446744073709551615]s" .X }}{{ _ "Kept" }}"#);
    let keys: Vec<_> = extraction.messages.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["Kept"]);
    assert_eq!(extraction.skipped.len(), 1);
    assert!(matches!(extraction.skipped[0].error, Error::Decompose { .. }));
}
