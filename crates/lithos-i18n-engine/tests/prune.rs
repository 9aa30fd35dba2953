// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_i18n_engine::{prune_all_comments, prune_command_comments, prune_inline_comments};

#[test]
fn render_path_sees_no_annotations() {
    let source = concat!(
        "<nav>{{- _ /* screen reader only */ -}}\n",
        r#"  <a>{{ _ "Home" /* top menu */ }}</a>"#,
        "\n",
        r#"  <p>{{ printf "%s, %s" (_ "Hello" /* greeting */) .Name }}</p>"#,
        "\n</nav>",
    );
    let pruned = prune_all_comments(source);
    assert_eq!(
        pruned,
        concat!(
            "<nav>{{- -}}\n",
            r#"  <a>{{ _ "Home" }}</a>"#,
            "\n",
            r#"  <p>{{ printf "%s, %s" (_ "Hello" ) .Name }}</p>"#,
            "\n</nav>",
        )
    );
    assert!(!pruned.contains("/*"));
}

#[test]
fn text_outside_actions_is_preserved() {
    let source = "/* not a template comment */ (_ /* plain */) {{ .X }}";
    assert_eq!(prune_all_comments(source), source);
}

#[test]
fn command_pass_ignores_nested_annotations() {
    let source = r#"{{ printf "%s" (_ "a" /* b */) }}"#;
    assert_eq!(prune_command_comments(source), source);
    assert_eq!(
        prune_inline_comments(source),
        r#"{{ printf "%s" (_ "a" ) }}"#
    );
}

#[test]
fn comment_delimiters_inside_literals_are_not_regions() {
    let source = r#"{{ _ "close }} early" /* note */ }}"#;
    assert_eq!(prune_all_comments(source), r#"{{ _ "close }} early" }}"#);
}

#[test]
fn pruning_twice_is_pruning_once() {
    let sources = [
        "",
        "plain text",
        "{{ _ /* x */ }}",
        r#"{{- _ "a" (_ "b" /* c */) /* d */ -}}"#,
        "{{ ( _ /* e */ ) }} {{ _",
    ];
    for source in sources {
        let once = prune_all_comments(source);
        assert_eq!(prune_all_comments(&once), once, "source: {source:?}");
    }
}
