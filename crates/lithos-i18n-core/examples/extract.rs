// SPDX-License-Identifier: Apache-2.0 OR MIT
use lithos_i18n_core::{prune_all_comments, Catalog, Extractor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let extractor = Extractor::new();
    let template = concat!(
        "<h1>{{ _ \"Hello, %[1]s!\" .User.Name /* page title */ }}</h1>\n",
        "<p>{{ printf \"%s\" (_ \"%[1]d items\" (len .Items)) }}</p>\n",
        "<p>{{ _ \"Progress: 100%%\" }} {{ _ \"Broken 50%\" }}</p>\n",
    );

    let extraction = extractor.extract_from("index.tmpl", template);
    for message in &extraction.messages {
        println!("{} => {}", message.key, message.message);
        for placeholder in &message.placeholders {
            println!(
                "  {} #{} ({}) = {}",
                placeholder.id, placeholder.arg_num, placeholder.type_name, placeholder.expr
            );
        }
        if !message.translator_comment.is_empty() {
            println!("  comment: {}", message.translator_comment.replace('\n', " "));
        }
    }
    for skipped in &extraction.skipped {
        println!("skipped {:?}: {}", skipped.key, skipped.error);
    }

    let mut catalog = Catalog::new("en");
    catalog.extend(extraction.messages);
    println!("{}", catalog.to_json()?);

    println!("rendered source:\n{}", prune_all_comments(template));
    Ok(())
}
