//! Tests for multi-stylesheet scanning and registration.

#![cfg(test)]

mod common;

use anyhow::anyhow;
use common::MockDocument;
use element_query::{QueryEngine, SheetLoader, SheetSource, scan_style_sheets};
use std::collections::HashMap;

/// Loader backed by a fixed href → text map; anything else fails to fetch.
struct MapLoader {
    sheets: HashMap<String, String>,
}

impl MapLoader {
    fn new(entries: &[(&str, &str)]) -> Self {
        let sheets = entries
            .iter()
            .map(|(href, text)| ((*href).to_owned(), (*text).to_owned()))
            .collect();
        Self { sheets }
    }
}

impl SheetLoader for MapLoader {
    async fn fetch(&self, href: &str) -> anyhow::Result<String> {
        self.sheets
            .get(href)
            .cloned()
            .ok_or_else(|| anyhow!("no stylesheet at {href}"))
    }
}

#[tokio::test]
async fn scan_joins_every_sheet_and_skips_failed_fetches() {
    let _ = env_logger::builder().is_test(true).try_init();
    let loader = MapLoader::new(&[("ok.css", ".plain { margin: 0; }")]);
    let sources = vec![
        SheetSource::Inline(".child:media(min-available-width: 10px) { color: red; }".to_owned()),
        SheetSource::External("ok.css".to_owned()),
        SheetSource::External("missing.css".to_owned()),
    ];

    let outcomes = scan_style_sheets(&sources, &loader).await;
    assert_eq!(outcomes.len(), 3);

    let inline = outcomes[0].as_ref().expect("inline sheet parses");
    assert_eq!(inline.queries.len(), 1);
    assert_eq!(inline.queries[0].selector, ".child");

    let fetched = outcomes[1].as_ref().expect("fetched sheet parses");
    assert!(fetched.queries.is_empty());
    assert!(fetched.css.contains(".plain{ margin: 0; }"));

    // The broken sheet yields nothing but never blocks completion.
    assert!(outcomes[2].is_none());
}

#[tokio::test]
async fn scan_and_register_collects_queries_in_submission_order() {
    let loader = MapLoader::new(&[(
        "second.css",
        ".child:media(max-available-width: 500px) { color: blue; }",
    )]);
    let sources = vec![
        SheetSource::Inline(".child:media(min-available-width: 10px) { color: red; }".to_owned()),
        SheetSource::External("second.css".to_owned()),
    ];

    let mut engine: QueryEngine<MockDocument> = QueryEngine::new();
    let combined = engine.scan_and_register(&sources, &loader).await;

    assert_eq!(engine.registry().len(), 2);
    let classes: Vec<&str> = engine
        .registry()
        .iter()
        .map(|registration| registration.class_name.as_str())
        .collect();
    assert_eq!(classes, vec![
        "query_min-available-width_10px",
        "query_max-available-width_500px",
    ]);

    let first = combined
        .find(".child.query_min-available-width_10px{")
        .expect("first rewrite present");
    let second = combined
        .find(".child.query_max-available-width_500px{")
        .expect("second rewrite present");
    assert!(first < second, "rewrites keep submission order");

    // The combined text drives a live document end to end.
    let mut document = MockDocument::new();
    let parent = document.add_element("div", None);
    let child = document.add_element("div", Some(parent));
    document.set_class(child, "child");
    document.set_width(parent, 200.0);
    engine.evaluate_all(&mut document);
    assert!(document.has_class(child, "query_min-available-width_10px"));
    assert!(document.has_class(child, "query_max-available-width_500px"));
}
