//! Invariants of reference rewriting over generated HTML fragments.

use forgeview_core::catalog::Catalog;
use forgeview_core::types::{Project, ProjectId};
use forgeview_markdown::ReferenceRewriter;
use proptest::prelude::*;
use regex::Regex;
use std::sync::LazyLock;

static INSERTED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a href='https://forge\.example/acme/widgets/~issues/[0-9]+' class='issue'>(#[0-9]+)</a>")
        .unwrap()
});

fn catalog() -> Catalog {
    Catalog::from_json(
        r#"{
            "base_url": "https://forge.example",
            "projects": [
                { "id": 1, "path": "acme/widgets" },
                { "id": 2, "path": "acme/empty" }
            ],
            "issues": [
                { "project_id": 1, "number": 1, "title": "one" },
                { "project_id": 1, "number": 2, "title": "two" },
                { "project_id": 1, "number": 3, "title": "three" },
                { "project_id": 1, "number": 5, "title": "five" }
            ]
        }"#,
    )
    .unwrap()
}

fn project(catalog: &Catalog, id: u64) -> Project {
    catalog.project(ProjectId(id)).unwrap().clone()
}

/// Fragments of rendered markdown: reference tokens, words, entities and tags.
fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..8).prop_map(|n| format!("#{n}")),
        (0u64..8).prop_map(|n| format!("#0{n}")),
        "[a-z_]{1,5}",
        "[ ,.()\n]{1,2}",
        (0u8..100).prop_map(|n| format!("&#{n};")),
        Just("&lt;".to_string()),
        prop::sample::select(vec![
            "<p>",
            "</p>",
            "<em>",
            "</em>",
            "<code>",
            "</code>",
            "<pre>",
            "</pre>",
            "<a href='/x'>",
            "</a>",
            "<br/>",
            "<img alt='x>#3' src=\"y>#5\">",
            "<!-- #2 -->",
        ])
        .prop_map(str::to_string),
    ]
}

fn content() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..32).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn only_resolved_spans_change(input in content()) {
        let catalog = catalog();
        let rewriter = ReferenceRewriter::new(&catalog, &catalog);
        let out = rewriter.rewrite(&input, &project(&catalog, 1));

        let restored = INSERTED_LINK.replace_all(&out.html, "$1");
        prop_assert_eq!(restored.as_ref(), input.as_str());

        let linked = INSERTED_LINK.find_iter(&out.html).count();
        prop_assert!(out.references.len() <= linked);
    }

    #[test]
    fn project_without_issues_leaves_content_untouched(input in content()) {
        let catalog = catalog();
        let rewriter = ReferenceRewriter::new(&catalog, &catalog);
        let out = rewriter.rewrite(&input, &project(&catalog, 2));
        prop_assert_eq!(out.html, input);
        prop_assert!(out.references.is_empty());
    }

    #[test]
    fn rewriting_twice_changes_nothing(input in content()) {
        let catalog = catalog();
        let rewriter = ReferenceRewriter::new(&catalog, &catalog);
        let widgets = project(&catalog, 1);
        let once = rewriter.rewrite(&input, &widgets).html;
        let twice = rewriter.rewrite(&once, &widgets).html;
        prop_assert_eq!(twice, once);
    }
}
