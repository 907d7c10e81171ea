//! Find & Replace across pages

mod common;

use common::{answer_prompts, dispatch, lines, page_html, persisted, ModelBuilder};
use folio::find::count_matches;
use folio::messages::{DocumentMsg, Msg};

fn replace(find: &str, with: &str) -> Msg {
    Msg::Document(DocumentMsg::FindReplace(Some((find.into(), with.into()))))
}

#[test]
fn test_replaces_every_occurrence_on_every_page() {
    let mut model = ModelBuilder::new()
        .page("<div>the cat sat</div><div>cat</div>")
        .page("<p>a <b>cat</b> and a dog</p>")
        .page("<div>no match here</div>")
        .build();
    assert_eq!(count_matches(&model.document, "cat"), 3);

    let cmds = dispatch(&mut model, replace("cat", "lion"));

    assert_eq!(count_matches(&model.document, "cat"), 0);
    assert_eq!(count_matches(&model.document, "lion"), 3);
    assert_eq!(
        page_html(&model, 0),
        "<div>the lion sat</div><div>lion</div>"
    );
    assert_eq!(page_html(&model, 1), "<p>a <b>lion</b> and a dog</p>");
    assert_eq!(page_html(&model, 2), "<div>no match here</div>");
    assert_eq!(model.ui.status_message, "Replaced 3 occurrences on 2 pages");
    assert!(persisted(&cmds).is_some());
}

#[test]
fn test_matching_is_case_sensitive_and_skips_markup() {
    let mut model = ModelBuilder::new()
        .page("<div>Cat <a href=\"cat.html\">cat</a></div>")
        .build();
    dispatch(&mut model, replace("cat", "dog"));
    assert_eq!(
        page_html(&model, 0),
        "<div>Cat <a href=\"cat.html\">dog</a></div>"
    );
}

#[test]
fn test_replacing_with_empty_string_keeps_other_content() {
    let mut model = ModelBuilder::new()
        .page("<div>remove me</div><div>keep</div>")
        .build();
    dispatch(&mut model, replace("remove me", ""));

    let page = &model.document.pages()[0];
    assert!(!page.is_empty());
    assert_eq!(page.text_content().trim(), "keep");
}

#[test]
fn test_no_match_changes_nothing() {
    let mut model = ModelBuilder::new().page("<div>abc</div>").build();
    let cmds = dispatch(&mut model, replace("xyz", "q"));
    assert!(cmds.is_empty());
    assert_eq!(model.ui.status_message, "No matches for 'xyz'");
}

#[test]
fn test_growing_replacement_reflows_pages() {
    let mut model = ModelBuilder::new().small_pages().page(&lines(5)).build();
    let long = "a".repeat(60);
    dispatch(&mut model, replace("line", &long));

    assert!(model.document.page_count() > 1);
    assert_eq!(count_matches(&model.document, &long), 5);
    for page in model.document.pages() {
        assert!(page.nodes.len() <= 2);
    }
}

#[test]
fn test_prompted_find_and_replace() {
    let mut model = ModelBuilder::new().page("<div>one two one</div>").build();
    let cmds = dispatch(&mut model, Msg::Document(DocumentMsg::FindReplace(None)));
    answer_prompts(&mut model, &cmds, &[Some("one"), Some("1")]);
    assert_eq!(page_html(&model, 0), "<div>1 two 1</div>");
}

#[test]
fn test_empty_find_answer_does_nothing() {
    let mut model = ModelBuilder::new().page("<div>text</div>").build();
    let cmds = dispatch(&mut model, Msg::Document(DocumentMsg::FindReplace(None)));
    let after = answer_prompts(&mut model, &cmds, &[Some("")]);
    assert!(after.is_empty());
    assert_eq!(model.ui.status_message, "Nothing to find");
}
