//! Formatting commands applied through `update`

mod common;

use common::{dispatch, dispatch_all, lines, page_html, persisted, ModelBuilder};
use folio::format::{BlockTag, FormatCommand};
use folio::messages::{EditMsg, FormatMsg, Msg};
use folio::model::{Position, Selection};
use folio::persistence::{decode_document, encode_document};

fn named(name: &str, value: Option<&str>) -> Msg {
    Msg::Format(FormatMsg::ApplyNamed {
        name: name.to_string(),
        value: value.map(str::to_string),
    })
}

#[test]
fn test_bold_toggles_on_and_off() {
    let mut model = ModelBuilder::new().page("<div>hello world</div>").build();
    let select = || Msg::Edit(EditMsg::SelectRange { from: 0, to: 5 });

    let cmds = dispatch_all(&mut model, [select(), Msg::format(FormatCommand::Bold)]);
    assert_eq!(page_html(&model, 0), "<div><b>hello</b> world</div>");
    assert!(persisted(&cmds).is_some_and(|m| m.contains("<b>hello</b>")));

    dispatch_all(&mut model, [select(), Msg::format(FormatCommand::Bold)]);
    assert_eq!(page_html(&model, 0), "<div>hello world</div>");
}

#[test]
fn test_selection_across_pages_formats_both() {
    let mut model = ModelBuilder::new()
        .page("<div>one</div>")
        .page("<div>two</div>")
        .build();
    let pages: Vec<_> = model.document.pages().iter().map(|p| p.id).collect();

    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SetSelection(Selection::new(
                Position::new(pages[0], 0, 0),
                Position::new(pages[1], 0, 3),
            ))),
            Msg::format(FormatCommand::Italic),
        ],
    );

    assert_eq!(page_html(&model, 0), "<div><i>one</i></div>");
    assert_eq!(page_html(&model, 1), "<div><i>two</i></div>");
}

#[test]
fn test_heading_growth_reflows_page() {
    let mut model = ModelBuilder::new().small_pages().page(&lines(5)).build();
    let page = model.document.first_page_id();

    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
                page, 0, 2,
            )))),
            named("formatBlock", Some("h1")),
        ],
    );

    assert_eq!(model.document.page_count(), 2);
    assert_eq!(
        page_html(&model, 0),
        "<h1>line 0</h1><div>line 1</div>"
    );
    assert_eq!(
        page_html(&model, 1),
        "<div>line 2</div><div>line 3</div><div>line 4</div>"
    );
}

#[test]
fn test_clear_format_strips_inline_tags_only() {
    let mut model = ModelBuilder::new()
        .page("<h2><b>bold</b> <i>it</i></h2>")
        .build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectAllOnPage),
            Msg::Format(FormatMsg::ClearFormat),
        ],
    );
    assert_eq!(page_html(&model, 0), "<h2>bold it</h2>");
}

#[test]
fn test_unknown_or_invalid_commands_are_silent() {
    let mut model = ModelBuilder::new().page("<div>text</div>").build();
    dispatch(&mut model, Msg::Edit(EditMsg::SelectAllOnPage));

    for msg in [
        named("explode", None),
        named("fontSize", Some("9")),
        named("formatBlock", Some("h7")),
        named("foreColor", None),
    ] {
        assert!(dispatch(&mut model, msg).is_empty());
    }
    assert_eq!(page_html(&model, 0), "<div>text</div>");
    assert!(model.ui.notice.is_none());
}

#[test]
fn test_named_commands_match_typed_commands() {
    for (name, value, command) in [
        ("bold", None, FormatCommand::Bold),
        ("justifyCenter", None, FormatCommand::Align(folio::format::Alignment::Center)),
        ("fontSize", Some("5"), FormatCommand::FontSize(5)),
        ("createLink", Some("https://x.org"), FormatCommand::CreateLink("https://x.org".into())),
    ] {
        let parsed = FormatCommand::from_name(name, value).unwrap();
        assert_eq!(parsed, command);
        assert_eq!(parsed.name().to_ascii_lowercase(), name.to_ascii_lowercase());
    }
}

#[test]
fn test_unordered_list_over_two_paragraphs() {
    let mut model = ModelBuilder::new().page("<div>a</div><div>b</div>").build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectAllOnPage),
            named("insertUnorderedList", None),
        ],
    );
    assert_eq!(page_html(&model, 0), "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn test_paragraph_format_inside_indent_survives_reload() {
    let mut model = ModelBuilder::new()
        .page("<div>one</div><div>two</div>")
        .build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectAllOnPage),
            Msg::format(FormatCommand::Indent),
            Msg::Edit(EditMsg::SelectAllOnPage),
            Msg::format(FormatCommand::FormatBlock(BlockTag::Paragraph)),
        ],
    );

    let page = &model.document.pages()[0];
    assert_eq!(page.nodes.len(), 1);
    assert!(page_html(&model, 0).starts_with("<blockquote"));
    assert!(page_html(&model, 0).ends_with("><p>one</p><p>two</p></blockquote>"));

    let restored = decode_document(&encode_document(&model.document));
    assert_eq!(restored.pages()[0].nodes, page.nodes);
}

#[test]
fn test_heading_format_keeps_wrapping_div_around_table() {
    let mut model = ModelBuilder::new()
        .page("<div><div>caption</div><table><tbody><tr><td>x</td></tr></tbody></table></div>")
        .build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectAllOnPage),
            Msg::format(FormatCommand::FormatBlock(BlockTag::Heading(2))),
        ],
    );

    assert_eq!(
        page_html(&model, 0),
        "<div><h2>caption</h2><table><tbody><tr><td>x</td></tr></tbody></table></div>"
    );
    let restored = decode_document(&encode_document(&model.document));
    assert_eq!(restored.pages()[0].nodes, model.document.pages()[0].nodes);
}
