//! Typing, deleting and selection tracking through `update`

mod common;

use common::{current_index, dispatch, dispatch_all, lines, page_html, ModelBuilder};
use folio::messages::{AppMsg, EditMsg, Msg};
use folio::model::{Position, Selection};

#[test]
fn test_plain_lines_become_paragraph_blocks() {
    let mut model = ModelBuilder::new().build();
    dispatch(&mut model, Msg::insert_text("first\nsecond\nthird"));
    assert_eq!(
        page_html(&model, 0),
        "<div>first</div><div>second</div><div>third</div>"
    );
}

#[test]
fn test_backspace_merges_paragraphs() {
    let mut model = ModelBuilder::new().page("<div>ab</div><div>cd</div>").build();
    let page = model.document.first_page_id();
    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            page, 1, 0,
        )))),
    );
    dispatch(&mut model, Msg::Edit(EditMsg::DeleteBackward));

    assert_eq!(page_html(&model, 0), "<div>abcd</div>");
    assert_eq!(
        model.context.selection,
        Some(Selection::collapsed(Position::new(page, 0, 2)))
    );
}

#[test]
fn test_backspace_at_start_of_page_does_nothing() {
    let mut model = ModelBuilder::new().page(&lines(1)).page("<div>x</div>").build();
    let second = model.document.last_page_id();
    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            second, 0, 0,
        )))),
    );
    let cmds = dispatch(&mut model, Msg::Edit(EditMsg::DeleteBackward));

    assert!(cmds.is_empty());
    assert_eq!(page_html(&model, 1), "<div>x</div>");
}

#[test]
fn test_typing_replaces_selection() {
    let mut model = ModelBuilder::new().page("<div>hello world</div>").build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectRange { from: 6, to: 11 }),
            Msg::insert_text("there"),
        ],
    );
    assert_eq!(page_html(&model, 0), "<div>hello there</div>");
}

#[test]
fn test_selection_on_other_page_moves_current_page() {
    let mut model = ModelBuilder::new().page(&lines(2)).page(&lines(2)).build();
    let first = model.document.first_page_id();
    assert_eq!(current_index(&model), 1);

    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            first, 1, 2,
        )))),
    );
    assert_eq!(model.context.current_page, first);
}

#[test]
fn test_selection_is_clamped_to_page_content() {
    let mut model = ModelBuilder::new().page("<div>abc</div>").build();
    let page = model.document.first_page_id();
    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            page, 9, 99,
        )))),
    );
    assert_eq!(
        model.context.selection,
        Some(Selection::collapsed(Position::new(page, 0, 3)))
    );
}

#[test]
fn test_save_and_restore_selection() {
    let mut model = ModelBuilder::new().page("<div>abcdef</div>").build();
    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SelectRange { from: 1, to: 3 }),
            Msg::Edit(EditMsg::SaveSelection),
            Msg::Edit(EditMsg::SelectAllOnPage),
            Msg::Edit(EditMsg::RestoreSelection),
            Msg::insert_text("X"),
        ],
    );
    assert_eq!(page_html(&model, 0), "<div>aXdef</div>");
}

#[test]
fn test_restore_without_saved_selection_is_noop() {
    let mut model = ModelBuilder::new().page("<div>abc</div>").build();
    let before = model.context.selection;
    dispatch(&mut model, Msg::Edit(EditMsg::RestoreSelection));
    assert_eq!(model.context.selection, before);
}

#[test]
fn test_delete_across_pages_leaves_emptied_pages() {
    let mut model = ModelBuilder::new()
        .page("<div>keep</div><div>gone</div>")
        .page("<div>all gone</div>")
        .page("<div>gone too</div><div>stays</div>")
        .build();
    let pages: Vec<_> = model.document.pages().iter().map(|p| p.id).collect();

    dispatch_all(
        &mut model,
        [
            Msg::Edit(EditMsg::SetSelection(Selection::new(
                Position::new(pages[0], 1, 0),
                Position::new(pages[2], 1, 0),
            ))),
            Msg::Edit(EditMsg::DeleteSelection),
        ],
    );

    assert_eq!(model.document.page_count(), 3);
    assert_eq!(page_html(&model, 0), "<div>keep</div>");
    assert!(model.document.pages()[1].nodes.is_empty());
    assert_eq!(page_html(&model, 2), "<div>stays</div>");
    assert_eq!(model.context.current_page, pages[0]);
}

#[test]
fn test_focus_missing_page_raises_notice() {
    let mut model = ModelBuilder::new().build();
    dispatch(&mut model, Msg::Edit(EditMsg::FocusPage(4)));
    assert_eq!(
        model.ui.take_notice().as_deref(),
        Some("No page 5 (document has 1)")
    );
}

#[test]
fn test_clipboard_text_with_angle_brackets_is_kept_literally() {
    let mut model = ModelBuilder::new().page("<div>note: </div>").build();
    dispatch(
        &mut model,
        Msg::App(AppMsg::ClipboardRead(Ok("if a<b and c>d then swap".into()))),
    );

    assert_eq!(
        model.current_page().text_content(),
        "note: if a<b and c>d then swap"
    );
    assert!(page_html(&model, 0).contains("if a&lt;b and c&gt;d then swap"));
}

#[test]
fn test_paste_text_keeps_markup_characters() {
    let mut model = ModelBuilder::new().page("<div>x</div>").build();
    dispatch(&mut model, Msg::Edit(EditMsg::PasteText("a<b & <i>c</i>".into())));
    assert!(model.current_page().text_content().ends_with("a<b & <i>c</i>"));
    assert!(!page_html(&model, 0).contains("<i>"));
}
