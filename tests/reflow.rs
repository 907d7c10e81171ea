//! Pagination behaviour driven through `update`

mod common;

use common::{current_index, dispatch, dispatch_all, flattened, lines, page_html, ModelBuilder};
use folio::markup::parse_fragment;
use folio::measure::Measure;
use folio::messages::{EditMsg, InsertMsg, Msg};
use folio::model::{AppModel, Document, EditingContext, Position, Selection};
use folio::reflow::reflow_page;

fn typing_session(lines: usize) -> Vec<Msg> {
    let mut msgs = Vec::new();
    for i in 0..lines {
        msgs.push(Msg::insert_text(format!("line {}x", i)));
        msgs.push(Msg::Edit(EditMsg::DeleteBackward));
        msgs.push(Msg::Edit(EditMsg::InsertParagraph));
    }
    msgs
}

fn assert_within_capacity(model: &AppModel) {
    let width = model.config.page.content_width();
    let capacity = model.config.page.capacity();
    for (i, page) in model.document.pages().iter().enumerate() {
        let extent = model.config.metrics.extent(&page.nodes, width);
        assert!(
            extent <= capacity || page.nodes.len() == 1,
            "page {} is {}px tall with {} nodes",
            i,
            extent,
            page.nodes.len()
        );
    }
}

#[test]
fn test_typing_past_capacity_opens_second_page() {
    let mut model = ModelBuilder::new().small_pages().build();

    for i in 0..5 {
        dispatch(&mut model, Msg::insert_text(format!("line {}", i)));
        if i < 4 {
            dispatch(&mut model, Msg::Edit(EditMsg::InsertParagraph));
        }
    }
    assert_eq!(model.document.page_count(), 1);

    // The empty paragraph Enter creates no longer fits
    dispatch(&mut model, Msg::Edit(EditMsg::InsertParagraph));

    assert_eq!(model.document.page_count(), 2);
    assert_eq!(page_html(&model, 0), lines(5));
    assert_eq!(page_html(&model, 1), "<div><br></div>");
    assert_eq!(current_index(&model), 1);

    dispatch(&mut model, Msg::insert_text("line 5"));
    assert_eq!(page_html(&model, 1), "<div>line 5</div>");
}

#[test]
fn test_second_page_holds_the_overflowed_suffix_in_order() {
    let nodes = parse_fragment(&lines(8));
    let mut doc = Document::from_pages(vec![nodes.clone()]);
    let page = doc.first_page_id();
    let mut ctx = EditingContext::new(page);
    ctx.set_caret(Position::new(page, 7, 6));

    let config = common::small_pages();
    let outcome = reflow_page(&mut doc, &mut ctx, page, &config.metrics, &config.page);

    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.moved, 3);
    assert_eq!(doc.pages()[0].nodes, nodes[..5].to_vec());
    assert_eq!(doc.pages()[1].nodes, nodes[5..].to_vec());
    assert_eq!(ctx.current_page, doc.pages()[1].id);
}

#[test]
fn test_cascade_focuses_last_created_page_even_when_caret_lands_midway() {
    let nodes = parse_fragment(&lines(12));
    let mut doc = Document::from_pages(vec![nodes]);
    let page = doc.first_page_id();
    let mut ctx = EditingContext::new(page);
    ctx.set_caret(Position::new(page, 6, 2));

    let config = common::small_pages();
    let outcome = reflow_page(&mut doc, &mut ctx, page, &config.metrics, &config.page);

    let counts: Vec<_> = doc.pages().iter().map(|p| p.nodes.len()).collect();
    assert_eq!(counts, vec![5, 5, 2]);
    let last = &doc.pages()[2];
    assert_eq!(outcome.created.last(), Some(&last.id));
    assert_eq!(ctx.current_page, last.id);
    assert_eq!(ctx.selection, Some(Selection::collapsed(last.end_position())));
}

#[test]
fn test_pagination_never_drops_or_duplicates_content() {
    let mut paged = ModelBuilder::new().small_pages().build();
    let mut unpaged = ModelBuilder::new().build();

    dispatch_all(&mut paged, typing_session(17));
    dispatch_all(&mut unpaged, typing_session(17));

    assert!(paged.document.page_count() > 3);
    assert_eq!(unpaged.document.page_count(), 1);
    assert_eq!(flattened(&paged), flattened(&unpaged));
    assert_within_capacity(&paged);
}

#[test]
fn test_large_paste_cascades_across_pages() {
    let mut model = ModelBuilder::new().small_pages().build();
    dispatch(&mut model, Msg::Edit(EditMsg::PasteHtml(lines(23))));

    let counts: Vec<_> = model.document.pages().iter().map(|p| p.nodes.len()).collect();
    assert_eq!(counts, vec![5, 5, 5, 5, 3]);
    assert_eq!(flattened(&model), parse_fragment(&lines(23)));
    assert_eq!(current_index(&model), 4);
    assert_within_capacity(&model);
}

#[test]
fn test_oversize_image_stays_alone_on_its_page() {
    let mut model = ModelBuilder::new().small_pages().page(&lines(2)).build();
    dispatch(
        &mut model,
        Msg::Edit(EditMsg::PasteHtml(
            "<p><img src=\"big.png\" width=\"300\" height=\"500\"></p>".to_string(),
        )),
    );

    assert_eq!(model.document.page_count(), 2);
    assert_eq!(model.document.pages()[1].nodes.len(), 1);
    assert!(page_html(&model, 1).contains("big.png"));
    assert_within_capacity(&model);
}

#[test]
fn test_overflow_on_earlier_page_inserts_directly_after_it() {
    let mut model = ModelBuilder::new()
        .small_pages()
        .page(&lines(5))
        .page("<div>tail</div>")
        .build();
    let first = model.document.first_page_id();
    let tail = model.document.last_page_id();

    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            first, 4, 6,
        )))),
    );
    assert_eq!(model.context.current_page, first);
    dispatch(&mut model, Msg::insert_text("\nnew line"));

    assert_eq!(model.document.page_count(), 3);
    assert_eq!(page_html(&model, 1), "<div>new line</div>");
    assert_eq!(model.document.index_of(tail), Some(2));
    assert_eq!(current_index(&model), 1);
}

#[test]
fn test_page_break_pushes_following_content_to_new_page() {
    let mut model = ModelBuilder::new().page(&lines(3)).build();
    let page = model.document.first_page_id();
    dispatch(
        &mut model,
        Msg::Edit(EditMsg::SetSelection(Selection::collapsed(Position::new(
            page, 0, 6,
        )))),
    );
    dispatch(&mut model, Msg::Insert(InsertMsg::PageBreak));

    assert_eq!(model.document.page_count(), 2);
    assert_eq!(
        page_html(&model, 0),
        "<div>line 0</div><hr class=\"page-break\">"
    );
    assert_eq!(page_html(&model, 1), "<div>line 1</div><div>line 2</div>");
    assert_eq!(current_index(&model), 1);
}

#[test]
fn test_edit_that_fits_changes_no_pages() {
    let mut model = ModelBuilder::new().small_pages().page(&lines(3)).build();
    let cmds = dispatch(&mut model, Msg::insert_text("!"));
    assert_eq!(model.document.page_count(), 1);
    assert!(common::persisted(&cmds).is_some());
}
