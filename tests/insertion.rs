//! Links, images and tables, including the prompt and file-read round trips

mod common;

use std::io::Cursor;
use std::path::PathBuf;

use common::{answer_prompts, dispatch, dispatch_all, lines, page_html, prompt_in, ModelBuilder};
use folio::commands::{Cmd, PromptPurpose};
use folio::messages::{DocumentMsg, EditMsg, InsertMsg, Msg};

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_table_three_by_four_via_prompts() {
    let mut model = ModelBuilder::new().build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Table(None)));
    assert_eq!(
        prompt_in(&cmds).map(|p| p.purpose),
        Some(PromptPurpose::TableRows)
    );

    answer_prompts(&mut model, &cmds, &[Some("3"), Some("4")]);

    let html = page_html(&model, 0);
    let rows: Vec<&str> = html.split("<tr>").skip(1).collect();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row.matches("<td").count(), 4);
    }
    assert!(html.contains("border-collapse: collapse"));
}

#[test]
fn test_invalid_table_dimensions_insert_nothing() {
    for (rows, cols, notice) in [
        ("abc", "2", "Invalid row count: 'abc' is not a whole number"),
        ("2", "-1", "Invalid column count: -1 is outside the allowed range 1-50"),
        ("0", "2", "Invalid row count: 0 is outside the allowed range 1-50"),
        ("2", "51", "Invalid column count: 51 is outside the allowed range 1-50"),
    ] {
        let mut model = ModelBuilder::new().page("<div>text</div>").build();
        let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Table(None)));
        let after = answer_prompts(&mut model, &cmds, &[Some(rows), Some(cols)]);

        assert!(after.is_empty());
        assert_eq!(page_html(&model, 0), "<div>text</div>");
        assert_eq!(model.ui.take_notice().as_deref(), Some(notice));
    }
}

#[test]
fn test_cancelled_table_prompt_changes_nothing() {
    let mut model = ModelBuilder::new().page("<div>text</div>").build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Table(None)));
    let after = answer_prompts(&mut model, &cmds, &[Some("3"), None]);

    assert!(after.is_empty());
    assert_eq!(page_html(&model, 0), "<div>text</div>");
    assert_eq!(model.ui.status_message, "Cancelled");
}

#[test]
fn test_link_prompt_resumes_saved_selection() {
    let mut model = ModelBuilder::new().page("<div>visit our site</div>").build();
    dispatch(&mut model, Msg::Edit(EditMsg::SelectRange { from: 10, to: 14 }));
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Link(None)));

    // The caret wanders off while the prompt is open
    dispatch(&mut model, Msg::Edit(EditMsg::SelectAllOnPage));
    answer_prompts(&mut model, &cmds, &[Some("example.com")]);

    assert_eq!(
        page_html(&model, 0),
        "<div>visit our <a href=\"https://example.com\">site</a></div>"
    );
}

#[test]
fn test_link_on_collapsed_caret_inserts_url_text() {
    let mut model = ModelBuilder::new().page("<div>see </div>").build();
    dispatch(
        &mut model,
        Msg::Insert(InsertMsg::Link(Some("https://rust-lang.org".into()))),
    );
    assert_eq!(
        page_html(&model, 0),
        "<div>see <a href=\"https://rust-lang.org\">https://rust-lang.org</a></div>"
    );
}

#[test]
fn test_blank_link_answer_is_a_cancel() {
    let mut model = ModelBuilder::new().page("<div>x</div>").build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Link(None)));
    let after = answer_prompts(&mut model, &cmds, &[Some("   ")]);
    assert!(after.is_empty());
    assert_eq!(page_html(&model, 0), "<div>x</div>");
}

#[test]
fn test_script_urls_are_refused_with_a_notice() {
    let mut model = ModelBuilder::new().page("<div>x</div>").build();
    let cmds = dispatch(
        &mut model,
        Msg::Insert(InsertMsg::Link(Some("javascript:alert(1)".into()))),
    );
    assert!(cmds.is_empty());
    assert_eq!(
        model.ui.take_notice().as_deref(),
        Some("Invalid link: 'javascript:' URLs are not allowed")
    );

    dispatch(
        &mut model,
        Msg::Insert(InsertMsg::ImageUrl(Some("data:text/html,hi".into()))),
    );
    assert_eq!(
        model.ui.take_notice().as_deref(),
        Some("Invalid image URL: 'data:' URLs are not allowed")
    );
    assert_eq!(page_html(&model, 0), "<div>x</div>");
}

#[test]
fn test_image_url_is_constrained_to_page() {
    let mut model = ModelBuilder::new().page("<div>pic: </div>").build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::ImageUrl(None)));
    answer_prompts(&mut model, &cmds, &[Some("img.example.com/cat.png")]);

    let html = page_html(&model, 0);
    assert!(html.contains("src=\"https://img.example.com/cat.png\""));
    assert!(html.contains("max-width:100%"));
}

#[test]
fn test_local_image_round_trip() {
    let mut model = ModelBuilder::new().page("<div>photo</div>").build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::ImageFile));
    let resume = match cmds.as_slice() {
        [Cmd::ShowImagePicker { resume }] => *resume,
        other => panic!("expected the picker, got {:?}", other),
    };

    let path = PathBuf::from("/photos/wide.png");
    let cmds = dispatch(
        &mut model,
        Msg::Insert(InsertMsg::ImagePicked {
            path: Some(path.clone()),
            resume,
        }),
    );
    assert!(matches!(cmds.as_slice(), [Cmd::ReadImageFile { .. }]));

    let content_width = model.config.page.content_width();
    dispatch(
        &mut model,
        Msg::Insert(InsertMsg::ImageLoaded {
            path,
            result: Ok(png(1300, 650)),
            resume,
        }),
    );

    let html = page_html(&model, 0);
    assert!(html.contains("src=\"data:image/png;base64,"));
    assert!(html.contains("alt=\"wide\""));
    let expected_width = content_width.round() as u32;
    assert!(html.contains(&format!("width=\"{}\"", expected_width)));
    assert!(html.contains(&format!("height=\"{}\"", (expected_width as f32 / 2.0).round() as u32)));
}

#[test]
fn test_cancelled_picker_is_noop() {
    let mut model = ModelBuilder::new().page("<div>photo</div>").build();
    let resume = model.context;
    let cmds = dispatch(
        &mut model,
        Msg::Insert(InsertMsg::ImagePicked { path: None, resume }),
    );
    assert!(cmds.is_empty());
    assert_eq!(page_html(&model, 0), "<div>photo</div>");
}

#[test]
fn test_unreadable_image_raises_notice() {
    let mut model = ModelBuilder::new().build();
    let resume = model.context;
    dispatch(
        &mut model,
        Msg::Insert(InsertMsg::ImageLoaded {
            path: PathBuf::from("missing.png"),
            result: Err("No such file or directory".into()),
            resume,
        }),
    );
    assert_eq!(
        model.ui.take_notice().as_deref(),
        Some("Could not read missing.png: No such file or directory")
    );
    assert!(model.document.is_blank());
}

#[test]
fn test_insert_after_reset_falls_back_to_current_page() {
    let mut model = ModelBuilder::new().page(&lines(2)).build();
    let cmds = dispatch(&mut model, Msg::Insert(InsertMsg::Table(None)));
    dispatch(&mut model, Msg::Document(DocumentMsg::Reset));
    answer_prompts(&mut model, &cmds, &[Some("1"), Some("1")]);

    assert_eq!(model.document.page_count(), 1);
    assert_eq!(page_html(&model, 0).matches("<td").count(), 1);
}

#[test]
fn test_tall_table_reflows_onto_new_page() {
    let mut model = ModelBuilder::new().small_pages().page(&lines(4)).build();
    dispatch_all(
        &mut model,
        [Msg::Insert(InsertMsg::Table(Some(("3".into(), "2".into()))))],
    );

    assert_eq!(model.document.page_count(), 2);
    assert!(page_html(&model, 1).starts_with("<table"));
    assert_eq!(page_html(&model, 0), lines(4));
}
