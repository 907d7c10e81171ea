//! Fragment builders for links, images, tables and page breaks
//!
//! The asynchronous parts (prompts, the file picker, reading the file) live in
//! the update layer; everything here is a pure function from user input to
//! content nodes.

use std::fmt;
use std::path::Path;

use base64::Engine as _;

use crate::model::node::{Element, Node, PAGE_BREAK_CLASS};

/// Extensions offered by the local image picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Inline style that keeps an image inside the page
pub const IMAGE_STYLE: &str = "max-width:100%;height:auto";

const CELL_STYLE: &str = "border: 1px solid #000; padding: 4px; min-width: 40px;";
const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%;";

/// What a URL is going to be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTarget {
    Link,
    Image,
}

/// Why a URL was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// Nothing was typed; treated as a cancelled prompt
    Empty,
    UnsupportedScheme(String),
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlError::Empty => write!(f, "no URL given"),
            UrlError::UnsupportedScheme(scheme) => write!(f, "'{}:' URLs are not allowed", scheme),
        }
    }
}

impl std::error::Error for UrlError {}

/// Trim a user-supplied URL and give scheme-less input `https://`.
///
/// Links accept `http`, `https` and `mailto`; images accept `http`, `https`
/// and `data:image/` URLs.
pub fn normalize_url(input: &str, target: UrlTarget) -> Result<String, UrlError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(UrlError::Empty);
    }
    let Some(scheme) = scheme_of(url) else {
        return Ok(match url.strip_prefix("//") {
            Some(rest) => format!("https://{}", rest),
            None => format!("https://{}", url),
        });
    };

    let scheme = scheme.to_ascii_lowercase();
    let allowed = match (scheme.as_str(), target) {
        ("http" | "https", _) => true,
        ("mailto", UrlTarget::Link) => true,
        ("data", UrlTarget::Image) => url[scheme.len() + 1..]
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("image/"),
        _ => false,
    };
    if allowed {
        Ok(url.to_string())
    } else {
        Err(UrlError::UnsupportedScheme(scheme))
    }
}

/// `scheme:` where the scheme is letters, digits, `+`, `-` or `.` and the
/// rest is not a port number (`localhost:8080` has no scheme)
fn scheme_of(url: &str) -> Option<&str> {
    let (scheme, rest) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (valid && !rest.starts_with(|c: char| c.is_ascii_digit())).then_some(scheme)
}

/// An image element constrained to the page.
///
/// With a known natural size the `width`/`height` attributes are set, scaled
/// down to `max_width` when the image is wider than the page.
pub fn image_fragment(src: &str, alt: &str, natural: Option<(u32, u32)>, max_width: f32) -> Node {
    let mut img = Element::new("img")
        .with_attr("src", src)
        .with_attr("alt", alt)
        .with_attr("style", IMAGE_STYLE);

    if let Some((w, h)) = natural.filter(|(w, h)| *w > 0 && *h > 0) {
        let (w, h) = (w as f32, h as f32);
        let scale = if w > max_width { max_width / w } else { 1.0 };
        img.set_attr("width", format!("{}", (w * scale).round() as u32));
        img.set_attr("height", format!("{}", (h * scale).round() as u32));
    }

    Node::from(img)
}

/// An image embedded from file contents as a data URL
pub fn image_from_bytes(path: &Path, bytes: &[u8], max_width: f32) -> Node {
    let alt = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    image_fragment(
        &data_url(bytes, mime_for(path)),
        alt,
        natural_size(bytes),
        max_width,
    )
}

pub fn data_url(bytes: &[u8], mime: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, encoded)
}

/// MIME type from the file extension
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Pixel dimensions read from the image header, if the format is known
pub fn natural_size(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Why a table dimension was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    NotANumber(String),
    OutOfRange { value: i64, max: usize },
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionError::NotANumber(input) => write!(f, "'{}' is not a whole number", input),
            DimensionError::OutOfRange { value, max } => {
                write!(f, "{} is outside the allowed range 1-{}", value, max)
            }
        }
    }
}

impl std::error::Error for DimensionError {}

/// Parse a row or column count in `1..=max`
pub fn parse_dimension(input: &str, max: usize) -> Result<usize, DimensionError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| DimensionError::NotANumber(trimmed.to_string()))?;
    if value < 1 || value as u64 > max as u64 {
        return Err(DimensionError::OutOfRange { value, max });
    }
    Ok(value as usize)
}

/// A `rows` x `cols` grid of empty bordered cells
pub fn table_fragment(rows: usize, cols: usize) -> Node {
    let row = |_| {
        let cells = (0..cols)
            .map(|_| {
                Node::from(
                    Element::new("td")
                        .with_attr("style", CELL_STYLE)
                        .with_children(vec![Node::text("\u{a0}")]),
                )
            })
            .collect();
        Node::from(Element::new("tr").with_children(cells))
    };
    let body = Element::new("tbody").with_children((0..rows).map(row).collect());
    Node::from(
        Element::new("table")
            .with_attr("style", TABLE_STYLE)
            .with_attr("border", "1")
            .with_children(vec![Node::from(body)]),
    )
}

/// A manual page break
pub fn page_break() -> Node {
    Node::from(Element::new("hr").with_attr("class", PAGE_BREAK_CLASS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::to_html;

    #[test]
    fn test_normalize_url() {
        let link = |input: &str| normalize_url(input, UrlTarget::Link);
        assert_eq!(link("  example.com "), Ok("https://example.com".into()));
        assert_eq!(link("http://a.b"), Ok("http://a.b".into()));
        assert_eq!(link("mailto:me@x.y"), Ok("mailto:me@x.y".into()));
        assert_eq!(link("//cdn.x/a.png"), Ok("https://cdn.x/a.png".into()));
        assert_eq!(link("localhost:8080"), Ok("https://localhost:8080".into()));
        assert_eq!(link("   "), Err(UrlError::Empty));
    }

    #[test]
    fn test_script_and_foreign_schemes_are_rejected() {
        assert_eq!(
            normalize_url("javascript:alert(1)", UrlTarget::Link),
            Err(UrlError::UnsupportedScheme("javascript".into()))
        );
        assert_eq!(
            normalize_url("JavaScript:alert(1)", UrlTarget::Image),
            Err(UrlError::UnsupportedScheme("javascript".into()))
        );
        assert!(normalize_url("data:text/html,<b>x</b>", UrlTarget::Link).is_err());
        assert!(normalize_url("data:text/html,<b>x</b>", UrlTarget::Image).is_err());
        assert!(normalize_url("mailto:me@x.y", UrlTarget::Image).is_err());
        assert_eq!(
            normalize_url("data:image/png;base64,AAAA", UrlTarget::Image),
            Ok("data:image/png;base64,AAAA".into())
        );
    }

    #[test]
    fn test_table_has_requested_grid() {
        let html = to_html(&[table_fragment(3, 4)]);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("<td ").count(), 12);
        assert!(html.contains("&nbsp;"));
    }

    #[test]
    fn test_parse_dimension_bounds() {
        assert_eq!(parse_dimension(" 3 ", 50), Ok(3));
        assert!(matches!(parse_dimension("abc", 50), Err(DimensionError::NotANumber(_))));
        assert!(matches!(parse_dimension("0", 50), Err(DimensionError::OutOfRange { .. })));
        assert!(matches!(parse_dimension("-2", 50), Err(DimensionError::OutOfRange { .. })));
        assert!(matches!(parse_dimension("51", 50), Err(DimensionError::OutOfRange { .. })));
    }

    #[test]
    fn test_wide_image_scaled_to_page() {
        let node = image_fragment("x.png", "x", Some((1300, 400)), 650.0);
        let img = node.as_element().unwrap();
        assert_eq!(img.attr("width"), Some("650"));
        assert_eq!(img.attr("height"), Some("200"));
        assert_eq!(img.attr("style"), Some(IMAGE_STYLE));
    }

    #[test]
    fn test_unknown_size_has_no_dimensions() {
        let node = image_fragment("x.svg", "x", None, 650.0);
        assert_eq!(node.as_element().unwrap().attr("width"), None);
    }

    #[test]
    fn test_data_url_and_mime() {
        assert_eq!(mime_for(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(data_url(b"hi", "image/png"), "data:image/png;base64,aGk=");
    }
}
