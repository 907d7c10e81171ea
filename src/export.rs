//! Document export: Word-compatible HTML, PDF jobs and the preview page
//!
//! Every format starts from the same assembled HTML: a title, an author meta
//! tag, a print rule that starts each page container on a new printed page,
//! and one `<div class="page">` per page.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::markup::{escaped, escaped_attr, to_html};
use crate::measure::PageGeometry;
use crate::model::document::Document;
use crate::theme::ThemeMode;

pub const WORD_MIME: &str = "application/msword";

const PRINT_STYLE: &str = "\
.page { page-break-after: always; break-after: page; }
.page:last-child { page-break-after: auto; break-after: auto; }
hr.page-break { border: none; margin: 0; page-break-after: always; break-after: page; }
img { max-width: 100%; height: auto; }";

const OFFICE_NAMESPACES: &str = "xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
xmlns=\"http://www.w3.org/TR/REC-html40\"";

/// Title and author embedded in exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMeta {
    pub title: String,
    pub author: String,
}

impl ExportMeta {
    /// Blank answers fall back to the defaults
    pub fn resolve(title: &str, author: &str, default_title: &str, default_author: &str) -> Self {
        let pick = |value: &str, fallback: &str| {
            let value = value.trim();
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            title: pick(title, default_title),
            author: pick(author, default_author),
        }
    }

    /// Title made safe for use as a file name
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        let stem = stem.trim().trim_matches('.');
        if stem.is_empty() {
            "document".to_string()
        } else {
            stem.to_string()
        }
    }
}

/// Export targets that ask for title and author first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Word,
    Pdf,
    Preview,
}

impl ExportTarget {
    pub fn label(&self) -> &'static str {
        match self {
            ExportTarget::Word => "Word",
            ExportTarget::Pdf => "PDF",
            ExportTarget::Preview => "preview",
        }
    }
}

/// A finished file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub body: String,
}

/// Everything an external PDF renderer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfJob {
    pub file_name: String,
    pub title: String,
    pub author: String,
    pub html: String,
}

/// The `<div class="page">` containers, one per page
pub fn page_containers(doc: &Document) -> String {
    let mut out = String::new();
    for page in doc.pages() {
        out.push_str("<div class=\"page\">");
        out.push_str(&to_html(&page.nodes));
        out.push_str("</div>\n");
    }
    out
}

fn html_document(doc: &Document, meta: &ExportMeta, html_attrs: &str, extra_style: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    if html_attrs.is_empty() {
        out.push_str("<html>\n");
    } else {
        out.push_str(&format!("<html {}>\n", html_attrs));
    }
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escaped(&meta.title)));
    out.push_str(&format!(
        "<meta name=\"author\" content=\"{}\">\n",
        escaped_attr(&meta.author)
    ));
    out.push_str("<style>\n");
    out.push_str(PRINT_STYLE);
    if !extra_style.is_empty() {
        out.push('\n');
        out.push_str(extra_style);
    }
    out.push_str("\n</style>\n</head>\n<body>\n");
    out.push_str(&page_containers(doc));
    out.push_str("</body>\n</html>\n");
    out
}

/// Standalone HTML with metadata and one container per page
pub fn assemble_html(doc: &Document, meta: &ExportMeta) -> String {
    html_document(doc, meta, "", "")
}

/// Word-compatible `.doc` file
pub fn word_document(doc: &Document, meta: &ExportMeta) -> ExportArtifact {
    ExportArtifact {
        file_name: format!("{}.doc", meta.file_stem()),
        mime: WORD_MIME,
        body: html_document(doc, meta, OFFICE_NAMESPACES, ""),
    }
}

pub fn pdf_job(doc: &Document, meta: &ExportMeta) -> PdfJob {
    PdfJob {
        file_name: format!("{}.pdf", meta.file_stem()),
        title: meta.title.clone(),
        author: meta.author.clone(),
        html: assemble_html(doc, meta),
    }
}

/// The assembled HTML styled as pages on a desk, for on-screen preview
pub fn preview_html(doc: &Document, meta: &ExportMeta, geometry: &PageGeometry, theme: ThemeMode) -> String {
    let palette = theme.palette();
    let screen = format!(
        "@media screen {{\n\
         body {{ background: {desk}; color: {text}; margin: 0; padding: 24px 0; }}\n\
         .page {{ background: {page}; width: {w}px; min-height: {h}px; padding: {p}px; \
         margin: 0 auto 24px; box-sizing: border-box; box-shadow: 0 2px 8px rgba(0,0,0,.3); }}\n\
         a {{ color: {accent}; }}\n\
         hr.page-break {{ border-top: 1px dashed {muted}; }}\n\
         }}",
        desk = palette.desk,
        text = palette.text,
        page = palette.page,
        accent = palette.accent,
        muted = palette.muted,
        w = geometry.width,
        h = geometry.height,
        p = geometry.padding,
    );
    html_document(doc, meta, "", &screen)
}

/// Why a PDF could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    /// No renderer is configured or the program is missing
    Unavailable,
    Failed(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::Unavailable => write!(f, "PDF renderer is not available"),
            PdfError::Failed(reason) => write!(f, "PDF rendering failed: {}", reason),
        }
    }
}

impl std::error::Error for PdfError {}

/// Turns a [`PdfJob`] into a PDF file
pub trait PdfRenderer {
    fn render(&self, job: &PdfJob, output: &Path) -> Result<(), PdfError>;
}

/// External renderer command, configured in `config.yaml`.
///
/// Arguments may use `{input}`, `{output}`, `{title}` and `{author}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfRendererConfig {
    pub program: Option<String>,
    pub args: Vec<String>,
}

/// Runs the configured renderer program on a temporary HTML file
#[derive(Debug, Clone)]
pub struct ExternalPdfRenderer {
    config: PdfRendererConfig,
    scratch_dir: PathBuf,
}

impl ExternalPdfRenderer {
    pub fn new(config: PdfRendererConfig) -> Self {
        Self {
            config,
            scratch_dir: std::env::temp_dir(),
        }
    }

    fn expand(&self, arg: &str, job: &PdfJob, input: &Path, output: &Path) -> String {
        arg.replace("{input}", &input.to_string_lossy())
            .replace("{output}", &output.to_string_lossy())
            .replace("{title}", &job.title)
            .replace("{author}", &job.author)
    }
}

impl PdfRenderer for ExternalPdfRenderer {
    fn render(&self, job: &PdfJob, output: &Path) -> Result<(), PdfError> {
        let Some(program) = self.config.program.as_deref().filter(|p| !p.trim().is_empty()) else {
            return Err(PdfError::Unavailable);
        };

        let input = self
            .scratch_dir
            .join(format!("folio-{}-{}.html", std::process::id(), job.file_name));
        std::fs::write(&input, &job.html).map_err(|e| PdfError::Failed(e.to_string()))?;

        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|a| self.expand(a, job, &input, output))
            .collect();

        tracing::info!(program, ?args, "running PDF renderer");
        let result = Command::new(program).args(&args).output();
        let _ = std::fs::remove_file(&input);

        let outcome = match result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PdfError::Unavailable),
            Err(e) => Err(PdfError::Failed(e.to_string())),
            Ok(out) if !out.status.success() => Err(PdfError::Failed(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            )),
            Ok(_) if !output.exists() => {
                Err(PdfError::Failed("renderer produced no file".to_string()))
            }
            Ok(_) => Ok(()),
        };

        if outcome.is_err() && output.exists() {
            let _ = std::fs::remove_file(output);
        }
        outcome
    }
}
