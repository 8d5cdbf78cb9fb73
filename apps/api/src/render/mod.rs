//! Resume Renderer: turns a job card's resume text into a downloadable PDF.
//!
//! The text is escaped into a minimal HTML page and handed to a
//! `DocumentRenderer`. Page geometry is fixed: A4, portrait, half-inch margins.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::registry::job_not_found;
use crate::jobs::store::JobStore;
use crate::models::job_card::JobCard;

pub mod handlers;
pub mod wkhtmltopdf;

pub use wkhtmltopdf::WkhtmltopdfRenderer;

const EMPTY_BASE_RESUME: &str = "No base resume available";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to prepare render workspace: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("renderer produced an empty document")]
    EmptyOutput,
}

/// Page setup passed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub page_size: &'static str,
    /// wkhtmltopdf orientation name: "Portrait" or "Landscape".
    pub orientation: &'static str,
    /// Applied to all four sides, e.g. "0.5in".
    pub margin: &'static str,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: "A4",
            orientation: "Portrait",
            margin: "0.5in",
        }
    }
}

/// HTML-to-PDF conversion. Carried in `AppState` as `Arc<dyn DocumentRenderer>`.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str, options: &PageOptions) -> Result<Bytes, RenderError>;
}

/// Which resume of a job card to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeVariant {
    Base,
    Optimized,
}

impl ResumeVariant {
    fn file_suffix(&self) -> &'static str {
        match self {
            ResumeVariant::Base => "Base_Resume",
            ResumeVariant::Optimized => "Optimized_Resume",
        }
    }
}

impl fmt::Display for ResumeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeVariant::Base => f.write_str("base"),
            ResumeVariant::Optimized => f.write_str("optimized"),
        }
    }
}

impl FromStr for ResumeVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ResumeVariant::Base),
            "optimized" => Ok(ResumeVariant::Optimized),
            _ => Err(AppError::Validation(
                "Invalid type. Use \"base\" or \"optimized\"".to_string(),
            )),
        }
    }
}

/// A rendered resume ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedResume {
    pub file_name: String,
    pub pdf: Bytes,
}

/// Keeps ASCII letters, digits, whitespace, `-` and `_`, then turns each
/// whitespace run into a single underscore.
pub fn sanitize_file_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            sanitized.push(c);
            in_whitespace = false;
        }
    }
    sanitized
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps escaped resume text in the single-page HTML template.
pub fn build_resume_html(resume_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Resume</title>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.8; margin: 40px 50px; color: #333; font-size: 16px; }}
      .resume-content {{ white-space: pre-wrap; font-size: 16px; line-height: 1.8; font-family: Arial, sans-serif; }}
    </style>
  </head>
  <body>
    <div class="resume-content">{}</div>
  </body>
</html>
"#,
        escape_html(resume_text)
    )
}

/// Picks the text for `variant`, or fails if the optimized text does not exist yet.
fn resume_text(job: &JobCard, variant: ResumeVariant) -> Result<&str, AppError> {
    match variant {
        ResumeVariant::Base if job.base_resume.trim().is_empty() => Ok(EMPTY_BASE_RESUME),
        ResumeVariant::Base => Ok(job.base_resume.as_str()),
        ResumeVariant::Optimized => job.optimized_resume.as_deref().ok_or_else(|| {
            AppError::PreconditionFailed("Optimized resume not available".to_string())
        }),
    }
}

pub fn resume_file_name(job: &JobCard, variant: ResumeVariant) -> String {
    let stem = sanitize_file_name(&format!(
        "{}_{}_{}",
        job.client_name,
        job.company_name,
        variant.file_suffix()
    ));
    format!("{stem}.pdf")
}

/// Renders the base or optimized resume of job card `id`.
pub async fn render_resume(
    store: &dyn JobStore,
    renderer: &dyn DocumentRenderer,
    id: Uuid,
    variant: ResumeVariant,
) -> Result<RenderedResume, AppError> {
    let job = store.get(id).await?.ok_or_else(|| job_not_found(id))?;
    let text = resume_text(&job, variant)?;

    let html = build_resume_html(text);
    let pdf = renderer.render_pdf(&html, &PageOptions::default()).await?;

    let file_name = resume_file_name(&job, variant);
    info!(
        "Rendered {variant} resume for job {id} ({} bytes) as {file_name}",
        pdf.len()
    );
    Ok(RenderedResume { file_name, pdf })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::jobs::memory::MemoryJobStore;
    use crate::models::job_card::NewJobCard;

    /// Returns the HTML it was given as the "PDF" bytes.
    #[derive(Default)]
    pub struct EchoRenderer {
        pub last_options: Mutex<Option<PageOptions>>,
    }

    #[async_trait]
    impl DocumentRenderer for EchoRenderer {
        async fn render_pdf(
            &self,
            html: &str,
            options: &PageOptions,
        ) -> Result<Bytes, RenderError> {
            *self.last_options.lock().unwrap() = Some(options.clone());
            Ok(Bytes::from(html.to_string()))
        }
    }

    struct BrokenRenderer;

    #[async_trait]
    impl DocumentRenderer for BrokenRenderer {
        async fn render_pdf(&self, _: &str, _: &PageOptions) -> Result<Bytes, RenderError> {
            Err(RenderError::EmptyOutput)
        }
    }

    async fn store_with(base_resume: &str) -> (MemoryJobStore, Uuid) {
        let store = MemoryJobStore::new();
        let id = store
            .insert(NewJobCard {
                client_name: "Alice O'Neil".into(),
                company_name: "Acme & Co.".into(),
                position: "Engineer".into(),
                job_description: "Rust".into(),
                job_link: "https://acme.example/job/1".into(),
                base_resume: base_resume.into(),
            })
            .await
            .unwrap()
            .id;
        (store, id)
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(
            sanitize_file_name("Alice O'Neil_Acme & Co._Base_Resume"),
            "Alice_ONeil_Acme_Co_Base_Resume"
        );
        assert_eq!(sanitize_file_name("Jean-Luc_Zoë Corp"), "Jean-Luc_Zo_Corp");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"R&D"</b> 'lead'"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; &#039;lead&#039;"
        );
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("base".parse::<ResumeVariant>().unwrap(), ResumeVariant::Base);
        assert_eq!(
            "optimized".parse::<ResumeVariant>().unwrap(),
            ResumeVariant::Optimized
        );
        assert!(matches!(
            "pdf".parse::<ResumeVariant>(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_render_base_escapes_and_uses_a4_portrait() {
        let (store, id) = store_with("Jane <Doe>\nR&D").await;
        let renderer = EchoRenderer::default();

        let rendered = render_resume(&store, &renderer, id, ResumeVariant::Base)
            .await
            .unwrap();

        let html = String::from_utf8(rendered.pdf.to_vec()).unwrap();
        assert!(html.contains("Jane &lt;Doe&gt;\nR&amp;D"));
        assert_eq!(rendered.file_name, "Alice_ONeil_Acme_Co_Base_Resume.pdf");
        let options = renderer.last_options.lock().unwrap().clone().unwrap();
        assert_eq!(options, PageOptions::default());
        assert_eq!(options.page_size, "A4");
        assert_eq!(options.orientation, "Portrait");
    }

    #[test]
    fn test_template_keeps_body_margin_inside_page_border() {
        let html = build_resume_html("Jane Doe");
        assert!(html.contains("margin: 40px 50px;"));
        assert!(html.contains(r#"<div class="resume-content">Jane Doe</div>"#));
    }

    #[tokio::test]
    async fn test_empty_base_resume_uses_placeholder() {
        let (store, id) = store_with("").await;
        let rendered = render_resume(&store, &EchoRenderer::default(), id, ResumeVariant::Base)
            .await
            .unwrap();
        let html = String::from_utf8(rendered.pdf.to_vec()).unwrap();
        assert!(html.contains(EMPTY_BASE_RESUME));
    }

    #[tokio::test]
    async fn test_optimized_without_content_is_precondition_failure() {
        let (store, id) = store_with("resume").await;
        let result =
            render_resume(&store, &EchoRenderer::default(), id, ResumeVariant::Optimized).await;
        assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn test_renderer_failure_is_external_error() {
        let (store, id) = store_with("resume").await;
        let result = render_resume(&store, &BrokenRenderer, id, ResumeVariant::Base).await;
        assert!(matches!(result, Err(AppError::ExternalService { .. })));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let (store, _) = store_with("resume").await;
        let result = render_resume(
            &store,
            &EchoRenderer::default(),
            Uuid::new_v4(),
            ResumeVariant::Base,
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
