use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::debug;

use crate::render::{DocumentRenderer, PageOptions, RenderError};

/// Renders HTML to PDF with the `wkhtmltopdf` executable.
///
/// Each call works in its own temporary directory, removed when the call returns.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    program: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

fn page_args(options: &PageOptions) -> Vec<String> {
    let mut args = vec![
        "--quiet".to_string(),
        "--encoding".to_string(),
        "utf-8".to_string(),
        "--page-size".to_string(),
        options.page_size.to_string(),
        "--orientation".to_string(),
        options.orientation.to_string(),
    ];
    for side in ["top", "right", "bottom", "left"] {
        args.push(format!("--margin-{side}"));
        args.push(options.margin.to_string());
    }
    args
}

#[async_trait]
impl DocumentRenderer for WkhtmltopdfRenderer {
    async fn render_pdf(&self, html: &str, options: &PageOptions) -> Result<Bytes, RenderError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join("resume.pdf");
        tokio::fs::write(&input, html).await?;

        debug!("Running {} for {}", self.program, input.display());
        let result = Command::new(&self.program)
            .args(page_args(options))
            .arg(&input)
            .arg(&output)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let pdf = tokio::fs::read(&output).await?;
        if pdf.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(Bytes::from(pdf))
    }
}
