//! The end-to-end run: topic -> outline -> normalize -> presentation
//! file. One pipeline invocation is independent of any other; the only
//! await point is the single outline HTTP call.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use deckgen_common::{Config, SlideOutline, Style};
use deckgen_outline::OutlineClient;
use deckgen_pptx::PptWriter;
use tracing::info;

use crate::formatter::format_content;
use crate::planner::ContentPlanner;

/// A template either lives on disk already or arrives as bytes (an
/// upload); uploaded bytes are staged in a temp file that is removed when
/// the write is done, success or not.
pub enum TemplateSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

pub struct GenerateRequest {
    pub topic: String,
    pub num_pages: usize,
    pub style: Style,
    pub template: Option<TemplateSource>,
    pub output: PathBuf,
}

pub async fn generate(config: &Config, request: &GenerateRequest) -> Result<PathBuf> {
    let planner = ContentPlanner::new(OutlineClient::new(config));
    let outline = planner
        .plan_content(&request.topic, request.num_pages)
        .await;
    info!(
        topic = %request.topic,
        pages = outline.len(),
        "outline ready, rendering deck"
    );
    write_outline(
        &outline,
        request.style,
        request.template.as_ref(),
        &request.output,
    )
}

/// Rendering half of the pipeline, shared with the interactive shell
/// (which plans first, previews, then writes).
pub fn write_outline(
    outline: &SlideOutline,
    style: Style,
    template: Option<&TemplateSource>,
    output: &Path,
) -> Result<PathBuf> {
    let normalized = format_content(outline);
    let writer = PptWriter::new();

    let written = match template {
        Some(TemplateSource::Path(path)) => writer.write_with_template(&normalized, path, output, style)?,
        Some(TemplateSource::Bytes(bytes)) => {
            let staged = stage_template(bytes)?;
            writer.write_with_template(&normalized, staged.path(), output, style)?
            // staged drops here; the temp file is gone whether or not the
            // write succeeded
        }
        None => writer.write(&normalized, output, style)?,
    };

    info!(path = %written.display(), "presentation written");
    Ok(written)
}

fn stage_template(bytes: &[u8]) -> Result<tempfile::NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .suffix(".pptx")
        .tempfile()
        .context("staging uploaded template")?;
    staged
        .write_all(bytes)
        .context("writing uploaded template")?;
    staged.flush().context("flushing uploaded template")?;
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_outline::fallback_outline;

    #[test]
    fn blank_deck_pipeline_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pptx");
        let outline = fallback_outline("Test", 3);
        let written = write_outline(&outline, Style::Default, None, &output).unwrap();
        assert_eq!(written, output);
        assert!(output.exists());
    }

    #[test]
    fn staged_template_bytes_are_cleaned_up() {
        let staged = stage_template(b"not really a pptx").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn bogus_template_bytes_still_produce_a_deck() {
        // an unreadable template must fall back to the blank-deck path
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pptx");
        let outline = fallback_outline("Test", 2);
        let template = TemplateSource::Bytes(b"garbage".to_vec());
        let written =
            write_outline(&outline, Style::Business, Some(&template), &output).unwrap();
        assert!(written.exists());
    }
}
