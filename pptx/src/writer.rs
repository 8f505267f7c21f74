//! Top-level writer facade over the blank-deck and template-mode paths.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use deckgen_common::{NormalizedOutline, Style};

use crate::error::Result;
use crate::model::{builtin_layout, LayoutTable};
use crate::package::write_package;
use crate::render::render_deck;
use crate::template::build_from_template;

pub struct PptWriter {
    layouts: LayoutTable,
}

impl Default for PptWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PptWriter {
    pub fn new() -> Self {
        Self {
            layouts: LayoutTable::builtin(),
        }
    }

    /// Blank deck: built-in skeleton package, layout chosen by style.
    pub fn write(
        &self,
        outline: &NormalizedOutline,
        output: &Path,
        style: Style,
    ) -> Result<PathBuf> {
        let layout = builtin_layout(self.layouts.index_for(style));
        debug!(style = style.as_str(), layout = %layout.name, "rendering blank deck");
        let deck = render_deck(outline, &layout);
        write_package(&deck, output)
    }

    /// Template mode. Any failure along the way (unreadable file, no
    /// layouts, broken package parts) degrades to the blank-deck path so
    /// the caller still gets a presentation.
    pub fn write_with_template(
        &self,
        outline: &NormalizedOutline,
        template: &Path,
        output: &Path,
        style: Style,
    ) -> Result<PathBuf> {
        match build_from_template(outline, template, output, self.layouts.default_index()) {
            Ok(path) => Ok(path),
            Err(err) => {
                warn!(
                    %err,
                    template = %template.display(),
                    "template render failed, using default style instead"
                );
                self.write(outline, output, style)
            }
        }
    }
}
