//! Builds the slide tree for one normalized slide. Order matters: the
//! content box is built first (which also strips inherited body
//! placeholders), then the title is set, so the cleanup pass cannot
//! remove a title that was just written.

use deckgen_common::{NormalizedOutline, NormalizedSlide};
use tracing::{debug, warn};

use crate::model::{
    emu, Align, Deck, ParagraphNode, PlaceholderKind, RunNode, Shape, SlideLayout, SlideNode,
    TextBox, TextFrame, TextRun, BODY_COLOR, TITLE_COLOR,
};

const TITLE_SIZE_PT: u32 = 28;
const SUMMARY_SIZE_PT: u32 = 14;
const POINT_SIZE_PT: u32 = 13;
const FACT_SIZE_PT: u32 = 11;

pub fn render_deck(outline: &NormalizedOutline, layout: &SlideLayout) -> Deck {
    Deck {
        slides: outline
            .iter()
            .map(|slide| render_slide(slide, layout))
            .collect(),
    }
}

pub fn render_slide(slide: &NormalizedSlide, layout: &SlideLayout) -> SlideNode {
    let mut node = SlideNode::from_layout(layout);
    build_content_box(&mut node, slide);
    set_title(&mut node, &slide.title);
    node
}

/// Content region below the title: summary paragraph, then one paragraph
/// per main point with its facts as indented runs on their own lines.
fn build_content_box(node: &mut SlideNode, slide: &NormalizedSlide) {
    let removed = node.strip_body_placeholders();
    if removed > 0 {
        debug!(removed, "removed inherited content placeholders");
    }

    node.shapes.push(Shape::TextBox(TextBox {
        x: emu(0.5),
        y: emu(1.2),
        cx: emu(9.0),
        cy: emu(5.5),
        frame: content_frame(slide),
    }));
}

fn content_frame(slide: &NormalizedSlide) -> TextFrame {
    let mut paragraphs = Vec::new();

    if !slide.summary.is_empty() {
        paragraphs.push(ParagraphNode {
            align: Align::Left,
            runs: vec![RunNode::Text(TextRun {
                text: format!("\u{1F4CB} {}", slide.summary),
                size_pt: SUMMARY_SIZE_PT,
                bold: true,
                color: BODY_COLOR,
            })],
        });
    }

    for (i, point) in slide.points.iter().enumerate() {
        if point.heading.trim().is_empty() && point.facts.is_empty() {
            warn!(slide = %slide.title, index = i, "skipping empty point");
            continue;
        }

        let mut runs = vec![RunNode::Text(TextRun {
            text: format!("{}. {}", i + 1, point.heading),
            size_pt: POINT_SIZE_PT,
            bold: true,
            color: TITLE_COLOR,
        })];
        for fact in &point.facts {
            runs.push(RunNode::LineBreak);
            runs.push(RunNode::Text(TextRun {
                text: format!("   \u{2022} {}", fact.rendered()),
                size_pt: FACT_SIZE_PT,
                bold: false,
                color: BODY_COLOR,
            }));
        }
        paragraphs.push(ParagraphNode {
            align: Align::Left,
            runs,
        });
    }

    TextFrame {
        word_wrap: true,
        paragraphs,
    }
}

/// Fill the title placeholder when the layout provides one; otherwise
/// draw the title as a manually positioned, centered text box.
fn set_title(node: &mut SlideNode, title: &str) {
    let frame = title_frame(title);
    if let Some(placeholder) = node.title_placeholder_mut() {
        placeholder.frame = frame;
    } else {
        debug!("no title placeholder, drawing manual title box");
        node.shapes.push(Shape::TextBox(TextBox {
            x: emu(0.5),
            y: emu(0.2),
            cx: emu(9.0),
            cy: emu(0.8),
            frame,
        }));
    }
}

fn title_frame(title: &str) -> TextFrame {
    TextFrame {
        word_wrap: false,
        paragraphs: vec![ParagraphNode {
            align: Align::Center,
            runs: vec![RunNode::Text(TextRun {
                text: title.to_string(),
                size_pt: TITLE_SIZE_PT,
                bold: true,
                color: TITLE_COLOR,
            })],
        }],
    }
}
