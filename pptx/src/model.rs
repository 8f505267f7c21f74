//! Explicit tree model of the deck being built. "Delete the inherited
//! placeholder, add a text box" is an edit on `SlideNode::shapes`, checked
//! in unit tests without any rendering backend.

use deckgen_common::Style;

pub const EMU_PER_INCH: i64 = 914_400;

pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const TITLE_COLOR: Rgb = Rgb(44, 62, 80);
pub const BODY_COLOR: Rgb = Rgb(52, 73, 94);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub size_pt: u32,
    pub bold: bool,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunNode {
    Text(TextRun),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphNode {
    pub align: Align,
    pub runs: Vec<RunNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrame {
    pub word_wrap: bool,
    pub paragraphs: Vec<ParagraphNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    Body,
}

/// A placeholder inherited from the slide layout; geometry comes from the
/// layout, so the slide only carries the kind and any text poured into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub frame: TextFrame,
}

/// A manually positioned text box (EMU coordinates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    pub frame: TextFrame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Placeholder(Placeholder),
    TextBox(TextBox),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideNode {
    pub shapes: Vec<Shape>,
}

impl SlideNode {
    /// Seed a fresh slide with the layout's placeholders, the way adding a
    /// slide from a layout copies its placeholders in.
    pub fn from_layout(layout: &SlideLayout) -> Self {
        Self {
            shapes: layout
                .placeholders
                .iter()
                .map(|kind| {
                    Shape::Placeholder(Placeholder {
                        kind: *kind,
                        frame: TextFrame::default(),
                    })
                })
                .collect(),
        }
    }

    /// Remove every inherited placeholder except the title. Leaving them
    /// in place produces empty "Click to add text" boxes on top of the
    /// custom content box.
    pub fn strip_body_placeholders(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|shape| {
            !matches!(
                shape,
                Shape::Placeholder(p) if p.kind != PlaceholderKind::Title
            )
        });
        before - self.shapes.len()
    }

    pub fn title_placeholder_mut(&mut self) -> Option<&mut Placeholder> {
        self.shapes.iter_mut().find_map(|shape| match shape {
            Shape::Placeholder(p) if p.kind == PlaceholderKind::Title => Some(p),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub slides: Vec<SlideNode>,
}

/// Placeholder inventory of a slide layout, enough for seeding slides and
/// for the title/content layout-selection heuristic.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    pub name: String,
    pub placeholders: Vec<PlaceholderKind>,
}

/// The layouts of the built-in blank deck, indexed the way the stock
/// template orders them (1 = Title and Content, 6 = Title Only).
pub fn builtin_layout(index: usize) -> SlideLayout {
    match index {
        6 => SlideLayout {
            name: "Title Only".to_string(),
            placeholders: vec![PlaceholderKind::Title],
        },
        _ => SlideLayout {
            name: "Title and Content".to_string(),
            placeholders: vec![PlaceholderKind::Title, PlaceholderKind::Body],
        },
    }
}

/// Immutable style-to-layout-index table. Unrecognized styles are handled
/// upstream by lenient parsing; anything the table does not list maps to
/// the default index.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    entries: Vec<(Style, usize)>,
    default_index: usize,
}

impl LayoutTable {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (Style::Default, 1),
                (Style::Minimal, 6),
                (Style::Business, 1),
            ],
            default_index: 1,
        }
    }

    pub fn index_for(&self, style: Style) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, idx)| *idx)
            .unwrap_or(self.default_index)
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripping_keeps_title_drops_body() {
        let mut slide = SlideNode::from_layout(&builtin_layout(1));
        assert_eq!(slide.shapes.len(), 2);
        let removed = slide.strip_body_placeholders();
        assert_eq!(removed, 1);
        assert_eq!(slide.shapes.len(), 1);
        assert!(slide.title_placeholder_mut().is_some());
    }

    #[test]
    fn title_only_layout_has_nothing_to_strip() {
        let mut slide = SlideNode::from_layout(&builtin_layout(6));
        assert_eq!(slide.strip_body_placeholders(), 0);
        assert!(slide.title_placeholder_mut().is_some());
    }

    #[test]
    fn style_table_maps_known_styles_and_defaults_the_rest() {
        let table = LayoutTable::builtin();
        assert_eq!(table.index_for(Style::Default), 1);
        assert_eq!(table.index_for(Style::Minimal), 6);
        assert_eq!(table.index_for(Style::Business), 1);
    }

    #[test]
    fn emu_conversion_matches_known_constants() {
        assert_eq!(emu(0.5), 457_200);
        assert_eq!(emu(9.0), 8_229_600);
    }

    #[test]
    fn rgb_hex_is_uppercase_fixed_width() {
        assert_eq!(TITLE_COLOR.hex(), "2C3E50");
        assert_eq!(BODY_COLOR.hex(), "34495E");
    }
}
