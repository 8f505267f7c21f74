//! Serializes the slide tree into PresentationML. Only the slide parts
//! are dynamic; the fixed package parts live in `package.rs`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{PptxError, Result};
use crate::model::{Align, ParagraphNode, RunNode, Shape, SlideNode, TextBox, TextFrame};

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

struct Xml {
    w: Writer<Vec<u8>>,
}

impl Xml {
    fn new() -> Self {
        Self {
            w: Writer::new(Vec::new()),
        }
    }

    fn decl(&mut self) -> Result<()> {
        self.w
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(PptxError::xml)
    }

    fn start(&mut self, el: BytesStart<'_>) -> Result<()> {
        self.w
            .write_event(Event::Start(el))
            .map_err(PptxError::xml)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.w
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(PptxError::xml)
    }

    fn empty(&mut self, el: BytesStart<'_>) -> Result<()> {
        self.w
            .write_event(Event::Empty(el))
            .map_err(PptxError::xml)
    }

    fn text(&mut self, s: &str) -> Result<()> {
        self.w
            .write_event(Event::Text(BytesText::new(s)))
            .map_err(PptxError::xml)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.w.into_inner()).map_err(PptxError::xml)
    }
}

fn el<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut e = BytesStart::new(name);
    for (k, v) in attrs {
        e.push_attribute((*k, *v));
    }
    e
}

pub fn slide_xml(slide: &SlideNode) -> Result<String> {
    let mut x = Xml::new();
    x.decl()?;
    x.start(el(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    ))?;
    x.start(el("p:cSld", &[]))?;
    x.start(el("p:spTree", &[]))?;

    x.start(el("p:nvGrpSpPr", &[]))?;
    x.empty(el("p:cNvPr", &[("id", "1"), ("name", "")]))?;
    x.empty(el("p:cNvGrpSpPr", &[]))?;
    x.empty(el("p:nvPr", &[]))?;
    x.end("p:nvGrpSpPr")?;
    x.empty(el("p:grpSpPr", &[]))?;

    // shape ids 1 is the group; shapes start at 2
    for (i, shape) in slide.shapes.iter().enumerate() {
        write_shape(&mut x, shape, i as u32 + 2)?;
    }

    x.end("p:spTree")?;
    x.end("p:cSld")?;
    x.empty(el("p:clrMapOvr", &[]))?;
    x.end("p:sld")?;
    x.finish()
}

fn write_shape(x: &mut Xml, shape: &Shape, id: u32) -> Result<()> {
    match shape {
        Shape::Placeholder(p) => {
            let id_s = id.to_string();
            let name = match p.kind {
                crate::model::PlaceholderKind::Title => format!("Title {id}"),
                crate::model::PlaceholderKind::Body => format!("Content Placeholder {id}"),
            };
            x.start(el("p:sp", &[]))?;
            x.start(el("p:nvSpPr", &[]))?;
            x.empty(el("p:cNvPr", &[("id", id_s.as_str()), ("name", name.as_str())]))?;
            x.start(el("p:cNvSpPr", &[]))?;
            x.empty(el("a:spLocks", &[("noGrp", "1")]))?;
            x.end("p:cNvSpPr")?;
            x.start(el("p:nvPr", &[]))?;
            match p.kind {
                crate::model::PlaceholderKind::Title => {
                    x.empty(el("p:ph", &[("type", "title")]))?;
                }
                crate::model::PlaceholderKind::Body => {
                    x.empty(el("p:ph", &[("type", "body"), ("idx", "1")]))?;
                }
            }
            x.end("p:nvPr")?;
            x.end("p:nvSpPr")?;
            // geometry is inherited from the layout placeholder
            x.empty(el("p:spPr", &[]))?;
            write_tx_body(x, &p.frame)?;
            x.end("p:sp")?;
        }
        Shape::TextBox(b) => {
            let id_s = id.to_string();
            let name = format!("TextBox {id}");
            x.start(el("p:sp", &[]))?;
            x.start(el("p:nvSpPr", &[]))?;
            x.empty(el("p:cNvPr", &[("id", id_s.as_str()), ("name", name.as_str())]))?;
            x.empty(el("p:cNvSpPr", &[("txBox", "1")]))?;
            x.empty(el("p:nvPr", &[]))?;
            x.end("p:nvSpPr")?;
            write_sp_pr(x, b)?;
            write_tx_body(x, &b.frame)?;
            x.end("p:sp")?;
        }
    }
    Ok(())
}

fn write_sp_pr(x: &mut Xml, b: &TextBox) -> Result<()> {
    let (xs, ys, cxs, cys) = (
        b.x.to_string(),
        b.y.to_string(),
        b.cx.to_string(),
        b.cy.to_string(),
    );
    x.start(el("p:spPr", &[]))?;
    x.start(el("a:xfrm", &[]))?;
    x.empty(el("a:off", &[("x", xs.as_str()), ("y", ys.as_str())]))?;
    x.empty(el("a:ext", &[("cx", cxs.as_str()), ("cy", cys.as_str())]))?;
    x.end("a:xfrm")?;
    x.start(el("a:prstGeom", &[("prst", "rect")]))?;
    x.empty(el("a:avLst", &[]))?;
    x.end("a:prstGeom")?;
    x.end("p:spPr")?;
    Ok(())
}

fn write_tx_body(x: &mut Xml, frame: &TextFrame) -> Result<()> {
    x.start(el("p:txBody", &[]))?;
    let wrap = if frame.word_wrap { "square" } else { "none" };
    x.empty(el("a:bodyPr", &[("wrap", wrap)]))?;
    x.empty(el("a:lstStyle", &[]))?;

    if frame.paragraphs.is_empty() {
        // a txBody requires at least one paragraph
        x.empty(el("a:p", &[]))?;
    }
    for paragraph in &frame.paragraphs {
        write_paragraph(x, paragraph)?;
    }

    x.end("p:txBody")?;
    Ok(())
}

fn write_paragraph(x: &mut Xml, paragraph: &ParagraphNode) -> Result<()> {
    x.start(el("a:p", &[]))?;
    if paragraph.align == Align::Center {
        x.empty(el("a:pPr", &[("algn", "ctr")]))?;
    }
    for run in &paragraph.runs {
        match run {
            RunNode::LineBreak => x.empty(el("a:br", &[]))?,
            RunNode::Text(t) => {
                let sz = (t.size_pt * 100).to_string();
                let color = t.color.hex();
                x.start(el("a:r", &[]))?;
                let mut rpr = el("a:rPr", &[("lang", "en-US"), ("sz", sz.as_str())]);
                if t.bold {
                    rpr.push_attribute(("b", "1"));
                }
                x.start(rpr)?;
                x.start(el("a:solidFill", &[]))?;
                x.empty(el("a:srgbClr", &[("val", color.as_str())]))?;
                x.end("a:solidFill")?;
                x.end("a:rPr")?;
                x.start(el("a:t", &[]))?;
                x.text(&t.text)?;
                x.end("a:t")?;
                x.end("a:r")?;
            }
        }
    }
    x.end("a:p")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{builtin_layout, Rgb, TextRun};

    fn slide_with_text(text: &str) -> SlideNode {
        let mut node = SlideNode::from_layout(&builtin_layout(6));
        if let Some(ph) = node.title_placeholder_mut() {
            ph.frame = TextFrame {
                word_wrap: false,
                paragraphs: vec![ParagraphNode {
                    align: Align::Center,
                    runs: vec![RunNode::Text(TextRun {
                        text: text.to_string(),
                        size_pt: 28,
                        bold: true,
                        color: Rgb(44, 62, 80),
                    })],
                }],
            };
        }
        node
    }

    #[test]
    fn slide_xml_carries_title_run() {
        let xml = slide_xml(&slide_with_text("Hello")).unwrap();
        assert!(xml.contains("<p:ph type=\"title\"/>"));
        assert!(xml.contains("<a:t>Hello</a:t>"));
        assert!(xml.contains("sz=\"2800\""));
        assert!(xml.contains("algn=\"ctr\""));
        assert!(xml.contains("val=\"2C3E50\""));
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let xml = slide_xml(&slide_with_text("R&D <rocks>")).unwrap();
        assert!(xml.contains("R&amp;D &lt;rocks&gt;"));
        assert!(!xml.contains("R&D"));
    }

    #[test]
    fn empty_frame_still_emits_a_paragraph() {
        let node = SlideNode::from_layout(&builtin_layout(1));
        let xml = slide_xml(&node).unwrap();
        assert!(xml.contains("<a:p/>"));
    }
}
