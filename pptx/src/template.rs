//! Template handling: read-only layout inspection, the title/content
//! layout selection heuristic, and the template-mode build ("analyze,
//! then build": the template file is opened twice).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use tracing::debug;
use zip::ZipArchive;
use zip::ZipWriter;

use deckgen_common::NormalizedOutline;

use crate::error::{PptxError, Result};
use crate::model::{PlaceholderKind, SlideLayout};
use crate::package::{add, slide_rels_xml, CT_SLIDE, REL_SLIDE};
use crate::render::render_slide;
use crate::xml::slide_xml;

#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub index: usize,
    pub name: String,
    pub placeholder_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub total_layouts: usize,
    pub layouts: Vec<LayoutInfo>,
}

/// Read-only introspection of a template's layouts; never mutates the
/// file.
pub fn inspect_template(path: &Path) -> Result<TemplateInfo> {
    let layouts = scan_layouts(path)?;
    Ok(TemplateInfo {
        total_layouts: layouts.len(),
        layouts: layouts.into_iter().map(|(_, info)| info).collect(),
    })
}

/// Layout part path plus its parsed summary, ordered by layout number.
fn scan_layouts(path: &Path) -> Result<Vec<(String, LayoutInfo)>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(PptxError::zip)?;

    let mut paths: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slideLayouts/slideLayout") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    paths.sort_by_key(|p| layout_number(p));

    let mut layouts = Vec::with_capacity(paths.len());
    for (index, part) in paths.iter().enumerate() {
        let mut content = String::new();
        archive
            .by_name(part)
            .map_err(PptxError::zip)?
            .read_to_string(&mut content)?;
        let (name, placeholder_count) = parse_layout(&content)?;
        layouts.push((
            part.clone(),
            LayoutInfo {
                index,
                name,
                placeholder_count,
            },
        ));
    }
    Ok(layouts)
}

fn layout_number(path: &str) -> usize {
    let digits: String = path.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(usize::MAX)
}

/// Pulls the layout's display name (`p:cSld@name`) and its placeholder
/// count out of one layout part.
fn parse_layout(xml: &str) -> Result<(String, usize)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut name = String::new();
    let mut placeholders = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"p:cSld" => {
                    if let Some(value) = attr_value(e, b"name") {
                        name = value;
                    }
                }
                b"p:ph" => placeholders += 1,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PptxError::xml(e)),
            _ => {}
        }
    }
    Ok((name, placeholders))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

const TITLE_LAYOUT_NAMES: [&str; 3] = ["title slide", "标题幻灯片", "title"];
const CONTENT_LAYOUT_NAMES: [&str; 3] = ["title and content", "标题和内容", "content"];

/// Title-like layout: known name, or exactly one placeholder.
fn pick_title_layout(layouts: &[LayoutInfo]) -> Option<usize> {
    layouts
        .iter()
        .position(|l| TITLE_LAYOUT_NAMES.contains(&l.name.to_lowercase().as_str()))
        .or_else(|| layouts.iter().position(|l| l.placeholder_count == 1))
}

/// Content-like layout: known name, or at least two placeholders. When
/// neither exists the default layout index (or the first layout) stands
/// in — selection itself never fails on a non-empty layout list.
fn pick_content_layout(layouts: &[LayoutInfo], default_index: usize) -> Option<usize> {
    layouts
        .iter()
        .position(|l| CONTENT_LAYOUT_NAMES.contains(&l.name.to_lowercase().as_str()))
        .or_else(|| layouts.iter().position(|l| l.placeholder_count >= 2))
        .or_else(|| layouts.get(default_index).map(|l| l.index))
        .or_else(|| (!layouts.is_empty()).then_some(0))
}

/// Shape inventory assumed for a template layout we only know by
/// placeholder count.
fn layout_model(info: &LayoutInfo) -> SlideLayout {
    let placeholders = match info.placeholder_count {
        0 => vec![],
        1 => vec![PlaceholderKind::Title],
        _ => vec![PlaceholderKind::Title, PlaceholderKind::Body],
    };
    SlideLayout {
        name: info.name.clone(),
        placeholders,
    }
}

pub(crate) fn build_from_template(
    outline: &NormalizedOutline,
    template: &Path,
    output: &Path,
    default_layout_index: usize,
) -> Result<PathBuf> {
    // analyze phase
    let layouts = scan_layouts(template)?;
    if layouts.is_empty() {
        return Err(PptxError::NoLayouts);
    }
    let infos: Vec<LayoutInfo> = layouts.iter().map(|(_, info)| info.clone()).collect();
    let title_at = pick_title_layout(&infos);
    let content_at =
        pick_content_layout(&infos, default_layout_index).ok_or(PptxError::NoLayouts)?;
    debug!(?title_at, content_at, "template layouts selected");

    // build phase: the template is the base of the output package, minus
    // its own slides
    let file = File::open(template)?;
    let mut archive = ZipArchive::new(file).map_err(PptxError::zip)?;
    let out = File::create(output)?;
    let mut zip = ZipWriter::new(out);
    let n = outline.len();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(PptxError::zip)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if name.starts_with("ppt/slides/") || name.starts_with("ppt/notesSlides/") {
            continue;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        let content = match name.as_str() {
            "[Content_Types].xml" => rewrite_content_types(&buf, n)?.into_bytes(),
            "ppt/presentation.xml" => rewrite_presentation(&buf, n)?.into_bytes(),
            "ppt/_rels/presentation.xml.rels" => rewrite_presentation_rels(&buf, n)?.into_bytes(),
            _ => buf,
        };
        add(&mut zip, &name, &content)?;
    }

    for (i, slide) in outline.iter().enumerate() {
        let layout_at = if i == 0 {
            title_at.unwrap_or(content_at)
        } else {
            content_at
        };
        let (layout_part, info) = &layouts[layout_at];
        let node = render_slide(slide, &layout_model(info));
        let idx = i + 1;
        let layout_file = layout_part.rsplit('/').next().unwrap_or("slideLayout1.xml");
        add(&mut zip, &format!("ppt/slides/slide{idx}.xml"), slide_xml(&node)?)?;
        add(
            &mut zip,
            &format!("ppt/slides/_rels/slide{idx}.xml.rels"),
            slide_rels_xml(&format!("../slideLayouts/{layout_file}")),
        )?;
    }

    zip.finish().map_err(PptxError::zip)?;
    Ok(output.to_path_buf())
}

/// Drop the template's slide overrides, add ours.
fn rewrite_content_types(xml: &[u8], num_slides: usize) -> Result<String> {
    let text = String::from_utf8_lossy(xml).to_string();
    let mut reader = Reader::from_str(&text);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"Override" => {
                let stale = attr_value(&e, b"PartName").is_some_and(|p| {
                    p.starts_with("/ppt/slides/") || p.starts_with("/ppt/notesSlides/")
                });
                if !stale {
                    writer.write_event(Event::Empty(e)).map_err(PptxError::xml)?;
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Types" => {
                for i in 1..=num_slides {
                    let part = format!("/ppt/slides/slide{i}.xml");
                    let mut o = BytesStart::new("Override");
                    o.push_attribute(("PartName", part.as_str()));
                    o.push_attribute(("ContentType", CT_SLIDE));
                    writer.write_event(Event::Empty(o)).map_err(PptxError::xml)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("Types")))
                    .map_err(PptxError::xml)?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event).map_err(PptxError::xml)?,
            Err(e) => return Err(PptxError::xml(e)),
        }
    }
    String::from_utf8(writer.into_inner()).map_err(PptxError::xml)
}

/// Replace the template's slide-id list with one naming our slides.
fn rewrite_presentation(xml: &[u8], num_slides: usize) -> Result<String> {
    let text = String::from_utf8_lossy(xml).to_string();
    let mut reader = Reader::from_str(&text);
    let mut writer = Writer::new(Vec::new());
    let mut inserted = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"p:sldIdLst" => {
                let owned = e.to_owned();
                reader.read_to_end(owned.name()).map_err(PptxError::xml)?;
                write_slide_id_list(&mut writer, num_slides)?;
                inserted = true;
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"p:sldIdLst" => {
                write_slide_id_list(&mut writer, num_slides)?;
                inserted = true;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"p:presentation" => {
                if !inserted {
                    // template had no slide list at all
                    write_slide_id_list(&mut writer, num_slides)?;
                    inserted = true;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("p:presentation")))
                    .map_err(PptxError::xml)?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event).map_err(PptxError::xml)?,
            Err(e) => return Err(PptxError::xml(e)),
        }
    }
    if !inserted {
        return Err(PptxError::UnusableTemplate);
    }
    String::from_utf8(writer.into_inner()).map_err(PptxError::xml)
}

fn write_slide_id_list(writer: &mut Writer<Vec<u8>>, num_slides: usize) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("p:sldIdLst")))
        .map_err(PptxError::xml)?;
    for i in 0..num_slides {
        let id = (256 + i).to_string();
        let rid = format!("rIdDg{}", i + 1);
        let mut sld = BytesStart::new("p:sldId");
        sld.push_attribute(("id", id.as_str()));
        sld.push_attribute(("r:id", rid.as_str()));
        writer
            .write_event(Event::Empty(sld))
            .map_err(PptxError::xml)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("p:sldIdLst")))
        .map_err(PptxError::xml)
}

/// Drop the template's slide relationships, keep everything else
/// (masters, theme, props), and append relationships for our slides.
fn rewrite_presentation_rels(xml: &[u8], num_slides: usize) -> Result<String> {
    let text = String::from_utf8_lossy(xml).to_string();
    let mut reader = Reader::from_str(&text);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let is_slide = attr_value(&e, b"Type").is_some_and(|t| t == REL_SLIDE);
                if !is_slide {
                    writer.write_event(Event::Empty(e)).map_err(PptxError::xml)?;
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Relationships" => {
                for i in 1..=num_slides {
                    let rid = format!("rIdDg{i}");
                    let target = format!("slides/slide{i}.xml");
                    let mut rel = BytesStart::new("Relationship");
                    rel.push_attribute(("Id", rid.as_str()));
                    rel.push_attribute(("Type", REL_SLIDE));
                    rel.push_attribute(("Target", target.as_str()));
                    writer
                        .write_event(Event::Empty(rel))
                        .map_err(PptxError::xml)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("Relationships")))
                    .map_err(PptxError::xml)?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event).map_err(PptxError::xml)?,
            Err(e) => return Err(PptxError::xml(e)),
        }
    }
    String::from_utf8(writer.into_inner()).map_err(PptxError::xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(index: usize, name: &str, placeholder_count: usize) -> LayoutInfo {
        LayoutInfo {
            index,
            name: name.to_string(),
            placeholder_count,
        }
    }

    #[test]
    fn title_layout_found_by_name_then_by_count() {
        let by_name = vec![layout(0, "Other", 3), layout(1, "Title Slide", 2)];
        assert_eq!(pick_title_layout(&by_name), Some(1));

        let by_count = vec![layout(0, "Weird", 3), layout(1, "Weird2", 1)];
        assert_eq!(pick_title_layout(&by_count), Some(1));

        let none = vec![layout(0, "Weird", 3)];
        assert_eq!(pick_title_layout(&none), None);
    }

    #[test]
    fn content_layout_found_by_name_then_by_count() {
        let by_name = vec![layout(0, "Title and Content", 2), layout(1, "Other", 5)];
        assert_eq!(pick_content_layout(&by_name, 1), Some(0));

        let by_count = vec![layout(0, "A", 1), layout(1, "B", 4)];
        assert_eq!(pick_content_layout(&by_count, 1), Some(1));
    }

    #[test]
    fn missing_content_layout_falls_back_without_raising() {
        // nothing with >=2 placeholders: default index wins
        let sparse = vec![layout(0, "A", 1), layout(1, "B", 0), layout(2, "C", 1)];
        assert_eq!(pick_content_layout(&sparse, 1), Some(1));

        // default index out of range: first layout wins
        let single = vec![layout(0, "A", 1)];
        assert_eq!(pick_content_layout(&single, 1), Some(0));
    }

    #[test]
    fn layout_model_maps_placeholder_counts() {
        assert!(layout_model(&layout(0, "x", 0)).placeholders.is_empty());
        assert_eq!(
            layout_model(&layout(0, "x", 1)).placeholders,
            vec![PlaceholderKind::Title]
        );
        assert_eq!(
            layout_model(&layout(0, "x", 5)).placeholders,
            vec![PlaceholderKind::Title, PlaceholderKind::Body]
        );
    }

    #[test]
    fn layout_parts_sort_numerically() {
        assert!(layout_number("ppt/slideLayouts/slideLayout2.xml") < layout_number("ppt/slideLayouts/slideLayout10.xml"));
    }

    #[test]
    fn parse_layout_reads_name_and_placeholders() {
        let xml = r#"<p:sldLayout><p:cSld name="Title and Content"><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr></p:sp>
        </p:spTree></p:cSld></p:sldLayout>"#;
        let (name, count) = parse_layout(xml).unwrap();
        assert_eq!(name, "Title and Content");
        assert_eq!(count, 2);
    }

    #[test]
    fn content_types_rewrite_swaps_slide_overrides() {
        let input = br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/slides/slide7.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/></Types>"#;
        let out = rewrite_content_types(input, 2).unwrap();
        assert!(!out.contains("slide7.xml"));
        assert!(out.contains("/ppt/slides/slide1.xml"));
        assert!(out.contains("/ppt/slides/slide2.xml"));
        assert!(out.contains("Default Extension=\"xml\""));
    }

    #[test]
    fn presentation_rewrite_replaces_slide_id_list() {
        let input = br#"<p:presentation xmlns:r="r" xmlns:p="p"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="300" r:id="rId9"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#;
        let out = rewrite_presentation(input, 2).unwrap();
        assert!(!out.contains("rId9"));
        assert!(out.contains("rIdDg1"));
        assert!(out.contains("rIdDg2"));
        assert!(out.contains("sldMasterIdLst"));
        assert!(out.contains("p:sldSz"));
    }

    #[test]
    fn rels_rewrite_keeps_non_slide_relationships() {
        let input = format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_SLIDE}" Target="slides/slide1.xml"/></Relationships>"#
        );
        let out = rewrite_presentation_rels(input.as_bytes(), 1).unwrap();
        assert!(out.contains("slideMaster1.xml"));
        assert!(!out.contains("rId2"));
        assert!(out.contains("rIdDg1"));
    }
}
