//! Turns raw model output into an outline of exactly the requested
//! length. Primary path: strict JSON. Secondary path: a line-oriented
//! heuristic scan. Either way the page count is fixed up by truncation or
//! synthetic padding, so callers never see a wrong-sized outline.

use deckgen_common::{Fact, MainPoint, SlideOutline, SlidePlan};
use tracing::debug;

use crate::fallback::{fallback_outline, PAD_TOPIC};

/// Markers that start a new slide during heuristic extraction. The CJK
/// entries come from the deployments this tool grew up in; input outside
/// this set is handled best-effort only.
const PAGE_MARKERS: [&str; 5] = ["page", "slide", "第", "页", "章"];

/// Markers that introduce a summary line.
const SUMMARY_MARKERS: [&str; 4] = ["summary", "overview", "总结", "概述"];

pub fn recover_outline(raw: &str, num_pages: usize) -> SlideOutline {
    match parse_json_outline(raw, num_pages) {
        Ok(outline) => outline,
        Err(err) => {
            debug!(%err, "outline JSON path failed, falling back to text extraction");
            extract_from_text(raw, num_pages)
        }
    }
}

/// Primary path: strip an optional code fence, parse a JSON array of
/// slides, then truncate or pad to `num_pages`.
fn parse_json_outline(raw: &str, num_pages: usize) -> Result<SlideOutline, serde_json::Error> {
    let cleaned = strip_code_fences(raw);
    let slides: SlideOutline = serde_json::from_str(cleaned)?;
    debug!(
        parsed = slides.len(),
        requested = num_pages,
        "outline JSON parsed"
    );
    Ok(fit_to_length(slides, num_pages))
}

fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

fn fit_to_length(mut slides: SlideOutline, num_pages: usize) -> SlideOutline {
    if slides.len() > num_pages {
        slides.truncate(num_pages);
    } else if slides.len() < num_pages {
        let missing = num_pages - slides.len();
        slides.extend(fallback_outline(PAD_TOPIC, missing));
    }
    slides
}

/// Secondary path: single linear pass over the lines of the response.
/// A page-marker line opens a slide, a summary-marker line sets its
/// summary, a bullet line opens a main point, and an indented line under a
/// point becomes a bare-string supporting fact.
pub fn extract_from_text(text: &str, num_pages: usize) -> SlideOutline {
    let mut pages: Vec<SlidePlan> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();

        if PAGE_MARKERS.iter().any(|m| lower.contains(m)) {
            pages.push(SlidePlan {
                title: line.to_string(),
                summary: format!("Key content of {line}"),
                points: Vec::new(),
            });
            continue;
        }

        let Some(page) = pages.last_mut() else {
            continue;
        };

        if SUMMARY_MARKERS.iter().any(|m| lower.starts_with(m)) {
            page.summary = summary_text(line);
            continue;
        }

        // Indentation wins over bullet glyphs: an indented "- x" under a
        // point is a fact of that point, not a new point.
        let indented = raw.starts_with(' ') || raw.starts_with('\t');
        if indented {
            if let Some(current) = page.points.last_mut() {
                let fact = strip_bullet(line);
                if !fact.is_empty() {
                    current.supporting_facts.push(Fact::Plain(fact));
                }
                continue;
            }
        }

        if is_bullet(line) {
            let text = strip_bullet(line);
            if !text.is_empty() {
                page.points.push(MainPoint {
                    main_point: text,
                    supporting_facts: Vec::new(),
                });
            }
        }
    }

    while pages.len() < num_pages {
        pages.push(generic_slide(pages.len() + 1));
    }
    pages.truncate(num_pages);
    pages
}

fn summary_text(line: &str) -> String {
    for sep in [':', '：'] {
        if let Some((_, rest)) = line.split_once(sep) {
            return rest.trim().to_string();
        }
    }
    line.to_string()
}

fn is_bullet(line: &str) -> bool {
    if line.starts_with(['-', '•', '*']) {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn strip_bullet(line: &str) -> String {
    line.trim_start_matches(|c: char| {
        c == '-' || c == '•' || c == '*' || c == '.' || c == ' ' || c.is_ascii_digit()
    })
    .to_string()
}

/// Filler slide for the heuristic path: three generic points with two
/// generic facts each.
fn generic_slide(n: usize) -> SlidePlan {
    SlidePlan {
        title: format!("Slide {n}"),
        summary: format!("Overview of slide {n}"),
        points: (1..=3)
            .map(|i| MainPoint {
                main_point: format!("Point {n}-{i}"),
                supporting_facts: (1..=2)
                    .map(|j| Fact::Detailed {
                        fact: format!("Fact {n}-{i}-{j}"),
                        explanation: "brief note".to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide_json(title: &str) -> String {
        format!(
            r#"{{"title": "{title}", "summary": "s", "points": [
                {{"main_point": "p1", "supporting_facts": [{{"fact": "f", "explanation": "e"}}]}},
                {{"main_point": "p2", "supporting_facts": ["legacy fact"]}},
                {{"main_point": "p3", "supporting_facts": []}}
            ]}}"#
        )
    }

    fn outline_json(titles: &[&str]) -> String {
        let slides: Vec<String> = titles.iter().map(|t| slide_json(t)).collect();
        format!("[{}]", slides.join(","))
    }

    #[test]
    fn exact_page_count_returned_verbatim() {
        let raw = outline_json(&["A", "B", "C"]);
        let outline = recover_outline(&raw, 3);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].title, "A");
        assert_eq!(outline[2].title, "C");
        // mixed fact shapes survive recovery untouched
        assert_eq!(
            outline[0].points[1].supporting_facts[0],
            Fact::Plain("legacy fact".to_string())
        );
    }

    #[test]
    fn too_many_pages_truncated() {
        let raw = outline_json(&["A", "B", "C", "D", "E"]);
        let outline = recover_outline(&raw, 3);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[2].title, "C");
    }

    #[test]
    fn too_few_pages_padded_with_synthetic_filler() {
        let raw = outline_json(&["A", "B"]);
        let outline = recover_outline(&raw, 5);
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0].title, "A");
        assert_eq!(outline[1].title, "B");
        assert_eq!(outline[2].title, "Additional content - Introduction");
        assert_eq!(outline[4].title, "Additional content - Summary");
    }

    #[test]
    fn code_fence_is_stripped() {
        let raw = format!("```json\n{}\n```", outline_json(&["A"]));
        let outline = recover_outline(&raw, 1);
        assert_eq!(outline[0].title, "A");
    }

    #[test]
    fn non_list_json_falls_through_to_extraction() {
        let raw = r#"{"title": "not a list"}"#;
        let outline = recover_outline(raw, 2);
        assert_eq!(outline.len(), 2);
        // "title" contains no page marker, so everything is synthetic
        assert_eq!(outline[0].title, "Slide 1");
    }

    #[test]
    fn heuristic_extraction_builds_pages_points_and_facts() {
        let raw = "\
Slide 1: The Opening
Summary: sets the scene
- First point
  supporting detail one
  - supporting detail two
- Second point
Slide 2: The Middle
1. Numbered point
";
        let outline = recover_outline(raw, 2);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].title, "Slide 1: The Opening");
        assert_eq!(outline[0].summary, "sets the scene");
        assert_eq!(outline[0].points.len(), 2);
        assert_eq!(outline[0].points[0].main_point, "First point");
        assert_eq!(
            outline[0].points[0].supporting_facts,
            vec![
                Fact::Plain("supporting detail one".to_string()),
                Fact::Plain("supporting detail two".to_string()),
            ]
        );
        assert_eq!(outline[1].points[0].main_point, "Numbered point");
    }

    #[test]
    fn cjk_markers_open_pages() {
        let raw = "第一页 成都美食\n- 小吃\n第二页 火锅\n- 牛油锅底\n";
        let outline = recover_outline(raw, 2);
        assert_eq!(outline[0].title, "第一页 成都美食");
        assert_eq!(outline[1].points[0].main_point, "牛油锅底");
    }

    #[test]
    fn markerless_text_yields_fully_synthetic_outline() {
        let raw = "nothing recognizable here\njust prose\n";
        let outline = recover_outline(raw, 3);
        assert_eq!(outline.len(), 3);
        for (i, slide) in outline.iter().enumerate() {
            assert_eq!(slide.title, format!("Slide {}", i + 1));
            assert_eq!(slide.points.len(), 3);
            for p in &slide.points {
                assert_eq!(p.supporting_facts.len(), 2);
            }
        }
    }

    #[test]
    fn heuristic_truncates_excess_pages() {
        let raw = "Slide 1\nSlide 2\nSlide 3\nSlide 4\n";
        let outline = recover_outline(raw, 2);
        assert_eq!(outline.len(), 2);
    }

    #[test]
    fn every_page_count_recovers_to_exact_length() {
        for n in 1..=20 {
            assert_eq!(recover_outline("garbage [not json", n).len(), n);
            assert_eq!(recover_outline(&outline_json(&["only one"]), n).len(), n);
        }
    }
}
