//! Deterministic synthetic outlines, used when the live call fails and as
//! padding when the model returns too few pages. Pure string substitution
//! of the topic into fixed templates: the same (topic, num_pages) always
//! produces the same outline.

use deckgen_common::{Fact, MainPoint, SlideOutline, SlidePlan};

/// Topic used when padding a short model response: the real topic is not
/// known to fit the missing pages, so the filler stays generic.
pub const PAD_TOPIC: &str = "Additional content";

pub fn fallback_outline(topic: &str, num_pages: usize) -> SlideOutline {
    let mut pages = Vec::with_capacity(num_pages);
    if num_pages == 0 {
        return pages;
    }

    pages.push(intro_slide(topic));
    for part in 2..num_pages {
        pages.push(part_slide(topic, part));
    }
    if num_pages > 1 {
        pages.push(summary_slide(topic));
    }
    pages
}

fn point(heading: String, facts: [(String, &str); 2]) -> MainPoint {
    MainPoint {
        main_point: heading,
        supporting_facts: facts
            .into_iter()
            .map(|(fact, explanation)| Fact::Detailed {
                fact,
                explanation: explanation.to_string(),
            })
            .collect(),
    }
}

fn intro_slide(topic: &str) -> SlidePlan {
    SlidePlan {
        title: format!("{topic} - Introduction"),
        summary: format!(
            "Today we take a close look at {topic}: what it is, why it matters, and where it is heading."
        ),
        points: vec![
            point(
                format!("What {topic} is"),
                [
                    (format!("Definition and basic concepts of {topic}"), "core concepts"),
                    (format!("Where {topic} sits within its field"), "reach and standing"),
                ],
            ),
            point(
                format!("Why {topic} matters"),
                [
                    ("How it pushes the wider industry forward".to_string(), "drives progress"),
                    ("How well it answers real needs".to_string(), "solves real problems"),
                ],
            ),
            point(
                format!("How {topic} developed"),
                [
                    (format!("Historical background of {topic}"), "origins"),
                    (format!("Development stages of {topic}"), "key milestones"),
                ],
            ),
            point(
                "What this talk covers".to_string(),
                [
                    (format!("All the major aspects of {topic}"), "full picture"),
                    ("Detailed analysis backed by data".to_string(), "data support"),
                ],
            ),
        ],
    }
}

fn part_slide(topic: &str, part: usize) -> SlidePlan {
    SlidePlan {
        title: format!("{topic} - Part {part}"),
        summary: format!(
            "With the basics covered, we now turn to aspect {part} of {topic}, where there is plenty worth a closer look."
        ),
        points: vec![
            point(
                format!("Core point {part} of {topic}"),
                [
                    (format!("Concrete characteristics of {topic}"), "key traits"),
                    (format!("Figures and statistics around {topic}"), "data support"),
                ],
            ),
            point(
                format!("Key factor {part} behind {topic}"),
                [
                    (format!("What influences {topic}"), "driving forces"),
                    (format!("How the market responds to {topic}"), "market signal"),
                ],
            ),
            point(
                format!("Trend {part} around {topic}"),
                [
                    (format!("Where {topic} stands today"), "current state"),
                    (format!("Where {topic} goes next"), "outlook"),
                ],
            ),
            point(
                format!("Case study {part} for {topic}"),
                [
                    (format!("A real application of {topic}"), "in practice"),
                    (format!("Lessons learned from {topic}"), "takeaways"),
                ],
            ),
        ],
    }
}

fn summary_slide(topic: &str) -> SlidePlan {
    SlidePlan {
        title: format!("{topic} - Summary"),
        summary: format!(
            "After this deep dive we have a rounded view of {topic}; let us recap the most important findings and what comes next."
        ),
        points: vec![
            point(
                format!("Recap of {topic}"),
                [
                    (format!("The key knowledge points of {topic}"), "essentials"),
                    (format!("The important figures and cases for {topic}"), "data support"),
                ],
            ),
            point(
                "Key takeaways".to_string(),
                [
                    (format!("The most important sides of {topic}"), "what to remember"),
                    (format!("What deserves continued attention in {topic}"), "focus areas"),
                ],
            ),
            point(
                format!("Outlook for {topic}"),
                [
                    (format!("Predicted direction of {topic}"), "future course"),
                    (format!("Opportunities hidden in {topic}"), "openings"),
                ],
            ),
            point(
                "Suggested actions".to_string(),
                [
                    (format!("Practical steps to apply {topic}"), "how to start"),
                    (format!("A next-step plan around {topic}"), "what to do"),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_outline("Rust", 5);
        let b = fallback_outline("Rust", 5);
        assert_eq!(a, b);
    }

    #[test]
    fn single_page_fallback_is_intro_only() {
        let outline = fallback_outline("Rust", 1);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "Rust - Introduction");
        assert_eq!(outline[0].points.len(), 4);
        for p in &outline[0].points {
            assert_eq!(p.supporting_facts.len(), 2);
        }
    }

    #[test]
    fn multi_page_fallback_has_intro_parts_and_summary() {
        let outline = fallback_outline("Rust", 4);
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[0].title, "Rust - Introduction");
        assert_eq!(outline[1].title, "Rust - Part 2");
        assert_eq!(outline[2].title, "Rust - Part 3");
        assert_eq!(outline[3].title, "Rust - Summary");
    }

    #[test]
    fn two_page_fallback_is_intro_plus_summary() {
        let outline = fallback_outline("Rust", 2);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[1].title, "Rust - Summary");
    }
}
