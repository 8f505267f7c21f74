//! Collapses the fact polymorphism left by recovery into the single
//! canonical shape the writer consumes. Never fails: missing fields come
//! out as empty strings or empty lists.

use deckgen_common::{
    Fact, FactLine, NormalizedOutline, NormalizedPoint, NormalizedSlide, SlideOutline, SlidePlan,
};

pub fn format_content(outline: &SlideOutline) -> NormalizedOutline {
    outline.iter().map(normalize_slide).collect()
}

fn normalize_slide(plan: &SlidePlan) -> NormalizedSlide {
    NormalizedSlide {
        title: plan.title.clone(),
        summary: plan.summary.clone(),
        points: plan
            .points
            .iter()
            .map(|point| NormalizedPoint {
                heading: point.main_point.clone(),
                facts: point.supporting_facts.iter().map(fact_line).collect(),
            })
            .collect(),
    }
}

/// The single point where the two wire shapes of a fact are resolved.
/// A structured fact with a blank explanation is treated the same as a
/// legacy bare string.
fn fact_line(fact: &Fact) -> FactLine {
    match fact {
        Fact::Detailed { fact, explanation } => FactLine {
            text: fact.clone(),
            explanation: if explanation.trim().is_empty() {
                None
            } else {
                Some(explanation.clone())
            },
        },
        Fact::Plain(text) => FactLine {
            text: text.clone(),
            explanation: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_common::MainPoint;

    fn sample_outline() -> SlideOutline {
        vec![SlidePlan {
            title: "T".to_string(),
            summary: "S".to_string(),
            points: vec![MainPoint {
                main_point: "P".to_string(),
                supporting_facts: vec![
                    Fact::Detailed {
                        fact: "structured".to_string(),
                        explanation: "why".to_string(),
                    },
                    Fact::Plain("legacy".to_string()),
                    Fact::Detailed {
                        fact: "blank explanation".to_string(),
                        explanation: "  ".to_string(),
                    },
                ],
            }],
        }]
    }

    /// Round an outline back through the wire shape so idempotence can be
    /// phrased as format(unformat(format(x))) == format(x).
    fn to_outline(normalized: &NormalizedOutline) -> SlideOutline {
        normalized
            .iter()
            .map(|slide| SlidePlan {
                title: slide.title.clone(),
                summary: slide.summary.clone(),
                points: slide
                    .points
                    .iter()
                    .map(|point| MainPoint {
                        main_point: point.heading.clone(),
                        supporting_facts: point
                            .facts
                            .iter()
                            .map(|f| match &f.explanation {
                                Some(explanation) => Fact::Detailed {
                                    fact: f.text.clone(),
                                    explanation: explanation.clone(),
                                },
                                None => Fact::Plain(f.text.clone()),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    #[test]
    fn polymorphism_is_collapsed() {
        let normalized = format_content(&sample_outline());
        let facts = &normalized[0].points[0].facts;
        assert_eq!(facts[0].explanation.as_deref(), Some("why"));
        assert_eq!(facts[1].explanation, None);
        assert_eq!(facts[2].explanation, None);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format_content(&sample_outline());
        let twice = format_content(&to_outline(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn equivalent_facts_render_identically() {
        let structured = Fact::Detailed {
            fact: "water boils at 100C".to_string(),
            explanation: String::new(),
        };
        let legacy = Fact::Plain("water boils at 100C".to_string());
        assert_eq!(fact_line(&structured).rendered(), fact_line(&legacy).rendered());
    }

    #[test]
    fn missing_fields_become_empty_not_errors() {
        let outline = vec![SlidePlan {
            title: String::new(),
            summary: String::new(),
            points: Vec::new(),
        }];
        let normalized = format_content(&outline);
        assert_eq!(normalized[0].title, "");
        assert!(normalized[0].points.is_empty());
    }
}
