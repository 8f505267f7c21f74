use serde::{Deserialize, Serialize};

/// One planned slide as recovered from the model: a short title, a 1-2
/// sentence summary, and the main points with their supporting facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub points: Vec<MainPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPoint {
    #[serde(default)]
    pub main_point: String,
    #[serde(default)]
    pub supporting_facts: Vec<Fact>,
}

/// A supporting fact as it appears on the wire. Models sometimes return the
/// structured `{fact, explanation}` object the prompt asks for and sometimes
/// a bare string; both must deserialize and render equivalently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fact {
    Detailed {
        fact: String,
        #[serde(default)]
        explanation: String,
    },
    Plain(String),
}

/// The whole outline, ordered first slide to last. After recovery its
/// length always equals the requested page count.
pub type SlideOutline = Vec<SlidePlan>;

/// A supporting fact after normalization: one shape, explanation optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLine {
    pub text: String,
    pub explanation: Option<String>,
}

impl FactLine {
    /// The text the writer puts on the slide: "fact: explanation" when an
    /// explanation is present, the fact alone otherwise.
    pub fn rendered(&self) -> String {
        match &self.explanation {
            Some(explanation) => format!("{}: {explanation}", self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub heading: String,
    pub facts: Vec<FactLine>,
}

/// One slide after the formatter pass: every field present, every fact in
/// canonical shape. This is the only shape the writer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSlide {
    pub title: String,
    pub summary: String,
    pub points: Vec<NormalizedPoint>,
}

pub type NormalizedOutline = Vec<NormalizedSlide>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_deserializes_both_wire_shapes() {
        let detailed: Fact =
            serde_json::from_str(r#"{"fact": "f1", "explanation": "e1"}"#).unwrap();
        assert_eq!(
            detailed,
            Fact::Detailed {
                fact: "f1".to_string(),
                explanation: "e1".to_string()
            }
        );

        let plain: Fact = serde_json::from_str(r#""just a string""#).unwrap();
        assert_eq!(plain, Fact::Plain("just a string".to_string()));
    }

    #[test]
    fn slide_plan_tolerates_missing_fields() {
        let plan: SlidePlan = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(plan.title, "T");
        assert!(plan.summary.is_empty());
        assert!(plan.points.is_empty());
    }

    #[test]
    fn fact_line_joins_with_separator_only_when_explained() {
        let explained = FactLine {
            text: "GDP grew 5%".to_string(),
            explanation: Some("strong year".to_string()),
        };
        assert_eq!(explained.rendered(), "GDP grew 5%: strong year");

        let bare = FactLine {
            text: "GDP grew 5%".to_string(),
            explanation: None,
        };
        assert_eq!(bare.rendered(), "GDP grew 5%");
    }
}
