use async_trait::async_trait;
use deckgen_common::SlideOutline;
use deckgen_outline::OutlineClient;

/// Seam between planning and outline production, so the outline strategy
/// can be swapped (live client, canned source in tests) without touching
/// rendering.
#[async_trait]
pub trait OutlineSource: Send + Sync {
    async fn generate_outline(&self, topic: &str, num_pages: usize) -> SlideOutline;
}

#[async_trait]
impl OutlineSource for OutlineClient {
    async fn generate_outline(&self, topic: &str, num_pages: usize) -> SlideOutline {
        OutlineClient::generate_outline(self, topic, num_pages).await
    }
}

/// Pure delegation; no logic of its own.
pub struct ContentPlanner<S> {
    source: S,
}

impl<S: OutlineSource> ContentPlanner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn plan_content(&self, topic: &str, num_pages: usize) -> SlideOutline {
        self.source.generate_outline(topic, num_pages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_common::SlidePlan;

    struct Canned;

    #[async_trait]
    impl OutlineSource for Canned {
        async fn generate_outline(&self, topic: &str, num_pages: usize) -> SlideOutline {
            (0..num_pages)
                .map(|i| SlidePlan {
                    title: format!("{topic} {i}"),
                    summary: String::new(),
                    points: Vec::new(),
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn planner_delegates_unchanged() {
        let planner = ContentPlanner::new(Canned);
        let outline = planner.plan_content("T", 2).await;
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].title, "T 0");
        assert_eq!(outline[1].title, "T 1");
    }
}
