/// Builds the outline prompt. The formatting rules mirror what the
/// recovery pipeline expects back: a bare JSON array of exactly
/// `num_pages` slide objects.
pub fn build_outline_prompt(topic: &str, num_pages: usize) -> String {
    format!(
        r#"Create a {num_pages}-page presentation outline for the topic below. Keep the content concise and closely tied to the topic.

Topic: {topic}

Rules:
1. Every page needs a clear title (at most 15 characters).
2. Every page opens with a 1-2 sentence summary that leads naturally into its content, like a spoken introduction.
3. Every page must contain 3-4 main points (never fewer than 3).
4. Every main point is backed by 1-2 concrete supporting facts.
5. Every supporting fact carries a short explanation (10-20 characters) of why it matters.
6. The first page is an introduction, the last page a summary.
7. Pages must not repeat each other, and the content must be specific to "{topic}" rather than generic filler.
8. Produce exactly {num_pages} pages, no more and no fewer.

Return JSON only, in this shape:
[
    {{
        "title": "page title",
        "summary": "1-2 sentence introduction for the page",
        "points": [
            {{
                "main_point": "a concise claim tied to the topic",
                "supporting_facts": [
                    {{"fact": "supporting fact", "explanation": "short explanation"}},
                    {{"fact": "supporting fact", "explanation": "short explanation"}}
                ]
            }}
        ]
    }}
]

Return only the JSON content with no surrounding prose, and make sure it has exactly {num_pages} pages."#
    )
}

/// Fixed prompt/echo pair for the explicit connection-test action.
pub const CONNECTION_TEST_PROMPT: &str = "Reply with exactly: connection ok";
pub const CONNECTION_TEST_ECHO: &str = "connection ok";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_topic_and_page_count() {
        let prompt = build_outline_prompt("Street food of Chengdu", 7);
        assert!(prompt.contains("Street food of Chengdu"));
        assert!(prompt.contains("7-page"));
        assert!(prompt.contains("exactly 7 pages"));
        assert!(prompt.contains("supporting_facts"));
    }
}
