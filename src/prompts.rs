//! Prompt builders.
//!
//! Each builder is a pure function returning a grounded [`GenerationRequest`].

use crate::llm::{GenerationRequest, PromptKind};

/// System instruction for product recommendations.
const RECOMMENDATIONS_SYSTEM: &str = "You are an expert shopping assistant. Use the Google Search tool to find the most current products, pricing, and details. \
Your final response MUST be a single, well-formatted Markdown list of 3 product recommendations. \
For each recommendation, use an H3 heading (###) for the Product Name, followed by a detailed Description, and the Current Estimated Cost.";

/// System instruction for the comparison table.
const COMPARISON_SYSTEM: &str = "You are a product analyst. Your response MUST be a single, detailed Markdown table comparing the two best products from the input.";

/// System instruction for the price trend outlook.
const PRICE_TREND_SYSTEM: &str = "You are a market analyst. Based on general market trends, seasonal sales cycles, and product launch patterns available via Google Search, \
provide a summary of the likely price trend for this product category over the next 60 days and give a clear purchase recommendation. \
Your response MUST be a concise Markdown block. Start with a clear heading (H3) for the recommendation, followed by a two-sentence summary of the trend.";

/// System instruction for product personas.
const PERSONAS_SYSTEM: &str =
    "You are a creative marketing strategist. Your response must be a single Markdown list of personas.";

/// System instruction for the lowest-price tracker.
const PRICE_TRACKER_SYSTEM: &str = "You are a deal finder. Use Google Search to find the current price and retailer for the product category specified by the user. \
List the three lowest prices currently available from major online retailers. \
Your response MUST be a clear Markdown list of the best 3 current deals, including the retailer name and the price details (e.g., $299 on Amazon).";

/// System instruction for follow-up answers.
const FOLLOW_UP_SYSTEM: &str = "You are a helpful shopping assistant. Answer the user's question based on the product context provided. \
Your response MUST be a clear, concise Markdown-formatted answer.";

/// Three recommendations for `query` within `budget`.
#[must_use]
pub fn recommendations(query: &str, budget: &str) -> GenerationRequest {
    let prompt = format!(
        "Find product recommendations for: '{query}'. \
         The user's budget level is '{budget}'. \
         Find the best 3 options that match this request."
    );
    GenerationRequest::grounded(PromptKind::Recommendations, RECOMMENDATIONS_SYSTEM, prompt)
}

/// Side-by-side table of the top two products in `recommendations_markdown`.
#[must_use]
pub fn comparison(recommendations_markdown: &str) -> GenerationRequest {
    let prompt = format!(
        "Analyze the following list of product recommendations. Select the top two distinct products from this list. \
         Generate a detailed, two-column Markdown table that compares the two products based on key features, price, and pros/cons. \
         The comparison must be easy to read and structured as a Markdown table. \
         Product List:\n\n{recommendations_markdown}"
    );
    GenerationRequest::grounded(PromptKind::Comparison, COMPARISON_SYSTEM, prompt)
}

/// 60-day price outlook for the category described by `query`.
#[must_use]
pub fn price_trend(query: &str) -> GenerationRequest {
    let prompt = format!("Analyze the market for products matching the description: '{query}'.");
    GenerationRequest::grounded(PromptKind::PriceTrend, PRICE_TREND_SYSTEM, prompt)
}

/// One persona per product in `recommendations_markdown`.
#[must_use]
pub fn personas(recommendations_markdown: &str) -> GenerationRequest {
    let prompt = format!(
        "Analyze the following list of product recommendations. For each product, create a short, catchy 'Product Persona' \
         that summarizes the item's key appeal and target user in a memorable, two-sentence phrase. \
         Your response MUST be a single Markdown list with one bolded persona description per product using the product name as the heading.\
         Product List:\n\n{recommendations_markdown}"
    );
    GenerationRequest::grounded(PromptKind::Personas, PERSONAS_SYSTEM, prompt)
}

/// Three lowest current retailer prices for `query`.
#[must_use]
pub fn price_tracker(query: &str) -> GenerationRequest {
    GenerationRequest::grounded(
        PromptKind::PriceTracker,
        PRICE_TRACKER_SYSTEM,
        format!("Find the three lowest prices for: {query}"),
    )
}

/// Answer `query` using the product `context` the client already holds.
#[must_use]
pub fn follow_up(context: &str, query: &str) -> GenerationRequest {
    GenerationRequest::grounded(
        PromptKind::FollowUp,
        FOLLOW_UP_SYSTEM,
        format!("Context: {context}\n\nQuestion: {query}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendations_prompt() {
        let request = recommendations("running shoes", "$100");
        assert_eq!(request.kind, PromptKind::Recommendations);
        assert_eq!(
            request.prompt,
            "Find product recommendations for: 'running shoes'. The user's budget level is '$100'. \
             Find the best 3 options that match this request."
        );
        assert!(request.system_instruction.contains("H3 heading (###)"));
    }

    #[test]
    fn test_markdown_is_embedded_verbatim() {
        let markdown = "### A\nfirst\n\n### B\nsecond";
        for request in [comparison(markdown), personas(markdown)] {
            assert!(request.prompt.ends_with(&format!("Product List:\n\n{markdown}")));
        }
    }

    #[test]
    fn test_personas_prompt_joins_list_header() {
        let request = personas("### A");
        assert!(request.prompt.contains("as the heading.Product List:\n\n### A"));
    }

    #[test]
    fn test_query_prompts() {
        assert!(price_trend("4k tv").prompt.contains("'4k tv'"));
        assert_eq!(
            price_tracker("4k tv").prompt,
            "Find the three lowest prices for: 4k tv"
        );
        assert!(price_tracker("4k tv").system_instruction.contains("deal finder"));
    }

    #[test]
    fn test_follow_up_prompt() {
        let request = follow_up("### Road Glide", "Is it waterproof?");
        assert_eq!(request.prompt, "Context: ### Road Glide\n\nQuestion: Is it waterproof?");
        assert_eq!(request.kind, PromptKind::FollowUp);
    }

    #[test]
    fn test_every_builder_is_grounded() {
        let all = [
            recommendations("q", "b"),
            comparison("m"),
            price_trend("q"),
            personas("m"),
            price_tracker("q"),
            follow_up("c", "q"),
        ];
        assert!(all.iter().all(|r| r.grounding));
        assert!(all.iter().all(|r| !r.system_instruction.is_empty()));
    }
}
