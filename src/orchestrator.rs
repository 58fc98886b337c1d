//! Recommendation and follow-up flows.
//!
//! Stages run strictly in order: recommendations, comparison, personas,
//! price trend, price tracker. Only the first is fatal; every later stage
//! falls back to fixed text when its own call fails.

use serde::Serialize;

use crate::llm::{GenerationError, GenerationRequest, GenerativeBackend};
use crate::prompts;

/// Substituted when the comparison call fails.
pub const COMPARISON_FALLBACK: &str = "Comparison failed, but recommendations were successful.";
/// Substituted when the personas call fails.
pub const PERSONA_FALLBACK: &str = "### Persona Analysis Unavailable";
/// Substituted when the price trend call fails.
pub const PRICE_TREND_FALLBACK: &str = "### Price Trend Analysis Unavailable\n\n\
Could not access live market data for price trend prediction. Please check retail sites for current sales.";
/// Substituted when the price tracker call fails.
pub const PRICE_TRACKER_FALLBACK: &str =
    "Could not find a current price breakdown from major retailers.";

/// Everything the recommendations endpoint returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecommendationBundle {
    /// Three product recommendations.
    pub recommendations_markdown: String,
    /// Comparison table, or [`COMPARISON_FALLBACK`].
    pub comparison_markdown: String,
    /// Price trend outlook, or [`PRICE_TREND_FALLBACK`].
    pub price_trend_markdown: String,
    /// Product personas, or [`PERSONA_FALLBACK`].
    pub persona_markdown: String,
    /// Lowest retailer prices, or [`PRICE_TRACKER_FALLBACK`].
    pub price_tracker_markdown: String,
}

/// Run the five-stage recommendation flow.
///
/// # Errors
/// Returns the recommendations stage error; later stage errors are absorbed.
pub async fn recommend(
    backend: &dyn GenerativeBackend,
    query: &str,
    budget: &str,
) -> Result<RecommendationBundle, GenerationError> {
    tracing::info!(query, budget, "Generating grounded recommendations");

    let recommendations_markdown = backend
        .generate(&prompts::recommendations(query, budget))
        .await
        .inspect_err(|e| tracing::error!("Recommendations failed: {e}"))?;

    let comparison_markdown = generate_or_fallback(
        backend,
        &prompts::comparison(&recommendations_markdown),
        COMPARISON_FALLBACK,
    )
    .await;

    let persona_markdown = generate_or_fallback(
        backend,
        &prompts::personas(&recommendations_markdown),
        PERSONA_FALLBACK,
    )
    .await;

    let price_trend_markdown =
        generate_or_fallback(backend, &prompts::price_trend(query), PRICE_TREND_FALLBACK).await;

    let price_tracker_markdown =
        generate_or_fallback(backend, &prompts::price_tracker(query), PRICE_TRACKER_FALLBACK)
            .await;

    Ok(RecommendationBundle {
        recommendations_markdown,
        comparison_markdown,
        price_trend_markdown,
        persona_markdown,
        price_tracker_markdown,
    })
}

/// Answer a follow-up question about products the client already has.
///
/// # Errors
/// Returns the upstream error unchanged.
pub async fn answer_follow_up(
    backend: &dyn GenerativeBackend,
    context: &str,
    query: &str,
) -> Result<String, GenerationError> {
    backend
        .generate(&prompts::follow_up(context, query))
        .await
        .inspect_err(|e| tracing::error!("Follow-up answer failed: {e}"))
}

async fn generate_or_fallback(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
    fallback: &str,
) -> String {
    backend.generate(request).await.unwrap_or_else(|e| {
        tracing::warn!(kind = request.kind.as_str(), "Using fallback text: {e}");
        fallback.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::fake::ScriptedBackend;
    use crate::llm::PromptKind;

    #[tokio::test]
    async fn test_all_stages_succeed() {
        let backend = ScriptedBackend::new();
        let bundle = recommend(&backend, "running shoes", "$100").await.unwrap();

        assert_eq!(
            backend.kinds(),
            vec![
                PromptKind::Recommendations,
                PromptKind::Comparison,
                PromptKind::Personas,
                PromptKind::PriceTrend,
                PromptKind::PriceTracker,
            ]
        );
        assert_eq!(
            bundle.recommendations_markdown,
            ScriptedBackend::reply_for(PromptKind::Recommendations)
        );
        assert_eq!(bundle.comparison_markdown, "comparison output");
        assert_eq!(bundle.persona_markdown, "personas output");
        assert_eq!(bundle.price_trend_markdown, "price_trend output");
        assert_eq!(bundle.price_tracker_markdown, "price_tracker output");
    }

    #[tokio::test]
    async fn test_recommendations_failure_is_fatal() {
        let backend = ScriptedBackend::new().failing(PromptKind::Recommendations);
        let err = recommend(&backend, "running shoes", "$100").await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(backend.kinds(), vec![PromptKind::Recommendations]);
    }

    #[tokio::test]
    async fn test_later_failures_fall_back_independently() {
        let cases = [
            (PromptKind::Comparison, COMPARISON_FALLBACK),
            (PromptKind::Personas, PERSONA_FALLBACK),
            (PromptKind::PriceTrend, PRICE_TREND_FALLBACK),
            (PromptKind::PriceTracker, PRICE_TRACKER_FALLBACK),
        ];

        for (failing, fallback) in cases {
            let backend = ScriptedBackend::new().failing(failing);
            let bundle = recommend(&backend, "running shoes", "$100").await.unwrap();
            assert_eq!(backend.calls().len(), 5);

            let fields = [
                (PromptKind::Comparison, &bundle.comparison_markdown),
                (PromptKind::Personas, &bundle.persona_markdown),
                (PromptKind::PriceTrend, &bundle.price_trend_markdown),
                (PromptKind::PriceTracker, &bundle.price_tracker_markdown),
            ];
            for (kind, value) in fields {
                if kind == failing {
                    assert_eq!(value, fallback);
                } else {
                    assert_eq!(*value, ScriptedBackend::reply_for(kind));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_stage_inputs() {
        let backend = ScriptedBackend::new();
        recommend(&backend, "running shoes", "$100").await.unwrap();
        let recommendations = ScriptedBackend::reply_for(PromptKind::Recommendations);

        for call in backend.calls() {
            match call.kind {
                PromptKind::Recommendations => {
                    assert!(call.prompt.contains("'running shoes'"));
                    assert!(call.prompt.contains("'$100'"));
                }
                PromptKind::Comparison | PromptKind::Personas => {
                    assert!(call.prompt.contains(&recommendations));
                }
                PromptKind::PriceTrend | PromptKind::PriceTracker => {
                    assert!(call.prompt.contains("running shoes"));
                    assert!(!call.prompt.contains(&recommendations));
                }
                PromptKind::FollowUp => panic!("unexpected follow-up call"),
            }
        }
    }

    #[tokio::test]
    async fn test_follow_up() {
        let backend = ScriptedBackend::new();
        let answer = answer_follow_up(&backend, "### Road Glide", "Is it light?")
            .await
            .unwrap();
        assert_eq!(answer, "follow_up output");

        let failing = ScriptedBackend::new().failing(PromptKind::FollowUp);
        assert!(answer_follow_up(&failing, "c", "q").await.is_err());
    }
}
