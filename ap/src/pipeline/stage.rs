//! Shared stage driver: render, call, validate, retry once

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::StageConfig;
use crate::llm::{CompletionRequest, LlmClient, Message, ResponseFormat};
use crate::prompts::{PromptContext, PromptLoader};
use crate::schema::{Document, SchemaValidationError, parse_document};

use super::StageError;

/// Suffix appended to the constraints for the single retry
pub const STRICT_JSON_SUFFIX: &str = " STRICT JSON ONLY.";

/// The three pipeline stages, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Research,
    Plan,
    Assets,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Research, Stage::Plan, Stage::Assets];

    /// Template name (the system directive is `{name}-system`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Plan => "plan",
            Self::Assets => "assets",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Research => 0,
            Self::Plan => 1,
            Self::Assets => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Research => "Research",
            Self::Plan => "Plan",
            Self::Assets => "Assets",
        };
        write!(f, "{}", label)
    }
}

/// Use `value` unless it is empty; the value is passed through untouched
pub(crate) fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Run one stage invocation with the one-retry policy
///
/// A schema violation earns exactly one more attempt with
/// [`STRICT_JSON_SUFFIX`] appended to the constraints. Transport and template
/// errors are returned immediately.
pub(crate) async fn generate<T: Document>(
    llm: &dyn LlmClient,
    prompts: &PromptLoader,
    stage: Stage,
    config: &StageConfig,
    mut context: PromptContext,
) -> Result<T, StageError> {
    debug!(%stage, "generate: called");
    match attempt::<T>(llm, prompts, stage, config, &context).await {
        Err(StageError::SchemaValidation(e)) => {
            warn!(%stage, path = %e.path, error = %e, "generate: invalid response, retrying once");
            context.constraints.push_str(STRICT_JSON_SUFFIX);
            let result = attempt::<T>(llm, prompts, stage, config, &context).await;
            if let Err(e) = &result {
                warn!(%stage, error = %e, "generate: retry failed");
            }
            result
        }
        other => other,
    }
}

async fn attempt<T: Document>(
    llm: &dyn LlmClient,
    prompts: &PromptLoader,
    stage: Stage,
    config: &StageConfig,
    context: &PromptContext,
) -> Result<T, StageError> {
    debug!(%stage, "attempt: called");
    let system_prompt = prompts
        .render(&format!("{}-system", stage.name()), context)
        .map_err(|e| StageError::Template(e.to_string()))?;
    let user_prompt = prompts
        .render(stage.name(), context)
        .map_err(|e| StageError::Template(e.to_string()))?;

    let request = CompletionRequest {
        system_prompt,
        messages: vec![Message::user(user_prompt)],
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
        response_format: ResponseFormat::JsonObject,
    };

    let response = llm.complete(request).await?;
    info!(
        %stage,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        stop_reason = ?response.stop_reason,
        "attempt: response received"
    );

    let text = response
        .content
        .ok_or_else(|| SchemaValidationError::new(T::NAME, "$", "empty response"))?;
    Ok(parse_document::<T>(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StagesConfig;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, LlmError};
    use crate::schema::AssetsDoc;
    use crate::schema::fixtures::assets_json;

    fn context() -> PromptContext {
        PromptContext {
            goal: "Launch a podcast in 2 weeks".to_string(),
            audience: "general".to_string(),
            constraints: "concise, friendly".to_string(),
            plan_json: Some("{}".to_string()),
            research_summary: None,
        }
    }

    fn config() -> StageConfig {
        StagesConfig::default().assets
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default("", "general"), "general");
        assert_eq!(or_default("   ", "general"), "   ");
        assert_eq!(or_default(" students ", "general"), " students ");
    }

    #[test]
    fn test_stage_order_and_names() {
        let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["research", "plan", "assets"]);
        assert_eq!(Stage::Plan.to_string(), "Plan");
    }

    #[tokio::test]
    async fn test_generate_valid_first_time() {
        let llm = MockLlmClient::with_texts(vec![assets_json().to_string()]);
        let prompts = PromptLoader::embedded_only();

        let doc: AssetsDoc = generate(&llm, &prompts, Stage::Assets, &config(), context())
            .await
            .unwrap();

        assert_eq!(doc.social_posts.len(), 3);
        assert_eq!(llm.call_count(), 1);

        let request = &llm.requests()[0];
        assert_eq!(request.response_format, ResponseFormat::JsonObject);
        assert_eq!(request.temperature, Some(0.3));
        assert!(!request.messages[0].content.contains("STRICT JSON ONLY"));
    }

    #[tokio::test]
    async fn test_generate_retries_once_with_strict_suffix() {
        let llm = MockLlmClient::with_texts(vec!["not json at all".to_string(), assets_json().to_string()]);
        let prompts = PromptLoader::embedded_only();

        let doc: AssetsDoc = generate(&llm, &prompts, Stage::Assets, &config(), context())
            .await
            .unwrap();

        assert_eq!(doc.social_posts.len(), 3);
        assert_eq!(llm.call_count(), 2);
        let requests = llm.requests();
        assert!(requests[1].messages[0].content.contains("concise, friendly STRICT JSON ONLY."));
    }

    #[tokio::test]
    async fn test_generate_gives_up_after_second_invalid() {
        let llm = MockLlmClient::with_texts(vec!["{}", "{}", "{}"]);
        let prompts = PromptLoader::embedded_only();

        let err = generate::<AssetsDoc>(&llm, &prompts, Stage::Assets, &config(), context())
            .await
            .unwrap_err();

        assert!(err.is_schema());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_transport_errors() {
        let llm = MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 500,
                message: "boom".to_string(),
            }),
            Ok(CompletionResponse::text(assets_json().to_string())),
        ]);
        let prompts = PromptLoader::embedded_only();

        let err = generate::<AssetsDoc>(&llm, &prompts, Stage::Assets, &config(), context())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "transport");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_schema_failure() {
        let empty = CompletionResponse {
            content: None,
            ..CompletionResponse::text("")
        };
        let llm = MockLlmClient::new(vec![Ok(empty.clone()), Ok(empty)]);
        let prompts = PromptLoader::embedded_only();

        let err = generate::<AssetsDoc>(&llm, &prompts, Stage::Assets, &config(), context())
            .await
            .unwrap_err();

        assert!(err.is_schema());
        assert_eq!(llm.call_count(), 2);
    }
}
