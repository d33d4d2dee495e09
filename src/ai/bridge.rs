use super::prompts::{ReviewCounts, import_prompt, import_response_schema, review_prompt};
use super::{AiError, GenerateRequest, LanguageModel};
use crate::model::task::{ImportItem, Task};

/// Shown when an import fails for any reason
pub const IMPORT_FAILED_MESSAGE: &str = "AI Processing Failed. Please check your API Key.";
/// Review text when the model answered with nothing
pub const REVIEW_EMPTY_FALLBACK: &str = "Could not generate review.";
/// Review text when the request itself failed
pub const REVIEW_FAILED_FALLBACK: &str = "Failed to generate review.";

/// Turn free-form notes into import items. An empty answer is an empty list;
/// anything that is not a JSON array of items is an error.
pub fn parse_tasks_from_text(
    model: &dyn LanguageModel,
    text: &str,
) -> Result<Vec<ImportItem>, AiError> {
    let request = GenerateRequest::json(import_prompt(text), import_response_schema());
    let answer = model.generate(&request)?;
    let json = strip_code_fence(answer.trim());
    if json.is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<ImportItem> = serde_json::from_str(json).map_err(|e| AiError::Parse {
        message: e.to_string(),
        raw: answer.clone(),
    })?;
    tracing::info!(count = items.len(), "AI import parsed");
    Ok(items)
}

/// A short coaching summary of the board. Never fails; see the fallbacks.
pub fn generate_weekly_review(model: &dyn LanguageModel, tasks: &[Task]) -> String {
    let counts = ReviewCounts::from_tasks(tasks);
    match model.generate(&GenerateRequest::text(review_prompt(&counts))) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(AiError::EmptyCandidate) => REVIEW_EMPTY_FALLBACK.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "weekly review failed");
            REVIEW_FAILED_FALLBACK.to_string()
        }
    }
}

/// Models sometimes wrap JSON in a markdown fence even when asked not to
fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
