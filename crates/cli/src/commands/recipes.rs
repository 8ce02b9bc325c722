//! Recipe recommendations.

use handlekurv_app::{AppError, AppState, KeyValueStore, Result};

use crate::output;

/// Ask for a meal plan matching the stored profile.
pub async fn recommend<S: KeyValueStore>(
    state: &AppState<S>,
    suggestions: Option<u32>,
    tolerance: Option<f64>,
) -> Result<String> {
    let mut request = state.profile().recommendation_request().ok_or_else(|| {
        AppError::BadRequest(
            "no profile saved; run `handlekurv profile set` first".to_string(),
        )
    })?;
    request.suggestions = suggestions;
    request.tolerance = tolerance;

    let plan = state.catalog().recommend_recipes(&request).await?;
    Ok(output::recipes(&plan))
}
