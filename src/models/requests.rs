use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::UserPreferences;

/// Request for explained recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub preferences: UserPreferences,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
