use serde::{Deserialize, Serialize};
use crate::models::domain::{Broker, BrokerRecommendation, MatchReason};
use crate::services::CacheStats;

/// Response for the filter endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterBrokersResponse {
    pub brokers: Vec<Broker>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// One explained recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub broker: Broker,
    pub score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<MatchReason>,
    pub explanations: Vec<String>,
}

impl From<BrokerRecommendation> for RecommendationEntry {
    fn from(rec: BrokerRecommendation) -> Self {
        let explanations = rec.match_reasons.iter().map(ToString::to_string).collect();
        Self {
            broker: rec.broker,
            score: rec.score,
            match_reasons: rec.match_reasons,
            explanations,
        }
    }
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationEntry>,
}

/// Response for catalog listing and reload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub brokers: Vec<Broker>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "catalogSize")]
    pub catalog_size: usize,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
