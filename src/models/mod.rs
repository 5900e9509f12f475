// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AssetClass, Broker, BrokerRecommendation, BrokerScore, DepositBand, ExperienceLevel,
    FeePreference, MatchReason, TradingFrequency, UserPreferences,
};
pub use requests::RecommendationsRequest;
pub use responses::{
    CatalogResponse, ErrorResponse, FilterBrokersResponse, HealthResponse, RecommendationEntry,
    RecommendationsResponse,
};
