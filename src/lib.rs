//! Broker Match - broker filtering and ranking engine
//!
//! Scores a broker catalog against a user's trading preferences and returns
//! a ranked, explained shortlist. Interactive requests are debounced; the
//! final submit path runs synchronously.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{BrokerFilterService, FilterError, FilterSettings, Ranker};
pub use models::{Broker, BrokerRecommendation, BrokerScore, MatchReason, UserPreferences};
