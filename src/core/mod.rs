// Core engine exports
pub mod debounce;
pub mod error;
pub mod filters;
pub mod ranker;
pub mod scoring;
pub mod service;

pub use debounce::Debouncer;
pub use error::FilterError;
pub use filters::{check_broker, is_jurisdiction_excluded};
pub use ranker::{Ranker, DEFAULT_RECOMMENDATION_LIMIT, INTERACTIVE_LIMIT};
pub use service::{BrokerFilterService, FilterSettings};
