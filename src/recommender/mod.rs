pub mod config;
pub mod engine;
pub mod mastery;
pub mod types;

pub use config::RecommendationWeights;
pub use engine::{choose_recommendation, RecommendationEngine};
pub use mastery::mastery_score;
pub use types::*;
