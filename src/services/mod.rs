pub mod curriculum;
pub mod exercise;
pub mod profile;
pub mod progress;
pub mod quiz;
pub mod recommendation;
pub mod signals;

pub use recommendation::{RecommendationOptions, RecommendationService};
