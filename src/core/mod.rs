// Core algorithm exports
pub mod keywords;
pub mod matcher;
pub mod scoring;

pub use keywords::{extract_keywords, score_resume};
pub use matcher::Matcher;
pub use scoring::{calculate_match_score, FactorScores};
