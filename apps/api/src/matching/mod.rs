// Job matching: database pre-filter followed by model ranking.

pub mod handlers;
pub mod prompts;
pub mod recommender;
