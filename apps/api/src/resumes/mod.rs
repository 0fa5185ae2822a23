// Résumé intake: model-backed analysis stored alongside the raw text.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod store;
