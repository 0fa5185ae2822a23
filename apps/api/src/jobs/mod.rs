// Job postings: model-backed JD extraction, storage and listing.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod store;
