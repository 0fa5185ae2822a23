// Job module LLM prompt templates.

/// System prompt for job-description extraction. `{json_rules}` is spliced in
/// by `llm_client::prompts::with_json_rules`.
pub const JD_EXTRACT_SYSTEM: &str = r#"You are a professional job-posting extraction assistant.
Extract the following key information from the job description text and return it as a JSON object:
{
    "job_title": "job title",
    "company_name": "company name",
    "location": "work location",
    "responsibilities": ["responsibility 1", "responsibility 2", ...],
    "requirements": ["requirement 1", "requirement 2", ...]
}

Make sure every field has a value. If some information is not stated explicitly in the text, infer it reasonably from context.
{json_rules}"#;
