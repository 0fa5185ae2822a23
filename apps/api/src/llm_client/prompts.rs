// Shared prompt fragments.
// Each feature module that calls the model defines its own prompts.rs alongside it
// and splices these fragments in via `with_json_rules`.

/// Instruction block enforcing a single JSON value as the whole response.
pub const JSON_OBJECT_RULES: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Write every free-text value in the same language as the user's input.";

/// Replaces the `{json_rules}` placeholder in a system prompt template.
pub fn with_json_rules(template: &str) -> String {
    template.replace("{json_rules}", JSON_OBJECT_RULES)
}
