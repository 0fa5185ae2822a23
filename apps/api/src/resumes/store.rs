use anyhow::Context;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::resumes::analyzer::ResumeAnalysis;

/// Stores the analysis, and the résumé text when given, in one statement.
pub async fn save_resume_analysis(
    pool: &PgPool,
    user_id: i64,
    resume_text: Option<&str>,
    analysis: &ResumeAnalysis,
) -> Result<serde_json::Value, AppError> {
    let parsed = serde_json::to_value(analysis).context("failed to serialize resume analysis")?;

    sqlx::query(
        r#"
        UPDATE users
        SET resume_text = COALESCE($1, resume_text),
            resume_parsed_data = $2,
            updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(resume_text)
    .bind(&parsed)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(parsed)
}
