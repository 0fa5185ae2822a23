use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row of the `jobs` table. List columns are native JSONB.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub responsibilities: Json<Vec<String>>,
    pub requirements: Json<Vec<String>>,
    pub raw_jd_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view: identity and headline fields only.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for JobSummary {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            company_name: row.company_name,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_row_serializes_lists_as_arrays() {
        let now = Utc::now();
        let row = JobRow {
            id: 1,
            job_title: "Backend Engineer".into(),
            company_name: "ABC".into(),
            location: "北京".into(),
            responsibilities: Json(vec!["build".into(), "run".into()]),
            requirements: Json(vec!["Rust".into()]),
            raw_jd_text: "raw".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["responsibilities"], serde_json::json!(["build", "run"]));
        assert_eq!(value["requirements"][0], "Rust");

        let summary = serde_json::to_value(JobSummary::from(row)).unwrap();
        assert!(summary.get("raw_jd_text").is_none());
        assert_eq!(summary["location"], "北京");
    }
}
