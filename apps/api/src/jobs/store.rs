//! Persistence for job postings.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::jobs::extractor::JobExtraction;
use crate::models::job::JobRow;

pub const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 100;
/// Upper bound on jobs forwarded to the recommender.
pub const MATCH_CANDIDATE_LIMIT: i64 = 20;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub job_title: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            total,
            pages,
            current_page: page,
            per_page,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// Normalizes client-supplied paging parameters.
pub fn page_bounds(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.filter(|p| *p >= 1).unwrap_or(1);
    let per_page = per_page
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PER_PAGE)
        .min(MAX_PER_PAGE);
    (page, per_page)
}

/// `%term%` with LIKE metacharacters escaped; `None` for blank input.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

pub async fn insert_job(
    pool: &PgPool,
    extraction: &JobExtraction,
    raw_jd_text: &str,
) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (job_title, company_name, location, responsibilities, requirements, raw_jd_text)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&extraction.job_title)
    .bind(&extraction.company_name)
    .bind(&extraction.location)
    .bind(Json(extraction.responsibilities.clone()))
    .bind(Json(extraction.requirements.clone()))
    .bind(raw_jd_text)
    .fetch_one(pool)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Newest-first page of jobs matching the optional title/location substrings.
pub async fn list_jobs(
    pool: &PgPool,
    filter: &JobFilter,
    page: i64,
    per_page: i64,
) -> Result<(Vec<JobRow>, Pagination), sqlx::Error> {
    let title = contains_pattern(filter.job_title.as_deref());
    let location = contains_pattern(filter.location.as_deref());

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM jobs
        WHERE ($1::text IS NULL OR job_title ILIKE $1)
          AND ($2::text IS NULL OR location ILIKE $2)
        "#,
    )
    .bind(&title)
    .bind(&location)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE ($1::text IS NULL OR job_title ILIKE $1)
          AND ($2::text IS NULL OR location ILIKE $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(&title)
    .bind(&location)
    .bind(per_page)
    .bind((page - 1) * per_page)
    .fetch_all(pool)
    .await?;

    Ok((rows, Pagination::new(total, page, per_page)))
}

/// Database pre-filter ahead of model matching: title substring OR exact location.
pub async fn find_match_candidates(
    pool: &PgPool,
    desired_position: &str,
    desired_location: &str,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE job_title ILIKE $1 OR location = $2
        ORDER BY id
        LIMIT $3
        "#,
    )
    .bind(contains_pattern(Some(desired_position)).unwrap_or_else(|| "%".to_string()))
    .bind(desired_location)
    .bind(MATCH_CANDIDATE_LIMIT)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_envelope() {
        let p = Pagination::new(25, 2, 10);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let last = Pagination::new(25, 3, 10);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_empty_table() {
        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_page_bounds_defaults_and_clamps() {
        assert_eq!(page_bounds(None, None), (1, DEFAULT_PER_PAGE));
        assert_eq!(page_bounds(Some(0), Some(-5)), (1, DEFAULT_PER_PAGE));
        assert_eq!(page_bounds(Some(4), Some(1000)), (4, MAX_PER_PAGE));
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(Some("Rust")), Some("%Rust%".to_string()));
        assert_eq!(contains_pattern(Some("100%_")), Some("%100\\%\\_%".to_string()));
        assert_eq!(contains_pattern(Some("  ")), None);
        assert_eq!(contains_pattern(None), None);
    }

    #[test]
    fn test_extracted_text_columns_are_unbounded() {
        let schema = include_str!("../../migrations/0001_users_and_jobs.sql");
        let jobs_table = &schema[schema.find("CREATE TABLE IF NOT EXISTS jobs").unwrap()..];
        let jobs_table = &jobs_table[..jobs_table.find(");").unwrap()];

        for column in ["job_title", "company_name", "location"] {
            let line = jobs_table
                .lines()
                .find(|l| l.trim_start().starts_with(column))
                .unwrap();
            assert!(line.contains("TEXT NOT NULL"), "{line}");
        }
        assert!(!jobs_table.contains("VARCHAR"));
    }
}
