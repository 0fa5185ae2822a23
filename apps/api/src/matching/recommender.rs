//! Match Recommender — asks the model to rank candidate jobs against a résumé analysis,
//! then normalizes whatever shape comes back.
//!
//! Malformed model output degrades to an empty or partial result set; only the input
//! precondition and gateway failures are errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::errors::AiError;
use crate::llm_client::prompts::with_json_rules;
use crate::llm_client::{invoke_json_mode, ModelGateway};
use crate::matching::prompts::MATCH_SYSTEM;

pub const MISSING_ANALYSIS: &str = "match analysis not provided";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecommendation {
    /// Echoed exactly as the model returned it.
    pub job_id: Value,
    /// Intended range 0–100; not clamped.
    pub match_score: f64,
    pub match_analysis: String,
    pub advantages: Vec<String>,
    pub challenges: Vec<String>,
    pub suggestions: Vec<String>,
}

impl MatchRecommendation {
    /// Integer view of `job_id` used to join against stored jobs.
    pub fn job_key(&self) -> Option<i64> {
        as_integer(&self.job_id)
    }
}

/// Ranks `candidate_jobs` for the candidate, best match first.
pub async fn recommend_jobs(
    gateway: &dyn ModelGateway,
    resume_analysis: &Value,
    desired_position: &str,
    desired_location: &str,
    candidate_jobs: &[Value],
) -> Result<Vec<MatchRecommendation>, AiError> {
    if is_blank(resume_analysis) || candidate_jobs.is_empty() {
        return Err(AiError::Precondition(
            "Resume data and jobs list cannot be empty".to_string(),
        ));
    }

    let envelope = json!({
        "resume_data": resume_analysis,
        "desired_position": desired_position,
        "desired_location": desired_location,
        "jobs": candidate_jobs,
    });

    let system = with_json_rules(MATCH_SYSTEM);
    let text = invoke_json_mode(gateway, &system, envelope.to_string())
        .await
        .map_err(|e| {
            error!("Error matching jobs: {e}");
            AiError::from(e).context("match jobs")
        })?;

    let recommendations = normalize_recommendations(&text);
    debug!(
        "Matched {} of {} candidate jobs",
        recommendations.len(),
        candidate_jobs.len()
    );
    Ok(recommendations)
}

/// Unwraps, filters, defaults and sorts raw model output.
pub(crate) fn normalize_recommendations(text: &str) -> Vec<MatchRecommendation> {
    let parsed = serde_json::from_str::<Value>(text).unwrap_or(Value::Array(Vec::new()));

    let items = match parsed {
        Value::Object(mut map) if map.contains_key("recommendations") => {
            map.remove("recommendations").unwrap_or_default()
        }
        other => other,
    };

    let Value::Array(items) = items else {
        return Vec::new();
    };

    let mut recommendations: Vec<MatchRecommendation> =
        items.iter().filter_map(recommendation_from_item).collect();

    // sort_by is stable: equal scores keep model order
    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations
}

fn recommendation_from_item(item: &Value) -> Option<MatchRecommendation> {
    let fields = item.as_object()?;
    let job_id = fields.get("job_id")?.clone();

    Some(MatchRecommendation {
        job_id,
        match_score: fields.get("match_score").and_then(as_number).unwrap_or(0.0),
        match_analysis: fields
            .get("match_analysis")
            .and_then(Value::as_str)
            .unwrap_or(MISSING_ANALYSIS)
            .to_string(),
        advantages: string_list(fields.get("advantages")),
        challenges: string_list(fields.get("challenges")),
        suggestions: string_list(fields.get("suggestions")),
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Null, empty object/array/string count as "no résumé data".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubGateway;
    use crate::llm_client::GatewayError;

    fn resume() -> Value {
        json!({"technical_analysis": {"tech_stack": ["Python", "Java"]}})
    }

    fn jobs() -> Vec<Value> {
        vec![json!({"id": 1, "title": "测试职位"})]
    }

    fn ids(result: &[MatchRecommendation]) -> Vec<Value> {
        result.iter().map(|r| r.job_id.clone()).collect()
    }

    #[tokio::test]
    async fn test_recommend_success() {
        let stub = StubGateway::replying(
            r#"[{
                "job_id": 1,
                "match_score": 85,
                "match_analysis": "技能匹配度高",
                "advantages": ["技术栈匹配", "经验充足"],
                "challenges": ["需要学习新技术"],
                "suggestions": ["提前了解项目架构"]
            }]"#,
        );
        let result = recommend_jobs(&stub, &resume(), "软件工程师", "北京", &jobs())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].job_id, 1);
        assert_eq!(result[0].match_score, 85.0);
        assert_eq!(result[0].match_analysis, "技能匹配度高");
        assert_eq!(result[0].advantages, vec!["技术栈匹配", "经验充足"]);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_user_message_is_json_envelope() {
        let stub = StubGateway::replying("[]");
        recommend_jobs(&stub, &resume(), "软件工程师", "北京", &jobs())
            .await
            .unwrap();

        let args = stub.last_arguments();
        assert_eq!(args.messages.len(), 2);
        let user = &args.messages[1].content;
        assert!(user.contains("北京"), "non-ASCII must not be escaped: {user}");

        let envelope: Value = serde_json::from_str(user).unwrap();
        assert_eq!(envelope["resume_data"], resume());
        assert_eq!(envelope["desired_position"], "软件工程师");
        assert_eq!(envelope["desired_location"], "北京");
        assert_eq!(envelope["jobs"], json!(jobs()));
    }

    #[tokio::test]
    async fn test_empty_jobs_fail_before_remote_call() {
        let stub = StubGateway::replying("[]");
        let err = recommend_jobs(&stub, &resume(), "p", "l", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Precondition(_)));
        assert_eq!(err.to_string(), "Resume data and jobs list cannot be empty");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_resume_fails_before_remote_call() {
        let stub = StubGateway::replying("[]");
        for blank in [json!({}), Value::Null] {
            let err = recommend_jobs(&stub, &blank, "p", "l", &jobs())
                .await
                .unwrap_err();
            assert!(matches!(err, AiError::Precondition(_)));
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_shape_yields_empty_result() {
        let stub = StubGateway::replying(r#"{"invalid": "format"}"#);
        let result = recommend_jobs(&stub, &resume(), "p", "l", &jobs())
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let stub = StubGateway::failing(GatewayError::Api {
            status: 401,
            body: "bad key".into(),
        });
        let err = recommend_jobs(&stub, &resume(), "p", "l", &jobs())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Upstream(_)));
        assert!(err.to_string().starts_with("Failed to match jobs: "));
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let result = normalize_recommendations(
            r#"[{"job_id": 1, "match_score": 60}, {"job_id": 2, "match_score": 90}]"#,
        );
        assert_eq!(ids(&result), vec![json!(2), json!(1)]);
        assert_eq!(result[0].match_score, 90.0);
    }

    #[test]
    fn test_ties_keep_model_order() {
        let result = normalize_recommendations(
            r#"[{"job_id": 3, "match_score": 70}, {"job_id": 1, "match_score": 80},
                {"job_id": 5, "match_score": 70}]"#,
        );
        assert_eq!(ids(&result), vec![json!(1), json!(3), json!(5)]);
    }

    #[test]
    fn test_recommendations_key_is_unwrapped() {
        let result = normalize_recommendations(
            r#"{"recommendations": [{"job_id": 7, "match_score": 50}]}"#,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].job_id, 7);
    }

    #[test]
    fn test_recommendations_key_with_non_list_is_empty() {
        assert!(normalize_recommendations(r#"{"recommendations": "none"}"#).is_empty());
    }

    #[test]
    fn test_items_without_job_id_are_dropped() {
        let result = normalize_recommendations(
            r#"[{"job_id": 1}, {"match_score": 99}, "text", 4, {"job_id": 2, "match_score": 10}]"#,
        );
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.job_id == 1 || r.job_id == 2));
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let result = normalize_recommendations(r#"[{"job_id": 4}]"#);
        assert_eq!(
            result[0],
            MatchRecommendation {
                job_id: json!(4),
                match_score: 0.0,
                match_analysis: MISSING_ANALYSIS.to_string(),
                advantages: vec![],
                challenges: vec![],
                suggestions: vec![],
            }
        );
    }

    #[test]
    fn test_score_is_not_clamped() {
        let result = normalize_recommendations(r#"[{"job_id": 1, "match_score": 140}]"#);
        assert_eq!(result[0].match_score, 140.0);
    }

    #[test]
    fn test_empty_or_unparseable_body_is_empty() {
        assert!(normalize_recommendations("").is_empty());
        assert!(normalize_recommendations("not json").is_empty());
    }

    #[test]
    fn test_numeric_string_ids_and_scores_are_accepted() {
        let result = normalize_recommendations(r#"[{"job_id": "12", "match_score": "75.5"}]"#);
        assert_eq!(result[0].job_id, json!("12"));
        assert_eq!(result[0].job_key(), Some(12));
        assert_eq!(result[0].match_score, 75.5);
    }

    #[test]
    fn test_present_job_id_is_kept_whatever_its_type() {
        let result = normalize_recommendations(
            r#"[{"job_id": null, "match_score": 40}, {"job_id": "J-7", "match_score": 30},
                {"job_id": 1.5, "match_score": 20}, {"job_id": 3, "match_score": 10}]"#,
        );

        assert_eq!(result.len(), 4);
        assert_eq!(
            ids(&result),
            vec![Value::Null, json!("J-7"), json!(1.5), json!(3)]
        );
        let keys: Vec<Option<i64>> = result.iter().map(|r| r.job_key()).collect();
        assert_eq!(keys, vec![None, None, None, Some(3)]);
    }
}
