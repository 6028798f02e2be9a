use crate::error::AnalyzeError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Full URL of the analysis endpoint for this service.
    pub fn endpoint(&self) -> String {
        format!("{}/api/analyze", self.base_url.trim_end_matches('/'))
    }
}

/// Payload sent to `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub query: String,
    // Always sent, empty when the user gave no context.
    pub user_information: String,
}

impl AnalysisRequest {
    /// Build a request from raw form input. Returns `None` when the query is blank.
    pub fn new(query: &str, user_information: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            user_information: user_information.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub professional_summary: String,
    pub personal_background: String,
    pub interesting_facts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub profile_url: String,
    pub insights: Insights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_ground: Option<String>,
}

impl AnalysisResult {
    /// Common ground text, if the service produced a non-blank one.
    pub fn common_ground(&self) -> Option<&str> {
        self.common_ground
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Events emitted by the run controller and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Dispatched {
        query: String,
    },
    Resolved {
        outcome: Result<AnalysisResult, AnalyzeError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_trims_query_but_keeps_context_verbatim() {
        let req = AnalysisRequest::new("  Jane Doe Acme  ", "  I like sailing ").unwrap();
        assert_eq!(req.query, "Jane Doe Acme");
        assert_eq!(req.user_information, "  I like sailing ");
    }

    #[test]
    fn request_rejects_blank_query() {
        assert!(AnalysisRequest::new("", "ctx").is_none());
        assert!(AnalysisRequest::new(" \t\n ", "").is_none());
    }

    #[test]
    fn request_serializes_wire_shape() {
        let req = AnalysisRequest::new("Jane", "").unwrap();
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, json!({"query": "Jane", "user_information": ""}));
    }

    #[test]
    fn result_parses_without_common_ground() {
        let body = json!({
            "profile_url": "https://example.com/in/jane",
            "insights": {
                "professional_summary": "Engineer.",
                "personal_background": "Grew up by the sea.",
                "interesting_facts": ["b", "a", "c"]
            }
        });
        let r: AnalysisResult = serde_json::from_value(body).unwrap();
        assert_eq!(r.insights.interesting_facts, vec!["b", "a", "c"]);
        assert!(r.common_ground.is_none());
        assert!(r.common_ground().is_none());
    }

    #[test]
    fn result_treats_null_and_blank_common_ground_as_absent() {
        let mut body = json!({
            "profile_url": "u",
            "insights": {
                "professional_summary": "s",
                "personal_background": "b",
                "interesting_facts": []
            },
            "common_ground": null
        });
        let r: AnalysisResult = serde_json::from_value(body.clone()).unwrap();
        assert!(r.common_ground().is_none());

        body["common_ground"] = json!("   ");
        let r: AnalysisResult = serde_json::from_value(body).unwrap();
        assert!(r.common_ground().is_none());
    }

    #[test]
    fn result_requires_every_insight_field() {
        let body = json!({
            "profile_url": "u",
            "insights": {
                "personal_background": "b",
                "interesting_facts": []
            }
        });
        assert!(serde_json::from_value::<AnalysisResult>(body).is_err());
    }

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let cfg = ClientConfig {
            base_url: "http://localhost:8000/".into(),
            timeout: Duration::from_secs(1),
            user_agent: "t".into(),
        };
        assert_eq!(cfg.endpoint(), "http://localhost:8000/api/analyze");
    }
}
