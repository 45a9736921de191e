use serde::{Deserialize, Serialize};

/// A problem as returned by the Codeforces `problemset.problems` endpoint.
///
/// The catalog omits fields freely (old problems have no rating, gym problems
/// no contest id), so everything except `name` and `tags` is optional. The
/// wire format is camelCase both ways: we deserialize the catalog response
/// with this type and serialize it back out to our own clients unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problemset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Problem {
    /// Whether the record carries both identifiers needed to address it.
    pub fn has_identifiers(&self) -> bool {
        self.contest_id.is_some() && self.index.is_some()
    }

    /// The canonical problemset URL, when both identifiers are present.
    pub fn url(&self) -> Option<String> {
        match (self.contest_id, self.index.as_deref()) {
            (Some(contest_id), Some(index)) => Some(format!(
                "https://codeforces.com/problemset/problem/{contest_id}/{index}"
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(contest_id: Option<i64>, index: Option<&str>) -> Problem {
        Problem {
            contest_id,
            problemset_name: None,
            index: index.map(str::to_string),
            name: "Watermelon".to_string(),
            kind: Some("PROGRAMMING".to_string()),
            points: None,
            rating: Some(800),
            tags: vec!["math".to_string()],
        }
    }

    #[test]
    fn test_has_identifiers() {
        assert!(problem(Some(4), Some("A")).has_identifiers());
        assert!(!problem(None, Some("A")).has_identifiers());
        assert!(!problem(Some(4), None).has_identifiers());
    }

    #[test]
    fn test_url_construction() {
        assert_eq!(
            problem(Some(4), Some("A")).url().as_deref(),
            Some("https://codeforces.com/problemset/problem/4/A")
        );
        assert_eq!(problem(None, Some("A")).url(), None);
    }

    #[test]
    fn test_catalog_wire_format_round_trip() {
        let json = r#"{
            "contestId": 1400,
            "index": "B",
            "name": "RPG Protagonist",
            "type": "PROGRAMMING",
            "rating": 1500,
            "tags": ["binary search", "greedy", "math"]
        }"#;

        let parsed: Problem = serde_json::from_str(json).expect("catalog record should parse");
        assert_eq!(parsed.contest_id, Some(1400));
        assert_eq!(parsed.index.as_deref(), Some("B"));
        assert_eq!(parsed.rating, Some(1500));
        assert_eq!(parsed.tags.len(), 3);

        let out = serde_json::to_value(&parsed).expect("should serialize");
        assert_eq!(out["contestId"], 1400);
        assert_eq!(out["type"], "PROGRAMMING");
        // Absent optional fields stay absent instead of serializing as null.
        assert!(out.get("points").is_none());
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let parsed: Problem =
            serde_json::from_str(r#"{"name": "Untagged"}"#).expect("minimal record should parse");
        assert!(parsed.tags.is_empty());
        assert!(!parsed.has_identifiers());
    }
}
