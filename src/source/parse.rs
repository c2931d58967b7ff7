use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::store::{Weight, Weighted};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeightMetric {
    #[default]
    Stars,
    Forks,
    Watchers,
}

impl WeightMetric {
    pub const ALL: [Self; 3] = [Self::Stars, Self::Forks, Self::Watchers];

    pub fn label(self) -> &'static str {
        match self {
            Self::Stars => "stargazers_count",
            Self::Forks => "forks_count",
            Self::Watchers => "watchers_count",
        }
    }
}

/// One repository from a GitHub search response; the payload of every bubble.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: f64,
    #[serde(default)]
    pub forks_count: f64,
    #[serde(default)]
    pub watchers_count: f64,
}

impl Repository {
    pub fn metric(&self, metric: WeightMetric) -> f64 {
        match metric {
            WeightMetric::Stars => self.stargazers_count,
            WeightMetric::Forks => self.forks_count,
            WeightMetric::Watchers => self.watchers_count,
        }
    }
}

/// Parses a saved search response (`{"items": [...]}`) or a bare array of
/// repositories. Entries that do not deserialize, or whose metric is not a
/// valid weight, are skipped.
pub fn parse_search_response(
    raw: &str,
    metric: WeightMetric,
) -> Result<Vec<Weighted<Repository>>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in search results")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("search response has no `items` array"))?,
        _ => return Err(anyhow!("unexpected JSON type in search results")),
    };

    let mut repositories = Vec::with_capacity(entries.len());
    for (position, value) in entries.iter().enumerate() {
        let repository = match Repository::deserialize(value) {
            Ok(repository) => repository,
            Err(error) => {
                warn!(position, %error, "skipping malformed search result");
                continue;
            }
        };

        match Weight::new(repository.metric(metric)) {
            Ok(weight) => repositories.push(Weighted::new(weight, repository)),
            Err(error) => {
                warn!(position, name = %repository.full_name, %error, "skipping search result");
            }
        }
    }

    Ok(repositories)
}

/// The `query` field some saved responses carry next to `items`.
pub(super) fn embedded_query(raw: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    parsed
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RESPONSE: &str = r#"{
        "total_count": 3,
        "incomplete_results": false,
        "query": "bubble",
        "items": [
            {
                "name": "alpha",
                "full_name": "octo/alpha",
                "description": "first",
                "html_url": "https://github.com/octo/alpha",
                "stargazers_count": 120,
                "forks_count": 4,
                "watchers_count": 120
            },
            { "name": "beta", "full_name": "octo/beta", "stargazers_count": 7 },
            { "name": 5 },
            { "name": "gamma", "stargazers_count": -2 }
        ]
    }"#;

    #[test]
    fn parses_items_with_selected_metric() {
        let stars = parse_search_response(RESPONSE, WeightMetric::Stars).unwrap();
        let summary = stars
            .iter()
            .map(|entry| (entry.payload.name.as_str(), entry.weight.get()))
            .collect::<Vec<_>>();
        assert_eq!(summary, vec![("alpha", 120.0), ("beta", 7.0)]);
        assert_eq!(stars[1].payload.description, None);

        let forks = parse_search_response(RESPONSE, WeightMetric::Forks).unwrap();
        assert_eq!(forks[0].weight.get(), 4.0);
        assert_eq!(forks[1].weight.get(), 0.0);
    }

    #[test]
    fn accepts_bare_array() {
        let parsed =
            parse_search_response(r#"[{"name": "solo", "watchers_count": 3}]"#, WeightMetric::Watchers)
                .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].weight.get(), 3.0);
    }

    #[test]
    fn rejects_documents_without_items() {
        assert!(parse_search_response(r#"{"message": "rate limited"}"#, WeightMetric::Stars).is_err());
        assert!(parse_search_response("42", WeightMetric::Stars).is_err());
        assert!(parse_search_response("{", WeightMetric::Stars).is_err());
    }

    #[test]
    fn reads_embedded_query() {
        assert_eq!(embedded_query(RESPONSE).as_deref(), Some("bubble"));
        assert_eq!(embedded_query("[]"), None);
    }
}
