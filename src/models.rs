//! Core data types: measured components, metrics, paging and branch context

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metrics indexed by key. Ordered so extra columns render in a stable order.
pub type MetricsMap = BTreeMap<String, Metric>;

/// Value type of a metric, drives formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Int,
    Float,
    Percent,
    Rating,
    WorkDur,
    Millisec,
    Level,
    Bool,
    Data,
    #[default]
    #[serde(other)]
    String,
}

/// A named, typed measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub metric_type: MetricType,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub higher_values_are_better: Option<bool>,
    #[serde(default)]
    pub hidden: bool,
}

impl Metric {
    pub fn new(key: &str, name: &str, metric_type: MetricType) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            metric_type,
            domain: None,
            higher_values_are_better: None,
            hidden: false,
        }
    }
}

/// Kind of component, as the analysis reports it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Qualifier {
    Project,
    Directory,
    File,
    UnitTestFile,
    View,
    SubView,
    Application,
    Other(String),
}

impl Qualifier {
    pub fn code(&self) -> &str {
        match self {
            Qualifier::Project => "TRK",
            Qualifier::Directory => "DIR",
            Qualifier::File => "FIL",
            Qualifier::UnitTestFile => "UTS",
            Qualifier::View => "VW",
            Qualifier::SubView => "SVW",
            Qualifier::Application => "APP",
            Qualifier::Other(code) => code,
        }
    }

    /// Whether opening a component of this kind shows children
    pub fn has_children(&self) -> bool {
        matches!(
            self,
            Qualifier::Project
                | Qualifier::Directory
                | Qualifier::View
                | Qualifier::SubView
                | Qualifier::Application
        )
    }

    /// Whether the component carries a public/private visibility
    pub fn has_visibility(&self) -> bool {
        matches!(
            self,
            Qualifier::Project | Qualifier::View | Qualifier::Application
        )
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Qualifier::Project => "◆",
            Qualifier::Directory => "▸",
            Qualifier::File => "·",
            Qualifier::UnitTestFile => "✓",
            Qualifier::View | Qualifier::SubView => "▣",
            Qualifier::Application => "▤",
            Qualifier::Other(_) => "?",
        }
    }
}

impl From<String> for Qualifier {
    fn from(code: String) -> Self {
        match code.as_str() {
            "TRK" => Qualifier::Project,
            "DIR" => Qualifier::Directory,
            "FIL" => Qualifier::File,
            "UTS" => Qualifier::UnitTestFile,
            "VW" => Qualifier::View,
            "SVW" => Qualifier::SubView,
            "APP" => Qualifier::Application,
            _ => Qualifier::Other(code),
        }
    }
}

impl From<Qualifier> for String {
    fn from(q: Qualifier) -> Self {
        q.code().to_string()
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One metric value on a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub best_value: bool,
}

/// A source-code entity annotated with metric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeasure {
    pub key: String,
    pub name: String,
    pub qualifier: Qualifier,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl ComponentMeasure {
    pub fn new(key: &str, name: &str, qualifier: Qualifier) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            qualifier,
            path: None,
            measures: Vec::new(),
        }
    }

    /// Builder: attach a measure value
    pub fn with_measure(mut self, metric: &str, value: &str) -> Self {
        self.measures.push(Measure {
            metric: metric.to_string(),
            value: Some(value.to_string()),
            best_value: false,
        });
        self
    }

    pub fn measure(&self, metric_key: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.metric == metric_key)
    }

    pub fn value(&self, metric_key: &str) -> Option<&str> {
        self.measure(metric_key).and_then(|m| m.value.as_deref())
    }

    /// Name shown in lists: the path when the component has one
    pub fn display_name(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// Pagination state: how many items were loaded out of how many exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_index: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Paging {
    /// Whether more items exist beyond `loaded`
    pub fn has_more(&self, loaded: usize) -> bool {
        loaded < self.total
    }

    pub fn next_page(&self) -> usize {
        self.page_index + 1
    }
}

/// The branch or pull request the measures belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchLike {
    Branch { name: String, is_main: bool },
    PullRequest { key: String, title: String },
}

impl BranchLike {
    pub fn label(&self) -> String {
        match self {
            BranchLike::Branch { name, .. } => name.clone(),
            BranchLike::PullRequest { key, title } if title.is_empty() => format!("#{key}"),
            BranchLike::PullRequest { key, title } => format!("#{key} {title}"),
        }
    }

    /// Query parameter selecting this branch-like, none for the main branch
    pub fn query_param(&self) -> Option<(&'static str, &str)> {
        match self {
            BranchLike::Branch { is_main: true, .. } => None,
            BranchLike::Branch { name, .. } => Some(("branch", name)),
            BranchLike::PullRequest { key, .. } => Some(("pullRequest", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifier_codes() {
        assert_eq!(Qualifier::from("DIR".to_string()), Qualifier::Directory);
        assert_eq!(Qualifier::from("FIL".to_string()), Qualifier::File);
        assert_eq!(
            Qualifier::from("BRC".to_string()),
            Qualifier::Other("BRC".to_string())
        );
        assert_eq!(Qualifier::Other("BRC".to_string()).code(), "BRC");
        assert!(Qualifier::Directory.has_children());
        assert!(!Qualifier::File.has_children());
    }

    #[test]
    fn test_component_deserialize() {
        let json = r#"{
            "key": "proj:src/main.rs",
            "name": "main.rs",
            "qualifier": "FIL",
            "path": "src/main.rs",
            "measures": [{"metric": "coverage", "value": "87.5", "bestValue": false}]
        }"#;
        let c: ComponentMeasure = serde_json::from_str(json).unwrap();
        assert_eq!(c.qualifier, Qualifier::File);
        assert_eq!(c.value("coverage"), Some("87.5"));
        assert_eq!(c.display_name(), "src/main.rs");
        assert!(c.value("ncloc").is_none());
    }

    #[test]
    fn test_metric_type_unknown_falls_back() {
        let m: Metric =
            serde_json::from_str(r#"{"key":"x","name":"X","type":"DISTRIB"}"#).unwrap();
        assert_eq!(m.metric_type, MetricType::String);
        let m: Metric =
            serde_json::from_str(r#"{"key":"d","name":"Debt","type":"WORK_DUR"}"#).unwrap();
        assert_eq!(m.metric_type, MetricType::WorkDur);
    }

    #[test]
    fn test_paging_has_more() {
        let paging = Paging {
            page_index: 1,
            page_size: 2,
            total: 5,
        };
        assert!(paging.has_more(2));
        assert!(!paging.has_more(5));
        assert_eq!(paging.next_page(), 2);
    }

    #[test]
    fn test_branch_like_query_param() {
        let main = BranchLike::Branch {
            name: "main".into(),
            is_main: true,
        };
        assert_eq!(main.query_param(), None);

        let feature = BranchLike::Branch {
            name: "feature/x".into(),
            is_main: false,
        };
        assert_eq!(feature.query_param(), Some(("branch", "feature/x")));

        let pr = BranchLike::PullRequest {
            key: "42".into(),
            title: "Fix it".into(),
        };
        assert_eq!(pr.query_param(), Some(("pullRequest", "42")));
        assert_eq!(pr.label(), "#42 Fix it");
    }
}
