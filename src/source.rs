//! Measure sources
//!
//! A [`MeasureSource`] answers "the children of component K, with measures for
//! metrics M, page P". [`FileSource`] serves a JSON fixture; [`HttpSource`]
//! queries the `api/measures/component_tree` web service.

use std::path::Path;

use serde::Deserialize;

use crate::component::{Analysis, ComponentInfo, Organization, RawComponent, project_component};
use crate::error::{MeasuresError, Result};
use crate::models::{BranchLike, ComponentMeasure, Metric, MetricsMap, Paging};

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeQuery {
    pub component: String,
    pub metric_keys: Vec<String>,
    pub branch_like: Option<BranchLike>,
    pub page_size: usize,
}

impl TreeQuery {
    /// Same query, rooted at another component
    pub fn for_component(&self, component: &str) -> Self {
        Self {
            component: component.to_string(),
            ..self.clone()
        }
    }
}

/// One page of children of a base component
#[derive(Debug, Clone, PartialEq)]
pub struct TreePage {
    pub base_component: ComponentMeasure,
    pub components: Vec<ComponentMeasure>,
    pub metrics: MetricsMap,
    pub paging: Paging,
    pub info: Option<ComponentInfo>,
}

pub trait MeasureSource {
    /// Fetch page `page` (1-based) of the children of `query.component`
    fn fetch_page(&self, query: &TreeQuery, page: usize) -> Result<TreePage>;

    /// Human readable origin, for logs and the header
    fn describe(&self) -> String;
}

fn metrics_map(metrics: Vec<Metric>, keys: &[String]) -> MetricsMap {
    metrics
        .into_iter()
        .filter(|m| keys.is_empty() || keys.contains(&m.key))
        .map(|m| (m.key.clone(), m))
        .collect()
}

fn keep_metrics(mut component: ComponentMeasure, keys: &[String]) -> ComponentMeasure {
    if !keys.is_empty() {
        component.measures.retain(|m| keys.contains(&m.metric));
    }
    component
}

// ==================== File source ====================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    organization: Organization,
    #[serde(default)]
    analysis: Option<Analysis>,
    #[serde(default)]
    metrics: Vec<Metric>,
    components: Vec<RawComponent>,
}

/// Serves measures from a JSON fixture
#[derive(Debug, Clone)]
pub struct FileSource {
    origin: String,
    fixture: Fixture,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MeasuresError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        let fixture = serde_json::from_str(content).map_err(|source| MeasuresError::Json {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self {
            origin: origin.to_string(),
            fixture,
        })
    }

    /// Key of the first project in the fixture, used when none is given
    pub fn default_component(&self) -> Option<&str> {
        self.fixture
            .components
            .iter()
            .find(|c| c.qualifier.has_children() && parent_path(c).is_empty())
            .map(|c| c.key.as_str())
    }

    fn find(&self, key: &str) -> Result<&RawComponent> {
        self.fixture
            .components
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| MeasuresError::ComponentNotFound(key.to_string()))
    }
}

fn parent_path(component: &RawComponent) -> &str {
    component.path.as_deref().unwrap_or("")
}

/// Whether `child` sits directly under `parent`, judged by path
fn is_direct_child(parent: &RawComponent, child: &RawComponent) -> bool {
    let Some(path) = child.path.as_deref().filter(|p| !p.is_empty()) else {
        return false;
    };
    if child.key == parent.key {
        return false;
    }
    let base = parent_path(parent);
    let rest = if base.is_empty() {
        Some(path)
    } else {
        path.strip_prefix(base).and_then(|r| r.strip_prefix('/'))
    };
    rest.is_some_and(|r| !r.is_empty() && !r.contains('/'))
}

impl MeasureSource for FileSource {
    fn fetch_page(&self, query: &TreeQuery, page: usize) -> Result<TreePage> {
        let base = self.find(&query.component)?;
        let children: Vec<&RawComponent> = self
            .fixture
            .components
            .iter()
            .filter(|c| is_direct_child(base, c))
            .collect();

        let page = page.max(1);
        let page_size = query.page_size.max(1);
        let components = children
            .iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|c| keep_metrics(c.to_measure(), &query.metric_keys))
            .collect();

        let info = project_component(
            base,
            &self.fixture.organization,
            self.fixture.analysis.as_ref(),
        )?;

        tracing::debug!(
            component = %query.component,
            page,
            total = children.len(),
            "served page from fixture"
        );

        Ok(TreePage {
            base_component: keep_metrics(base.to_measure(), &query.metric_keys),
            components,
            metrics: metrics_map(self.fixture.metrics.clone(), &query.metric_keys),
            paging: Paging {
                page_index: page,
                page_size,
                total: children.len(),
            },
            info: Some(info),
        })
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

// ==================== HTTP source ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentTreeResponse {
    paging: Paging,
    base_component: ComponentMeasure,
    #[serde(default)]
    components: Vec<ComponentMeasure>,
    #[serde(default)]
    metrics: Vec<Metric>,
}

/// Queries a server's `api/measures/component_tree`
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/measures/component_tree", self.base_url)
    }
}

impl MeasureSource for HttpSource {
    fn fetch_page(&self, query: &TreeQuery, page: usize) -> Result<TreePage> {
        let url = self.endpoint();
        let http_err = |source| MeasuresError::Http {
            url: url.clone(),
            source: Box::new(source),
        };

        let mut request = ureq::get(&url)
            .header("User-Agent", "measures-cli")
            .query("component", &query.component)
            .query("metricKeys", query.metric_keys.join(","))
            .query("additionalFields", "metrics")
            .query("strategy", "children")
            .query("p", page.max(1).to_string())
            .query("ps", query.page_size.to_string());
        if let Some((name, value)) = query.branch_like.as_ref().and_then(BranchLike::query_param) {
            request = request.query(name, value);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        tracing::info!(%url, component = %query.component, page, "fetching component tree");
        let mut response = request.call().map_err(http_err)?;
        let body: ComponentTreeResponse = response.body_mut().read_json().map_err(http_err)?;

        Ok(TreePage {
            base_component: body.base_component,
            components: body.components,
            metrics: metrics_map(body.metrics, &query.metric_keys),
            paging: body.paging,
            info: None,
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Qualifier;

    pub(crate) const FIXTURE: &str = r#"{
        "organization": {"uuid": "org-1", "key": "acme"},
        "analysis": {"createdAt": "2024-03-01T10:00:00Z", "projectVersion": "1.0"},
        "metrics": [
            {"key": "coverage", "name": "Coverage", "type": "PERCENT", "higherValuesAreBetter": true},
            {"key": "ncloc", "name": "Lines of Code", "type": "INT"}
        ],
        "components": [
            {"key": "acme:app", "name": "App", "qualifier": "TRK", "organizationUuid": "org-1",
             "measures": [{"metric": "coverage", "value": "80.0"}, {"metric": "ncloc", "value": "1200"}]},
            {"key": "acme:app:src", "name": "src", "qualifier": "DIR", "organizationUuid": "org-1", "path": "src",
             "measures": [{"metric": "coverage", "value": "75.0"}]},
            {"key": "acme:app:README.md", "name": "README.md", "qualifier": "FIL", "organizationUuid": "org-1", "path": "README.md",
             "measures": [{"metric": "ncloc", "value": "10"}]},
            {"key": "acme:app:src/a.rs", "name": "a.rs", "qualifier": "FIL", "organizationUuid": "org-1", "path": "src/a.rs",
             "measures": [{"metric": "coverage", "value": "100.0", "bestValue": true}]},
            {"key": "acme:app:src/b.rs", "name": "b.rs", "qualifier": "FIL", "organizationUuid": "org-1", "path": "src/b.rs",
             "measures": [{"metric": "coverage", "value": "50.0"}]},
            {"key": "acme:app:src/c.rs", "name": "c.rs", "qualifier": "FIL", "organizationUuid": "org-1", "path": "src/c.rs",
             "measures": [{"metric": "coverage", "value": "12.5"}]},
            {"key": "acme:app:src/util", "name": "util", "qualifier": "DIR", "organizationUuid": "org-1", "path": "src/util"},
            {"key": "acme:app:src/util/d.rs", "name": "d.rs", "qualifier": "FIL", "organizationUuid": "org-1", "path": "src/util/d.rs"}
        ]
    }"#;

    pub(crate) fn source() -> FileSource {
        FileSource::from_json(FIXTURE, "fixture").unwrap()
    }

    pub(crate) fn query(component: &str, page_size: usize) -> TreeQuery {
        TreeQuery {
            component: component.into(),
            metric_keys: vec!["coverage".into()],
            branch_like: None,
            page_size,
        }
    }

    #[test]
    fn test_default_component_is_project() {
        assert_eq!(source().default_component(), Some("acme:app"));
    }

    #[test]
    fn test_root_children() {
        let page = source().fetch_page(&query("acme:app", 10), 1).unwrap();
        let keys: Vec<&str> = page.components.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["acme:app:src", "acme:app:README.md"]);
        assert_eq!(page.paging.total, 2);
        assert_eq!(page.base_component.qualifier, Qualifier::Project);
        assert!(page.metrics.contains_key("coverage"));
        assert!(!page.metrics.contains_key("ncloc"));
        // measures restricted to the queried metrics
        assert!(page.components[1].measures.is_empty());
    }

    #[test]
    fn test_directory_children_paged() {
        let src = source();
        let first = src.fetch_page(&query("acme:app:src", 2), 1).unwrap();
        let keys: Vec<&str> = first.components.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["acme:app:src/a.rs", "acme:app:src/b.rs"]);
        assert_eq!(first.paging.total, 4);
        assert!(first.paging.has_more(first.components.len()));

        let second = src.fetch_page(&query("acme:app:src", 2), 2).unwrap();
        let keys: Vec<&str> = second.components.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["acme:app:src/c.rs", "acme:app:src/util"]);
        assert_eq!(second.paging.page_index, 2);
    }

    #[test]
    fn test_info_projected() {
        let page = source().fetch_page(&query("acme:app", 10), 1).unwrap();
        let info = page.info.unwrap();
        assert_eq!(info.organization, "acme");
        assert_eq!(info.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_unknown_component() {
        let err = source().fetch_page(&query("nope", 10), 1).unwrap_err();
        assert!(matches!(err, MeasuresError::ComponentNotFound(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = FileSource::from_json("{", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_http_endpoint_trims_slash() {
        let src = HttpSource::new("https://sonar.example.com/", None);
        assert_eq!(
            src.endpoint(),
            "https://sonar.example.com/api/measures/component_tree"
        );
    }
}
