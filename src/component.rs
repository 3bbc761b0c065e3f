//! Component projection
//!
//! Turns a stored component record into the public component description
//! shown in the header and used to build list rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MeasuresError, Result};
use crate::models::{ComponentMeasure, Measure, Qualifier};

/// Timestamp layout used for analysis dates (e.g. `2024-03-01T10:00:00+0000`)
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// A component record as stored alongside its measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    pub key: String,
    pub name: String,
    pub qualifier: Qualifier,
    pub organization_uuid: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub pull_request: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl RawComponent {
    /// The list row view of this record
    pub fn to_measure(&self) -> ComponentMeasure {
        ComponentMeasure {
            key: self.key.clone(),
            name: self.name.clone(),
            qualifier: self.qualifier.clone(),
            path: non_empty(self.path.as_deref()),
            measures: self.measures.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub uuid: String,
    pub key: String,
}

/// The last analysis of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub period_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_private(private: bool) -> Self {
        if private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Public description of a component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub organization: String,
    pub key: String,
    pub name: String,
    pub qualifier: Qualifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leak_period_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ComponentInfo {
    /// One-line summary for the header
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} [{}]", self.name, self.qualifier)];
        if let Some(version) = &self.version {
            parts.push(format!("v{version}"));
        }
        if let Some(date) = &self.analysis_date {
            parts.push(format!("analyzed {date}"));
        }
        if let Some(visibility) = self.visibility {
            parts.push(visibility.label().to_string());
        }
        if !self.tags.is_empty() {
            parts.push(self.tags.join(","));
        }
        parts.join(" · ")
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Project a stored component into its public description
///
/// The component must belong to `organization`.
pub fn project_component(
    raw: &RawComponent,
    organization: &Organization,
    analysis: Option<&Analysis>,
) -> Result<ComponentInfo> {
    if raw.organization_uuid != organization.uuid {
        return Err(MeasuresError::OrganizationMismatch {
            component: raw.organization_uuid.clone(),
            organization: organization.uuid.clone(),
        });
    }

    let mut info = ComponentInfo {
        organization: organization.key.clone(),
        key: raw.key.clone(),
        name: raw.name.clone(),
        qualifier: raw.qualifier.clone(),
        branch: non_empty(raw.branch.as_deref()),
        pull_request: non_empty(raw.pull_request.as_deref()),
        path: non_empty(raw.path.as_deref()),
        description: non_empty(raw.description.as_deref()),
        language: non_empty(raw.language.as_deref()),
        analysis_date: None,
        leak_period_date: None,
        version: None,
        visibility: None,
        tags: Vec::new(),
    };

    if let Some(analysis) = analysis {
        info.analysis_date = Some(format_datetime(&analysis.created_at));
        info.leak_period_date = analysis.period_date.as_ref().map(format_datetime);
        info.version = analysis.project_version.clone();
    }

    if raw.qualifier.has_visibility() {
        info.visibility = Some(Visibility::from_private(raw.private));
        if raw.qualifier == Qualifier::Project {
            info.tags = raw.tags.clone();
        }
    }

    Ok(info)
}
