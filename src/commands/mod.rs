//! Command implementations

mod browse;
mod config;
mod list;

pub use browse::cmd_browse;
pub use config::{cmd_config_init, cmd_config_path, cmd_config_show};
pub use list::cmd_list;

use anyhow::{Result, bail};

use crate::cli::SourceArgs;
use crate::config::MeasuresConfig;
use crate::models::BranchLike;
use crate::source::{FileSource, HttpSource, MeasureSource, TreeQuery};

/// Build the source and the first query from command line arguments and config
pub(crate) fn open_source(
    args: &SourceArgs,
    config: &MeasuresConfig,
) -> Result<(Box<dyn MeasureSource>, TreeQuery)> {
    let (source, default_component): (Box<dyn MeasureSource>, Option<String>) =
        if let Some(path) = &args.file {
            let source = FileSource::open(path)?;
            let default = source.default_component().map(str::to_string);
            (Box::new(source), default)
        } else if let Some(url) = args.url.as_deref().or(config.source.url.as_deref()) {
            (
                Box::new(HttpSource::new(url, config.source.token.clone())),
                None,
            )
        } else {
            bail!("No measures source: pass --file or --url, or set [source] url in the config");
        };

    let Some(component) = args.component.clone().or(default_component) else {
        bail!("No component given: pass --component <KEY>");
    };

    let query = TreeQuery {
        component,
        metric_keys: args.metric_keys(),
        branch_like: branch_like(args),
        page_size: args.page_size.unwrap_or(config.source.page_size),
    };
    tracing::debug!(source = %source.describe(), ?query, "resolved source");
    Ok((source, query))
}

fn branch_like(args: &SourceArgs) -> Option<BranchLike> {
    if let Some(name) = &args.branch {
        return Some(BranchLike::Branch {
            name: name.clone(),
            is_main: false,
        });
    }
    args.pull_request.as_ref().map(|key| BranchLike::PullRequest {
        key: key.clone(),
        title: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::FIXTURE;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(file: Option<PathBuf>) -> SourceArgs {
        SourceArgs {
            file,
            url: None,
            component: None,
            metric: "coverage".into(),
            extra_metrics: vec!["ncloc".into()],
            branch: None,
            pull_request: None,
            page_size: None,
        }
    }

    fn fixture_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("measures.json");
        std::fs::write(&path, FIXTURE).unwrap();
        path
    }

    #[test]
    fn test_file_source_defaults_to_project() {
        let dir = TempDir::new().unwrap();
        let (source, query) =
            open_source(&args(Some(fixture_file(&dir))), &MeasuresConfig::default()).unwrap();
        assert_eq!(query.component, "acme:app");
        assert_eq!(query.metric_keys, vec!["coverage", "ncloc"]);
        assert_eq!(query.page_size, 100);
        assert!(query.branch_like.is_none());
        assert!(source.describe().ends_with("measures.json"));
    }

    #[test]
    fn test_explicit_component_and_page_size() {
        let dir = TempDir::new().unwrap();
        let mut args = args(Some(fixture_file(&dir)));
        args.component = Some("acme:app:src".into());
        args.page_size = Some(5);
        args.pull_request = Some("42".into());
        let (_, query) = open_source(&args, &MeasuresConfig::default()).unwrap();
        assert_eq!(query.component, "acme:app:src");
        assert_eq!(query.page_size, 5);
        assert_eq!(query.branch_like.map(|b| b.label()).as_deref(), Some("#42"));
    }

    #[test]
    fn test_url_from_config_requires_component() {
        let mut config = MeasuresConfig::default();
        config.source.url = Some("https://sonar.example.com".into());
        let err = open_source(&args(None), &config).err().unwrap();
        assert!(err.to_string().contains("--component"));

        let mut args = args(None);
        args.component = Some("acme:app".into());
        let (source, _) = open_source(&args, &config).unwrap();
        assert_eq!(source.describe(), "https://sonar.example.com");
    }

    #[test]
    fn test_demo_fixture_loads() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/sample.json");
        let (source, query) = open_source(&args(Some(path)), &MeasuresConfig::default()).unwrap();
        assert_eq!(query.component, "demo:shop");

        let page = source.fetch_page(&query.for_component("demo:shop:tests"), 1).unwrap();
        assert_eq!(page.paging.total, 140);
        assert_eq!(page.components.len(), 100);
        assert!(page.metrics.contains_key("ncloc"));
    }

    #[test]
    fn test_no_source_configured() {
        let err = open_source(&args(None), &MeasuresConfig::default()).err().unwrap();
        assert!(err.to_string().contains("--file"));
    }
}
