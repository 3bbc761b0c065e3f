//! Non-interactive listing of a component's children

use anyhow::Result;
use colored::Colorize;
use comfy_table::{CellAlignment, Table, presets::UTF8_BORDERS_ONLY};

use super::open_source;
use crate::cli::SourceArgs;
use crate::config::MeasuresConfig;
use crate::format::format_measure;
use crate::models::{ComponentMeasure, Metric, MetricType, MetricsMap};
use crate::source::{MeasureSource, TreePage, TreeQuery};

/// Print the children of `args.component`
pub fn cmd_list(args: &SourceArgs, all: bool, json: bool) -> Result<()> {
    let config = MeasuresConfig::load()?;
    let (source, query) = open_source(args, &config)?;
    let page = fetch(source.as_ref(), &query, all)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page.components)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        page.base_component.qualifier.icon(),
        page.base_component.name.bold(),
        format!("[{}]", page.base_component.key).dimmed()
    );
    if let Some(branch) = &query.branch_like {
        println!("  on {}", branch.label().cyan());
    }
    println!();

    if page.components.is_empty() {
        println!("  No components.");
        return Ok(());
    }

    let columns = columns(&page.metrics, &query.metric_keys);
    println!("{}", build_table(&page.components, &columns));
    println!();
    println!(
        "{} {} of {} components shown",
        ">".cyan(),
        page.components.len(),
        page.paging.total
    );
    if page.paging.has_more(page.components.len()) {
        println!("  Use {} to fetch them all", "--all".cyan());
    }
    Ok(())
}

/// First page, or every page merged into one when `all` is set
fn fetch(source: &dyn MeasureSource, query: &TreeQuery, all: bool) -> Result<TreePage> {
    let mut page = source.fetch_page(query, 1)?;
    while all && page.paging.has_more(page.components.len()) {
        let next = source.fetch_page(query, page.paging.next_page())?;
        if next.components.is_empty() {
            break;
        }
        page.components.extend(next.components);
        page.metrics.extend(next.metrics);
        page.paging = next.paging;
    }
    tracing::debug!(count = page.components.len(), total = page.paging.total, "listed components");
    Ok(page)
}

/// Metric columns in the requested order, unknown keys shown as plain strings
fn columns(metrics: &MetricsMap, keys: &[String]) -> Vec<Metric> {
    keys.iter()
        .map(|key| {
            metrics
                .get(key)
                .cloned()
                .unwrap_or_else(|| Metric::new(key, key, MetricType::String))
        })
        .collect()
}

fn build_table(components: &[ComponentMeasure], columns: &[Metric]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);

    let mut header = vec!["Name".to_string(), "Kind".to_string()];
    header.extend(columns.iter().map(|m| m.name.clone()));
    table.set_header(header);

    for component in components {
        let mut row = vec![
            component.display_name().to_string(),
            component.qualifier.to_string(),
        ];
        row.extend(columns.iter().map(|metric| {
            component
                .value(&metric.key)
                .map(|v| format_measure(v, metric.metric_type))
                .unwrap_or_else(|| "-".to_string())
        }));
        table.add_row(row);
    }

    for index in 2..2 + columns.len() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::{query, source};

    #[test]
    fn test_fetch_first_page_only() {
        let page = fetch(&source(), &query("acme:app:src", 2), false).unwrap();
        assert_eq!(page.components.len(), 2);
        assert_eq!(page.paging.total, 4);
    }

    #[test]
    fn test_fetch_all_pages() {
        let page = fetch(&source(), &query("acme:app:src", 3), true).unwrap();
        assert_eq!(page.components.len(), 4);
        assert_eq!(page.paging.page_index, 2);
    }

    #[test]
    fn test_columns_keep_requested_order() {
        let page = fetch(&source(), &query("acme:app", 10), false).unwrap();
        let cols = columns(&page.metrics, &["bugs".to_string(), "coverage".to_string()]);
        assert_eq!(cols[0].metric_type, MetricType::String);
        assert_eq!(cols[1].name, "Coverage");
    }

    #[test]
    fn test_table_formats_values() {
        let page = fetch(&source(), &query("acme:app:src", 10), false).unwrap();
        let cols = columns(&page.metrics, &["coverage".to_string()]);
        let rendered = build_table(&page.components, &cols).to_string();

        assert!(rendered.contains("Coverage"));
        assert!(rendered.contains("src/a.rs"));
        assert!(rendered.contains("12.5%"));
        // util has no coverage
        assert!(rendered.contains("src/util"));
        assert!(rendered.contains('-'));
    }
}
