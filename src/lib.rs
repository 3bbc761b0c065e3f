//! Drilldown browser for code-quality measures
//!
//! Loads the measured children of a project, directory or view from a JSON
//! fixture or a server's `component_tree` endpoint, and lets the user walk the
//! tree with the arrow keys.

pub mod cli;
pub mod commands;
pub mod component;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod source;
pub mod tui;

pub use config::{MeasuresConfig, TuiTheme};
pub use error::{MeasuresError, Result};
pub use models::{BranchLike, ComponentMeasure, Measure, Metric, MetricType, Paging, Qualifier};
