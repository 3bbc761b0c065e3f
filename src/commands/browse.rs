//! Interactive browser command

use anyhow::{Context, Result};

use super::open_source;
use crate::cli::SourceArgs;
use crate::config::MeasuresConfig;
use crate::tui::{self, App};

/// Open the drilldown browser on `args.component`
pub fn cmd_browse(args: &SourceArgs) -> Result<()> {
    let config = MeasuresConfig::load()?;
    let (source, query) = open_source(args, &config)?;
    let component = query.component.clone();

    let mut app = App::new(source, query, &args.metric, &config)
        .with_context(|| format!("Failed to load component '{component}'"))?;
    tui::run(&mut app)
}
