//! Static report sink: SVG charts and the `stats.html` page.

pub mod charts;
pub mod html;
pub mod resources;

use crate::error::ReportResult;
use crate::stats::StatsTable;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

pub use charts::{build_charts, write_charts, BarChart, ChartSeries, RenderedChart};
pub use html::write_stats_html;
pub use resources::ReportResources;

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone)]
pub struct ReportOutputs {
    pub html: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Charts go to `<outpath>/combined/img`, the page to `<outpath>/combined/stats.html`.
pub fn write_report(
    table: &StatsTable,
    outpath: &Path,
    resources: &ReportResources,
) -> ReportResult<ReportOutputs> {
    let dir = outpath.join("combined");
    let charts = write_charts(table, &dir.join("img"))?;
    let date = Local::now().format("%Y-%m-%d").to_string();
    let html = write_stats_html(table, &charts, resources, &dir, &date)?;
    info!("wrote {} charts and {}", charts.len(), html.display());

    Ok(ReportOutputs {
        html,
        charts: charts.into_iter().map(|c| c.path).collect(),
    })
}
