use super::charts::RenderedChart;
use super::escape_xml;
use super::resources::ReportResources;
use crate::error::{ReportError, ReportResult};
use crate::stats::StatsTable;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Anchor id for a section title.
fn section_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c.to_ascii_lowercase());
        } else if !id.ends_with('-') {
            id.push('-');
        }
    }
    id.trim_matches('-').to_string()
}

fn inline_svg(svg: &str) -> &str {
    match svg.strip_prefix("<?xml") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
        None => svg,
    }
}

/// Copy the logo next to the page and return its relative file name.
fn place_logo(logo: &Path, dir: &Path) -> ReportResult<String> {
    let name = logo
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logo".to_string());
    let target = dir.join(&name);
    fs::copy(logo, &target).map_err(|e| ReportError::input(logo, e))?;
    Ok(name)
}

fn write_head(html: &mut String, resources: &ReportResources) {
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Stats Report</title>\n<style type=\"text/css\">\n");
    html.push_str(&resources.stylesheet);
    html.push_str("\n</style>\n</head>\n<body>\n");
}

fn write_contents(html: &mut String, charts: &[RenderedChart]) {
    html.push_str("<div class=\"contents topic\" id=\"contents\">\n<ul class=\"simple\">\n");
    html.push_str("<li><a class=\"reference internal\" href=\"#summary\">Summary</a></li>\n<ul>\n");
    for chart in charts {
        html.push_str(&format!(
            "<li><a class=\"reference internal\" href=\"#{}\">{}</a></li>\n",
            section_id(&chart.title),
            escape_xml(&chart.title)
        ));
    }
    html.push_str("</ul>\n");
    html.push_str("<li><a class=\"reference internal\" href=\"#stats-table\">Table</a></li>\n");
    html.push_str("<li><a class=\"reference internal\" href=\"#downloads\">Downloads</a></li>\n");
    html.push_str("</ul>\n</div>\n");
}

fn write_chart_sections(html: &mut String, charts: &[RenderedChart]) {
    html.push_str("<div class=\"section\" id=\"summary\">\n<h1>Summary</h1>\n");
    for chart in charts {
        html.push_str(&format!(
            "<div class=\"section chart\" id=\"{}\">\n<h2>{}</h2>\n{}</div>\n",
            section_id(&chart.title),
            escape_xml(&chart.title),
            inline_svg(&chart.svg)
        ));
    }
    html.push_str("</div>\n");
}

fn write_stats_table(html: &mut String, table: &StatsTable) {
    let columns = table.columns();
    html.push_str("<div class=\"section\" id=\"stats-table\">\n<h1>Table</h1>\n");
    html.push_str("<table class=\"stats\">\n<tr><th>Sample</th>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", escape_xml(column)));
    }
    html.push_str("</tr>\n");

    for sample in table.samples() {
        html.push_str(&format!("<tr><td>{}</td>", escape_xml(sample)));
        let row = table.row(sample);
        for column in &columns {
            let value = row
                .and_then(|r| r.get(column))
                .map(|v| v.to_string())
                .unwrap_or_default();
            html.push_str(&format!("<td>{}</td>", escape_xml(&value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</div>\n");
}

fn write_downloads(html: &mut String, tsv_name: &str) {
    html.push_str("<div class=\"section\" id=\"downloads\">\n<h1>Downloads</h1>\n");
    html.push_str("<dl class=\"docutils\">\n<dt>Combined Stats:</dt>\n");
    html.push_str(&format!(
        "<dd><a href=\"{0}\" download=\"{0}\">{0}</a></dd>\n",
        escape_xml(tsv_name)
    ));
    html.push_str("</dl>\n</div>\n");
}

/// Write `stats.html` into `dir`: contents list, one section per chart,
/// the full table, a link to the table download and the date stamp.
pub fn write_stats_html(
    table: &StatsTable,
    charts: &[RenderedChart],
    resources: &ReportResources,
    dir: &Path,
    date: &str,
) -> ReportResult<PathBuf> {
    let mut html = String::new();
    write_head(&mut html, resources);

    html.push_str("<div class=\"document\" id=\"stats-summary\">\n<h1 class=\"title\">");
    if let Some(logo) = &resources.logo {
        let name = place_logo(logo, dir)?;
        html.push_str(&format!("<img src=\"{}\" alt=\"\">", escape_xml(&name)));
    }
    html.push_str("Statistical Summary</h1>\n");

    write_contents(&mut html, charts);
    write_chart_sections(&mut html, charts);
    write_stats_table(&mut html, table);
    write_downloads(&mut html, "stats.tsv");

    html.push_str(&format!(
        "<div class=\"docutils container\" id=\"metadata\">{}</div>\n",
        escape_xml(date)
    ));
    html.push_str("</div>\n</body>\n</html>\n");

    let path = dir.join("stats.html");
    let file = File::create(&path).map_err(|e| ReportError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(html.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ReportError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_ids() {
        assert_eq!(section_id("GC (%) (cold)"), "gc-cold");
        assert_eq!(section_id("Min-Max FASTA Length (x)"), "min-max-fasta-length-x");
    }

    #[test]
    fn test_inline_svg_drops_declaration() {
        let svg = "<?xml version=\"1.0\"?>\n<svg></svg>\n";
        assert_eq!(inline_svg(svg), "<svg></svg>\n");
        assert_eq!(inline_svg("<svg/>"), "<svg/>");
    }
}
