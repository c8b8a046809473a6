//! Grouped SVG bar charts for each sample group of the merged table.

use super::escape_xml;
use crate::error::{ReportError, ReportResult};
use crate::stats::merge::{group_samples, sample_label};
use crate::stats::StatsTable;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 180;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 60;
const PLOT_HEIGHT: u32 = 300;
const MIN_PLOT_WIDTH: u32 = 240;
const BAR_WIDTH: u32 = 20;
const GROUP_GAP: u32 = 24;
const Y_TICKS: u32 = 5;
const PALETTE: [&str; 8] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
];

struct SvgTag {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
}

impl SvgTag {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    fn attr(mut self, key: &'static str, value: impl ToString) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }

    fn render(&self, self_closing: bool) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_xml(v)))
            .collect::<Vec<_>>()
            .join(" ");

        if self_closing {
            format!("<{} {}/>", self.name, attrs)
        } else {
            format!("<{} {}>", self.name, attrs)
        }
    }

    fn wrap(&self, text: &str) -> String {
        format!("{}{}</{}>", self.render(false), escape_xml(text), self.name)
    }
}

/// Which columns of the table feed a chart.
enum Columns {
    Fixed(&'static [&'static str]),
    Matching(Regex),
}

/// A chart drawn for every sample group that has data for it.
struct ChartKind {
    title: &'static str,
    y_label: &'static str,
    columns: Columns,
    /// Dropped from column names to form legend entries.
    strip_suffix: Option<&'static str>,
    show_values: bool,
}

fn chart_kinds() -> Vec<ChartKind> {
    vec![
        ChartKind {
            title: "ORF Calling Results",
            y_label: "Count",
            columns: Columns::Fixed(&["Protein Count (Total)", "Protein Count (>Min Score)"]),
            strip_suffix: None,
            show_values: false,
        },
        ChartKind {
            title: "Average Protein Length",
            y_label: "Peptide Length",
            columns: Columns::Fixed(&["Average Protein Length"]),
            strip_suffix: None,
            show_values: false,
        },
        ChartKind {
            title: "Annotations",
            y_label: "count",
            columns: Columns::Matching(
                Regex::new(r"[A-Za-z] ID Count").expect("annotation column pattern is static"),
            ),
            strip_suffix: Some(" Count"),
            show_values: false,
        },
        ChartKind {
            title: "GC (%)",
            y_label: "GC Percent (%)",
            columns: Columns::Fixed(&["GC %"]),
            strip_suffix: None,
            show_values: false,
        },
        ChartKind {
            title: "Assembly Stats",
            y_label: "Sequence Length",
            columns: Columns::Fixed(&["N25", "N50", "N75", "N90"]),
            strip_suffix: None,
            show_values: false,
        },
        ChartKind {
            title: "Min-Max FASTA Length",
            y_label: "Sequence Length",
            columns: Columns::Fixed(&["Contig Min Length", "Contig Max Length"]),
            strip_suffix: None,
            show_values: true,
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A grouped bar chart: one cluster per category, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub show_values: bool,
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `value`.
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= value)
        .unwrap_or(10.0 * magnitude)
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

impl BarChart {
    fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0f64, |acc, v| acc.max(*v));
        nice_ceiling(max)
    }

    fn plot_width(&self) -> u32 {
        let cluster = self.series.len() as u32 * BAR_WIDTH + GROUP_GAP;
        (self.categories.len() as u32 * cluster).max(MIN_PLOT_WIDTH)
    }

    pub fn render_svg(&self) -> String {
        let plot_width = self.plot_width();
        let width = MARGIN_LEFT + plot_width + MARGIN_RIGHT;
        let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + PLOT_HEIGHT;
        let y_max = self.y_max();
        let scale = |v: f64| (v.max(0.0) / y_max * PLOT_HEIGHT as f64).round() as u32;

        let mut svg = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        svg.push_str(
            &SvgTag::new("svg")
                .attr("xmlns", "http://www.w3.org/2000/svg")
                .attr("width", width)
                .attr("height", height)
                .attr("font-family", "sans-serif")
                .attr("font-size", 12)
                .attr("style", "background:#ffffff")
                .render(false),
        );
        svg.push('\n');

        svg.push_str(
            &SvgTag::new("text")
                .attr("x", MARGIN_LEFT)
                .attr("y", MARGIN_TOP / 2)
                .attr("font-size", 16)
                .wrap(&self.title),
        );
        svg.push('\n');

        // Grid and y ticks
        for i in 0..=Y_TICKS {
            let value = y_max / Y_TICKS as f64 * i as f64;
            let y = baseline - scale(value);
            svg.push_str(
                &SvgTag::new("line")
                    .attr("x1", MARGIN_LEFT)
                    .attr("y1", y)
                    .attr("x2", MARGIN_LEFT + plot_width)
                    .attr("y2", y)
                    .attr("stroke", "#d3d3d3")
                    .attr("stroke-width", 1)
                    .render(true),
            );
            svg.push_str(
                &SvgTag::new("text")
                    .attr("x", MARGIN_LEFT - 6)
                    .attr("y", y + 4)
                    .attr("text-anchor", "end")
                    .wrap(&format_tick(value)),
            );
            svg.push('\n');
        }

        let cluster = self.series.len() as u32 * BAR_WIDTH + GROUP_GAP;
        for (i, category) in self.categories.iter().enumerate() {
            let cluster_x = MARGIN_LEFT + i as u32 * cluster + GROUP_GAP / 2;
            for (j, series) in self.series.iter().enumerate() {
                let Some(value) = series.values.get(i).copied().flatten() else {
                    continue;
                };
                let x = cluster_x + j as u32 * BAR_WIDTH;
                let bar_height = scale(value);
                svg.push_str(
                    &SvgTag::new("rect")
                        .attr("x", x)
                        .attr("y", baseline - bar_height)
                        .attr("width", BAR_WIDTH - 2)
                        .attr("height", bar_height)
                        .attr("fill", PALETTE[j % PALETTE.len()])
                        .render(true),
                );
                svg.push('\n');
                if self.show_values {
                    svg.push_str(
                        &SvgTag::new("text")
                            .attr("x", x + BAR_WIDTH / 2)
                            .attr("y", baseline - bar_height - 4)
                            .attr("text-anchor", "middle")
                            .attr("font-size", 10)
                            .wrap(&format_tick(value)),
                    );
                    svg.push('\n');
                }
            }
            svg.push_str(
                &SvgTag::new("text")
                    .attr("x", cluster_x + self.series.len() as u32 * BAR_WIDTH / 2)
                    .attr("y", baseline + 18)
                    .attr("text-anchor", "middle")
                    .wrap(category),
            );
            svg.push('\n');
        }

        // Axes
        for (x2, y2) in [(MARGIN_LEFT, MARGIN_TOP), (MARGIN_LEFT + plot_width, baseline)] {
            svg.push_str(
                &SvgTag::new("line")
                    .attr("x1", MARGIN_LEFT)
                    .attr("y1", baseline)
                    .attr("x2", x2)
                    .attr("y2", y2)
                    .attr("stroke", "#000000")
                    .attr("stroke-width", 2)
                    .render(true),
            );
            svg.push('\n');
        }

        let label_x = MARGIN_LEFT / 4;
        let label_y = MARGIN_TOP + PLOT_HEIGHT / 2;
        svg.push_str(
            &SvgTag::new("text")
                .attr("x", label_x)
                .attr("y", label_y)
                .attr("text-anchor", "middle")
                .attr("transform", format!("rotate(-90 {} {})", label_x, label_y))
                .wrap(&self.y_label),
        );
        svg.push('\n');

        let legend_x = MARGIN_LEFT + plot_width + 16;
        for (j, series) in self.series.iter().enumerate() {
            let y = MARGIN_TOP + j as u32 * 20;
            svg.push_str(
                &SvgTag::new("rect")
                    .attr("x", legend_x)
                    .attr("y", y)
                    .attr("width", 12)
                    .attr("height", 12)
                    .attr("fill", PALETTE[j % PALETTE.len()])
                    .render(true),
            );
            svg.push_str(
                &SvgTag::new("text")
                    .attr("x", legend_x + 18)
                    .attr("y", y + 11)
                    .wrap(&series.name),
            );
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn group_name(prefix: &str) -> &str {
    prefix.strip_suffix('_').unwrap_or(prefix)
}

/// Build the chart of `kind` for the samples of one group. Columns nobody
/// in the group has a numeric value for are left out; with none left there
/// is no chart.
fn build_chart(
    kind: &ChartKind,
    table: &StatsTable,
    prefix: &str,
    members: &[String],
) -> Option<BarChart> {
    let columns: Vec<String> = match &kind.columns {
        Columns::Fixed(names) => names.iter().map(|n| n.to_string()).collect(),
        Columns::Matching(pattern) => table
            .columns()
            .into_iter()
            .filter(|c| pattern.is_match(c))
            .collect(),
    };

    let series: Vec<ChartSeries> = columns
        .iter()
        .map(|column| ChartSeries {
            name: kind
                .strip_suffix
                .and_then(|suffix| column.strip_suffix(suffix))
                .unwrap_or(column)
                .to_string(),
            values: members
                .iter()
                .map(|sample| {
                    table
                        .row(sample)
                        .and_then(|row| row.get(column))
                        .and_then(|value| value.as_f64())
                })
                .collect(),
        })
        .filter(|s| s.values.iter().any(Option::is_some))
        .collect();

    if series.is_empty() {
        return None;
    }

    Some(BarChart {
        title: format!("{} ({})", kind.title, group_name(prefix)),
        y_label: kind.y_label.to_string(),
        categories: members.iter().map(|s| sample_label(s).to_string()).collect(),
        series,
        show_values: kind.show_values,
    })
}

/// Every chart for every sample group, groups in first-seen order.
pub fn build_charts(table: &StatsTable) -> Vec<BarChart> {
    let kinds = chart_kinds();
    let mut charts = Vec::new();
    for (prefix, members) in group_samples(table.samples()) {
        for kind in &kinds {
            match build_chart(kind, table, &prefix, &members) {
                Some(chart) => charts.push(chart),
                None => debug!("no data for {} in group {}", kind.title, prefix),
            }
        }
    }
    charts
}

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    pub path: PathBuf,
    pub svg: String,
}

fn file_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.svg", name)
}

/// Render every chart to `<img_dir>/<title>.svg`.
pub fn write_charts(table: &StatsTable, img_dir: &Path) -> ReportResult<Vec<RenderedChart>> {
    fs::create_dir_all(img_dir).map_err(|e| ReportError::io(img_dir, e))?;

    build_charts(table)
        .into_iter()
        .map(|chart| {
            let svg = chart.render_svg();
            let path = img_dir.join(file_name(&chart.title));
            fs::write(&path, &svg).map_err(|e| ReportError::io(&path, e))?;
            Ok(RenderedChart {
                title: chart.title,
                path,
                svg,
            })
        })
        .collect()
}
