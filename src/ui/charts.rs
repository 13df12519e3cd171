use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use jobs_dashboard::data::aggregate::{CategoryCount, ChartData};
use jobs_dashboard::data::model::Column;
use jobs_dashboard::data::timeseries::YearMonth;

use crate::color::{generate_palette, sequential_color, ColorMap};

const CHART_HEIGHT: f32 = 260.0;

/// Shown in place of a chart when there is nothing to draw.
pub fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data available").italics());
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Pie chart of category counts, one polygon per slice.
pub fn pie_chart(ui: &mut Ui, id: &str, data: &ChartData<Vec<CategoryCount>>) {
    let ChartData::Ready(counts) = data else {
        no_data(ui);
        return;
    };
    let total: usize = counts.iter().map(|c| c.count).sum();
    let colors = ColorMap::new(counts.iter().map(|c| c.category.as_str()));

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let mut angle = TAU / 4.0;
            for c in counts {
                let share = c.count as f64 / total as f64;
                let sweep = share * TAU;
                let name = format!("{} ({})", c.category, c.count);
                // Polygon fills must be convex: at most a quarter turn each.
                let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0);
                for k in 0..pieces as usize {
                    let piece = sweep / pieces;
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(slice_points(angle - piece * k as f64, piece)))
                            .fill_color(colors.color_for(&c.category))
                            .stroke(Stroke::new(1.0, Color32::from_gray(30)))
                            .name(&name),
                    );
                }
                if share >= 0.05 {
                    let mid = angle - sweep / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.0}%", share * 100.0)).color(Color32::BLACK),
                    ));
                }
                angle -= sweep;
            }
        });
}

/// Outline of a slice starting at `start` and sweeping clockwise.
fn slice_points(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let a = start - sweep * i as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// How bars are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColoring {
    /// One hue per category.
    Categorical,
    /// Continuous scale from the smallest to the largest count.
    ByCount,
}

/// Vertical bar chart of category counts, highest first.
pub fn bar_chart(
    ui: &mut Ui,
    id: &str,
    column: Column,
    data: &ChartData<Vec<CategoryCount>>,
    coloring: BarColoring,
) {
    let ChartData::Ready(counts) = data else {
        no_data(ui);
        return;
    };
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let palette = generate_palette(counts.len());

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let fill = match coloring {
                BarColoring::Categorical => palette[i],
                BarColoring::ByCount => sequential_color(c.count as f64, max),
            };
            Bar::new(i as f64, c.count as f64)
                .name(&c.category)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = counts.iter().map(|c| c.category.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(column.label())
        .y_axis_label("Count")
        .x_axis_formatter(move |mark: GridMark, _range| category_tick(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(column.label()));
        });
}

/// Tick label for an integer bar position, blank between bars.
fn category_tick(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract().abs() > f64::EPSILON {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Monthly postings as a line with a marker per month.
pub fn line_chart(ui: &mut Ui, id: &str, series: &[(YearMonth, usize)]) {
    if series.is_empty() {
        no_data(ui);
        return;
    }
    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|(month, count)| [month_index(*month), *count as f64])
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Month")
        .y_axis_label("Job openings")
        .x_axis_formatter(|mark: GridMark, _range| month_tick(mark.value))
        .label_formatter(|_name, value| format!("{}\n{:.0} openings", month_tick(value.x), value.y))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name("Job openings")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::new(points))
                    .radius(3.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

/// Months since year 0, so consecutive months are one unit apart.
fn month_index(month: YearMonth) -> f64 {
    (month.year as f64) * 12.0 + (month.month as f64 - 1.0)
}

fn month_tick(value: f64) -> String {
    if value.fract().abs() > f64::EPSILON {
        return String::new();
    }
    let index = value as i64;
    let year = index.div_euclid(12) as i32;
    let month = index.rem_euclid(12) as u32 + 1;
    YearMonth { year, month }.to_string()
}

// ---------------------------------------------------------------------------
// Choropleth (tile map of Canadian provinces)
// ---------------------------------------------------------------------------

/// Province tiles: (abbreviation, accepted names, column, row).
const PROVINCE_TILES: [(&str, &[&str], f64, f64); 13] = [
    ("YT", &["yukon"], 0.0, 0.0),
    ("NT", &["northwest territories"], 1.0, 0.0),
    ("NU", &["nunavut"], 2.0, 0.0),
    ("BC", &["british columbia", "colombie-britannique"], 0.0, -1.0),
    ("AB", &["alberta"], 1.0, -1.0),
    ("SK", &["saskatchewan"], 2.0, -1.0),
    ("MB", &["manitoba"], 3.0, -1.0),
    ("ON", &["ontario"], 4.0, -1.0),
    ("QC", &["quebec", "québec"], 5.0, -1.0),
    ("NL", &["newfoundland and labrador", "terre-neuve-et-labrador"], 6.0, -1.0),
    ("NB", &["new brunswick", "nouveau-brunswick"], 5.0, -2.0),
    ("PE", &["prince edward island", "île-du-prince-édouard"], 6.0, -2.0),
    ("NS", &["nova scotia", "nouvelle-écosse"], 6.0, -3.0),
];

/// Tile abbreviation for a province name as it appears in the data.
fn province_code(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();
    PROVINCE_TILES
        .iter()
        .find(|(code, names, _, _)| names.contains(&key.as_str()) || code.eq_ignore_ascii_case(&key))
        .map(|(code, _, _, _)| *code)
}

/// Postings per province drawn as coloured tiles on a 0..max scale.
pub fn choropleth(ui: &mut Ui, id: &str, totals: &BTreeMap<String, usize>) {
    if totals.is_empty() {
        no_data(ui);
        return;
    }

    let mut by_code: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unmapped: Vec<(&str, usize)> = Vec::new();
    for (name, &count) in totals {
        match province_code(name) {
            Some(code) => *by_code.entry(code).or_insert(0) += count,
            None => unmapped.push((name.as_str(), count)),
        }
    }
    let max = by_code.values().copied().max().unwrap_or(0) as f64;

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (code, _, col, row) in PROVINCE_TILES {
                let count = by_code.get(code).copied().unwrap_or(0);
                let fill = if count == 0 {
                    Color32::from_gray(60)
                } else {
                    sequential_color(count as f64, max)
                };
                let (x, y) = (col, row);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(vec![
                        [x - 0.45, y - 0.45],
                        [x + 0.45, y - 0.45],
                        [x + 0.45, y + 0.45],
                        [x - 0.45, y + 0.45],
                    ]))
                    .fill_color(fill)
                    .stroke(Stroke::new(1.0, Color32::from_gray(20)))
                    .name(format!("{code}: {count}")),
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{code}\n{count}")).color(Color32::WHITE).strong(),
                ));
            }
        });

    if !unmapped.is_empty() {
        let others: Vec<String> = unmapped
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect();
        ui.label(format!("Other locations: {}", others.join(", ")));
    }
}
