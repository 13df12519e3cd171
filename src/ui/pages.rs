use eframe::egui::{self, RichText, ScrollArea, Ui};
use jobs_dashboard::data::aggregate::{
    category_counts, province_totals, value_counts, Kpis, TopN,
};
use jobs_dashboard::data::filter::search_indices;
use jobs_dashboard::data::model::{Column, JobRecord};
use jobs_dashboard::data::timeseries::monthly_counts;
use jobs_dashboard::format::{format_number, format_range};

use crate::state::{AppState, Page};
use crate::ui::charts::{self, BarColoring};
use crate::ui::table;

/// Share of the width given to the narrow left column.
const LEFT_COLUMN_SHARE: f32 = 0.28;

/// Render the active page below the filter bar.
pub fn page(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore job postings  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::Home => home(ui, state),
            Page::Overview => overview(ui, state),
            Page::Market => market(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

/// Narrow left column next to a wide right column.
fn split(ui: &mut Ui, left: impl FnOnce(&mut Ui), right: impl FnOnce(&mut Ui)) {
    let left_width = ui.available_width() * LEFT_COLUMN_SHARE;
    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.set_width(left_width);
            left(ui);
        });
        ui.separator();
        ui.vertical(|ui: &mut Ui| right(ui));
    });
}

/// A labelled number with a short-form delta underneath.
fn metric(ui: &mut Ui, label: &str, value: String, delta: Option<String>) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(140.0);
        ui.label(label);
        ui.heading(value);
        if let Some(delta) = delta {
            ui.label(RichText::new(format!("↑ {delta}")).color(egui::Color32::LIGHT_GREEN));
        }
    });
}

fn salary_metric(ui: &mut Ui, kpis: &Kpis) {
    metric(
        ui,
        "Annual Salary Range",
        format_range(kpis.min_salary, kpis.max_salary),
        None,
    );
}

fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    ui.horizontal(|ui: &mut Ui| {
        metric(
            ui,
            "Demand Increase",
            kpis.demand.to_string(),
            Some(format_number(kpis.demand as f64)),
        );
        metric(
            ui,
            "Number of Companies",
            kpis.companies.to_string(),
            Some(format_number(kpis.companies as f64)),
        );
        metric(
            ui,
            "Number of Jobs",
            kpis.jobs.to_string(),
            Some(format_number(kpis.jobs as f64)),
        );
    });
}

fn pie_section(ui: &mut Ui, heading: &str, id: &str, records: &[&JobRecord], column: Column) {
    ui.heading(heading);
    let data = category_counts(records.iter().copied(), column, TopN::All);
    charts::pie_chart(ui, id, &data);
}

fn bar_section(ui: &mut Ui, heading: &str, id: &str, records: &[&JobRecord], column: Column, top: TopN) {
    ui.heading(heading);
    let data = category_counts(records.iter().copied(), column, top);
    charts::bar_chart(ui, id, column, &data, BarColoring::Categorical);
}

fn province_map(ui: &mut Ui, heading: &str, id: &str, records: &[&JobRecord]) {
    ui.heading(heading);
    charts::choropleth(ui, id, &province_totals(records.iter().copied()));
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn home(ui: &mut Ui, state: &AppState) {
    let records = state.visible_records();
    ui.heading(RichText::new("Jobs Canada 🍁").size(28.0));
    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        province_map(&mut cols[0], "Postings across Canada", "home_map", &records);
        pie_section(
            &mut cols[1],
            "Provinces Distribution",
            "home_provinces",
            &records,
            Column::Locations,
        );
    });
}

fn overview(ui: &mut Ui, state: &mut AppState) {
    {
        let records = state.visible_records();
        let kpis = Kpis::compute(records.iter().copied());

        split(
            ui,
            |ui: &mut Ui| {
                salary_metric(ui, &kpis);
                pie_section(ui, "Languages Required", "languages", &records, Column::Language);
                pie_section(
                    ui,
                    "Education Level Required",
                    "education",
                    &records,
                    Column::EducationLevel,
                );
            },
            |ui: &mut Ui| {
                kpi_row(ui, &kpis);
                ui.columns(2, |cols: &mut [Ui]| {
                    bar_section(
                        &mut cols[0],
                        "Soft Skills",
                        "soft_skills",
                        &records,
                        Column::SoftSkills,
                        TopN::All,
                    );
                    bar_section(
                        &mut cols[1],
                        "Top 5 cities by postings",
                        "top_cities",
                        &records,
                        Column::City,
                        TopN::Count(5),
                    );
                });
            },
        );
    }
    listings_section(ui, state);
}

fn market(ui: &mut Ui, state: &AppState) {
    let records = state.visible_records();
    let kpis = Kpis::compute(records.iter().copied());

    split(
        ui,
        |ui: &mut Ui| {
            salary_metric(ui, &kpis);
            pie_section(ui, "Work Mode", "work_mode", &records, Column::WorkMode);
            pie_section(
                ui,
                "Expertise Level Required",
                "expertise",
                &records,
                Column::EducationLevel,
            );
        },
        |ui: &mut Ui| {
            kpi_row(ui, &kpis);
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].heading("Job Openings Over Time");
                let series = monthly_counts(records.iter().copied());
                charts::line_chart(&mut cols[0], "openings", &series);

                bar_section(
                    &mut cols[1],
                    "Skills Required",
                    "skills",
                    &records,
                    Column::Skills,
                    TopN::All,
                );
            });
            ui.columns(2, |cols: &mut [Ui]| {
                province_map(&mut cols[0], "Job Distribution in Canada", "market_map", &records);

                cols[1].heading("Job Distribution by Sector");
                let sectors = value_counts(records.iter().copied(), Column::Sectors, TopN::All);
                charts::bar_chart(
                    &mut cols[1],
                    "sectors",
                    Column::Sectors,
                    &sectors,
                    BarColoring::ByCount,
                );
            });
        },
    );
}

/// Search box plus the listings table, narrowed by the search term.
fn listings_section(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(8.0);
    ui.add(
        egui::TextEdit::singleline(&mut state.search)
            .hint_text("Search for a job")
            .desired_width(f32::INFINITY),
    );

    let Some(ds) = &state.dataset else {
        return;
    };
    let matching = search_indices(ds, &state.visible_indices, &state.search);
    let records: Vec<&JobRecord> = ds.select(&matching).collect();

    ui.heading("Job Listings");
    table::listings(ui, &records);
}
