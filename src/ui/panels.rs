use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;
use jobs_dashboard::data::filter::JOB_TITLES;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – page navigation
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Jobs Canada");
    ui.separator();

    ui.strong("Choose a page");
    let mut page = state.page;
    for p in Page::ALL {
        ui.radio_value(&mut page, p, p.label());
    }
    state.set_page(page);

    ui.separator();
    match &state.dataset {
        Some(ds) => {
            ui.label(format!("{} postings", ds.len()));
            ui.label(format!("{} provinces", ds.locations.len()));
            ui.label(format!("{} job titles", ds.titles.len()));
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
}

// ---------------------------------------------------------------------------
// Filter bar – date range, province, job title
// ---------------------------------------------------------------------------

/// Render the filter controls above the page content.
pub fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    let before = state.selection.clone();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Period");
        ui.add(DatePickerButton::new(&mut state.selection.start).id_salt("period_start"));
        ui.label("to");

        let mut open_end = state.selection.end.is_none();
        if let Some(end) = state.selection.end.as_mut() {
            ui.add(DatePickerButton::new(end).id_salt("period_end"));
        }
        if ui
            .checkbox(&mut open_end, "until today")
            .on_hover_text("Leave the end of the period open")
            .changed()
        {
            state.selection.end = if open_end {
                None
            } else {
                Some(chrono::Local::now().date_naive())
            };
        }

        if ui.button("Previous quarter").clicked() {
            state.select_previous_quarter();
        }

        ui.separator();

        if state.page.filters_by_province() {
            let provinces = state
                .dataset
                .as_ref()
                .map(|ds| ds.locations.clone())
                .unwrap_or_default();
            let current = state.selection.location.clone().unwrap_or_default();
            ui.label("Province");
            egui::ComboBox::from_id_salt("province")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for province in provinces {
                        let selected = current == province;
                        if ui.selectable_label(selected, &province).clicked() {
                            state.selection.location = Some(province);
                        }
                    }
                });
            ui.separator();
        }

        ui.label("Job role");
        egui::ComboBox::from_id_salt("job_role")
            .selected_text(&state.selection.title)
            .show_ui(ui, |ui: &mut Ui| {
                for title in JOB_TITLES {
                    ui.selectable_value(&mut state.selection.title, title.to_string(), title);
                }
            });
    });

    if state.selection != before {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} postings loaded, {} matching",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job postings")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(&path);
    }
}
