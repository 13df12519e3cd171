use eframe::egui;

use crate::state::AppState;
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl Default for DashboardApp {
    /// Start with the bundled dataset if it is present.
    fn default() -> Self {
        Self {
            state: AppState::with_default_dataset(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: page navigation ----
        egui::SidePanel::left("nav_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: filters + page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.state.page.label());
            if self.state.dataset.is_some() {
                panels::filter_bar(ui, &mut self.state);
                ui.separator();
            }
            pages::page(ui, &mut self.state);
        });
    }
}
