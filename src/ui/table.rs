use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};
use jobs_dashboard::data::model::JobRecord;

const ROW_HEIGHT: f32 = 20.0;

/// Job listings with the `title, sectors, salary, link` columns.
pub fn listings(ui: &mut Ui, records: &[&JobRecord]) {
    if records.is_empty() {
        ui.label("No postings match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(160.0))
        .column(TableColumn::auto().at_least(140.0))
        .column(TableColumn::auto().at_least(80.0))
        .column(TableColumn::remainder())
        .header(ROW_HEIGHT, |mut header| {
            for name in ["Title", "Sectors", "Salary", "Link"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let rec = records[row.index()];
                row.col(|ui| {
                    ui.label(&rec.title);
                });
                row.col(|ui| {
                    ui.label(rec.sectors.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    match rec.salary {
                        Some(s) => ui.label(format!("{s:.0}")),
                        None => ui.label("—"),
                    };
                });
                row.col(|ui| {
                    if rec.link.is_empty() {
                        ui.label("—");
                    } else {
                        ui.hyperlink_to(&rec.link, &rec.link);
                    }
                });
            });
        });
}
