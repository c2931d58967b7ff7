use eframe::egui::{self, Key, RichText, Ui};

use query_bubbles::source::WeightMetric;

use super::super::ViewModel;

const PADDING_RANGE: std::ops::RangeInclusive<f32> = 0.0..=120.0;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, reload_requested: &mut bool) {
        ui.heading("Results");
        ui.add_space(4.0);

        ui.label("Add saved search response (JSON path):");
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.path_input);
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
            let pending = self.add_rx.is_some();
            let add_clicked = ui.add_enabled(!pending, egui::Button::new("Add")).clicked();
            if submitted || add_clicked {
                self.request_add_file();
            }
            if pending {
                ui.spinner();
            }
        });

        if let Some(error) = &self.last_error {
            ui.colored_label(egui::Color32::from_rgb(235, 110, 100), error.as_str());
        }

        ui.separator();
        ui.label(RichText::new("Weight").strong());
        let previous_metric = self.metric;
        egui::ComboBox::from_id_salt("weight_metric")
            .selected_text(self.metric.label())
            .show_ui(ui, |ui| {
                for metric in WeightMetric::ALL {
                    ui.selectable_value(&mut self.metric, metric, metric.label());
                }
            });
        if self.metric != previous_metric {
            // Weights are fixed at insertion, so a new metric means reading the files again.
            *reload_requested = true;
        }

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        let ceiling = self.store.policy().ceiling.max(1) as i64;
        let cap_response =
            ui.add(egui::Slider::new(&mut self.cap_request, 1..=ceiling).text("bubbles per series"));
        if cap_response.changed() {
            self.apply_cap();
        }

        let padding_response =
            ui.add(egui::Slider::new(&mut self.padding, PADDING_RANGE).text("padding (px)"));
        if padding_response.changed() {
            self.layout_dirty = true;
        }

        ui.horizontal(|ui| {
            if ui.button("Shuffle draw order").clicked() {
                self.shuffle_draw_order();
            }
            if ui.button("Re-pack").clicked() {
                self.layout_dirty = true;
            }
        });

        ui.separator();
        ui.label(RichText::new("Highlight").strong());
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("fuzzy match on name"));

        ui.separator();
        ui.label(RichText::new("Series").strong());
        if self.store.is_empty() {
            ui.label("No search results yet.");
        }
        for series in self.store.series() {
            let shown = series.items.len().min(self.store.cap());
            ui.label(format!(
                "{}  ({shown} of {} results)",
                series.label,
                series.items.len()
            ));
        }
    }
}
