use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.poll_added_file() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("query-bubbles");
                    ui.separator();
                    ui.label(format!("series: {}", self.store.series().len()));
                    ui.label(format!("results: {}", self.store.total_items()));
                    ui.label(format!("cap: {} per series", self.store.cap()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload results"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Clear results").clicked() {
                        self.clear_results();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(cache) = &self.layout_cache {
                            ui.label(format!("bubbles: {}", cache.circles.len()));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui, reload_requested));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading search results...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_bubbles(ui);
            }
        });
    }
}
