use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Stroke, vec2};

use super::super::ViewModel;
use super::super::render_utils::series_color;

const LEGEND_DOT_RADIUS: f32 = 20.0;
const LEGEND_ROW_SPACING: f32 = 50.0;

impl ViewModel {
    /// One colored disc and query label per series, stacked down the left edge.
    pub(in crate::app) fn draw_legend(&self, painter: &Painter, rect: Rect) {
        let origin = rect.left_top() + vec2(rect.width() * 0.075, rect.height() * 0.05);

        for entry in self.store.legend() {
            let center = origin + vec2(0.0, LEGEND_ROW_SPACING * entry.color_index as f32);
            painter.circle_filled(center, LEGEND_DOT_RADIUS, series_color(entry.color_index));
            painter.circle_stroke(
                center,
                LEGEND_DOT_RADIUS,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            painter.text(
                center + vec2(LEGEND_DOT_RADIUS + 5.0, 0.0),
                Align2::LEFT_CENTER,
                entry.label,
                FontId::proportional(15.0),
                Color32::from_gray(238),
            );
        }
    }
}
