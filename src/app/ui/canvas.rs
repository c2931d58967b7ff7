use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Stroke, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use query_bubbles::PlacedCircle;
use query_bubbles::source::Repository;
use query_bubbles::util::{format_count, short_name};

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, canvas_to_screen, circle_visible, dim_color, draw_background, series_color,
};

const HOVER_GROWTH: f32 = 1.2;
const MIN_LABEL_RADIUS: f32 = 26.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Topmost circle under the pointer, honouring paint order.
fn hovered_index(
    circles: &[PlacedCircle<Repository>],
    origin: Pos2,
    pointer: Option<Pos2>,
) -> Option<usize> {
    let pointer = pointer?;
    let x = f64::from(pointer.x - origin.x);
    let y = f64::from(pointer.y - origin.y);
    circles.iter().rposition(|circle| circle.contains(x, y))
}

impl ViewModel {
    fn highlight_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let cache = self.layout_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        Some(
            cache
                .circles
                .iter()
                .enumerate()
                .filter(|(_, circle)| {
                    let repository = &circle.payload;
                    fuzzy_match_score(&matcher, short_name(&repository.full_name), query).is_some()
                        || fuzzy_match_score(&matcher, &repository.name, query).is_some()
                })
                .map(|(index, _)| index)
                .collect(),
        )
    }

    pub(in crate::app) fn draw_bubbles(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.ensure_layout(rect.size());
        let matches = self.highlight_matches();
        let highlight_active = matches.as_ref().is_some_and(|matches| !matches.is_empty());

        let Some(cache) = self.layout_cache.as_ref() else {
            return;
        };

        if cache.circles.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Add a saved search response to see its results.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
            self.draw_legend(&painter, rect);
            return;
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = hovered_index(&cache.circles, rect.left_top(), pointer);

        for (index, circle) in cache.circles.iter().enumerate() {
            let position = canvas_to_screen(rect, circle.x, circle.y);
            let is_hovered = hovered == Some(index);
            let radius = circle.r as f32 * if is_hovered { HOVER_GROWTH } else { 1.0 };
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_match = matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));
            let base_color = series_color(circle.series_index);
            let color = if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.25)
            } else if highlight_active && !is_match {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_match { 2.0 } else { 1.0 },
                    Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                ),
            );

            if radius >= MIN_LABEL_RADIUS || is_hovered {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    short_name(&circle.payload.full_name),
                    FontId::proportional((radius * 0.22).clamp(11.0, 18.0)),
                    Color32::from_gray(245),
                );
            }
        }

        self.draw_legend(&painter, rect);

        let Some(index) = hovered else {
            return;
        };
        let Some(circle) = cache.circles.get(index) else {
            return;
        };
        let repository = circle.payload.clone();
        let label = self
            .store
            .series()
            .get(circle.series_index)
            .map(|series| series.label.clone())
            .unwrap_or_default();
        let weight = repository.metric(self.metric);
        let metric_label = self.metric.label();

        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        let clicked = response.clicked();
        response.on_hover_ui_at_pointer(|ui| {
            ui.label(RichText::new(&repository.name).strong());
            if let Some(description) = &repository.description {
                ui.label(description.as_str());
            }
            ui.add_space(4.0);
            ui.small(format!("{metric_label}: {}", format_count(weight)));
            ui.small(format!("query: {label}"));
        });

        if clicked && !repository.html_url.is_empty() {
            ui.ctx()
                .open_url(egui::OpenUrl::new_tab(repository.html_url.as_str()));
        }
    }
}
