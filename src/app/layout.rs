use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use eframe::egui::Vec2;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use query_bubbles::pack_with_rng;
use query_bubbles::source::load_series;

use super::{LayoutCache, SourceFile, ViewModel};

impl ViewModel {
    /// Recomputes the packing when the store, cap, padding or canvas size
    /// changed since the last frame.
    pub(in crate::app) fn ensure_layout(&mut self, canvas: Vec2) {
        let resized = self
            .layout_cache
            .as_ref()
            .is_some_and(|cache| (cache.canvas - canvas).length_sq() > 0.25);
        if !self.layout_dirty && !resized && self.layout_cache.is_some() {
            return;
        }

        let items = self.store.flatten();
        let circles = pack_with_rng(
            &items,
            f64::from(canvas.x),
            f64::from(canvas.y),
            f64::from(self.padding),
            &mut self.rng,
        );

        self.layout_cache = Some(LayoutCache { canvas, circles });
        self.layout_dirty = false;
    }

    /// New random paint order for the current layout; positions stay put.
    pub(in crate::app) fn shuffle_draw_order(&mut self) {
        if let Some(cache) = self.layout_cache.as_mut() {
            cache.circles.shuffle(&mut self.rng);
        }
    }

    pub(in crate::app) fn apply_cap(&mut self) {
        self.store.set_cap(self.cap_request);
        self.cap_request = self.store.cap() as i64;
        self.layout_dirty = true;
    }

    pub(in crate::app) fn clear_results(&mut self) {
        self.store.clear();
        self.sources.clear();
        self.layout_dirty = true;
    }

    pub(in crate::app) fn request_add_file(&mut self) {
        let raw = self.path_input.trim();
        if raw.is_empty() || self.add_rx.is_some() {
            return;
        }

        let source = SourceFile {
            path: PathBuf::from(raw),
            label: None,
        };
        let metric = self.metric;
        let (tx, rx) = mpsc::channel();
        let path = source.path.clone();

        thread::spawn(move || {
            let result = load_series(&path, None, metric).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        self.sources.push(source);
        self.add_rx = Some(rx);
        self.path_input.clear();
    }

    /// Drains a finished background load into the store. Returns whether a
    /// load is still pending.
    pub(in crate::app) fn poll_added_file(&mut self) -> bool {
        let Some(rx) = self.add_rx.take() else {
            return false;
        };

        match rx.try_recv() {
            Ok(Ok(series)) => {
                info!(label = %series.label, path = %series.path.display(), "added search results");
                self.store.add_series(series.label, series.items);
                self.last_error = None;
                self.layout_dirty = true;
                false
            }
            Ok(Err(error)) => {
                warn!(%error, "adding search results failed");
                self.sources.pop();
                self.last_error = Some(error);
                false
            }
            Err(TryRecvError::Empty) => {
                self.add_rx = Some(rx);
                true
            }
            Err(TryRecvError::Disconnected) => {
                self.sources.pop();
                self.last_error = Some("Background load worker disconnected".to_owned());
                false
            }
        }
    }
}
