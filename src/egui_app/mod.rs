//! Interactive window for the block tree (feature = "egui").
//!
//! [`TreeApp`] is a rendering collaborator only: it draws the [`Scene`]
//! produced by the canvas and turns egui pointer input into
//! [`CanvasEvent`](crate::canvas::CanvasEvent)s. It never touches block
//! positions directly.
//!
//! [`Scene`]: crate::model::Scene

#![cfg(feature = "egui")]

mod ui;

use crate::canvas::Canvas;
use crate::config::Config;

pub use ui::{tree_update, TreeStyle};

/// eframe application wrapping a [`Canvas`].
#[derive(Debug, Clone)]
pub struct TreeApp {
    pub canvas: Canvas,
    pub style: TreeStyle,
}

impl TreeApp {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            style: TreeStyle::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Canvas::from_config(config))
    }
}

impl eframe::App for TreeApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            ui::tree_update(self, ui);
        });
    }
}
