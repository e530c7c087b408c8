use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::error::LayoutError;
use super::gravity::Gravity;
use super::layout::Layout;
use super::systems::SplitMode;
use super::utils::{apply_inner_gaps, compute_tiling_area, remove_inner_gaps};
use super::LayoutKind;
use crate::common::config::LayoutSettings;
use crate::sys::geometry::{Point, Rect};

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    NextLayout,
    PrevLayout,
    SetLayout(LayoutKind),
    IncreaseMaster,
    DecrementMaster,
    RotateClockwise,
    RotateCounterClockwise,
    SetGravity(Gravity),
    ResetTileSizes,
    SetSplitMode(SplitMode),
}

/// Something the host observed that the layout has to follow.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEvent {
    /// A new tile, optionally dropped at a screen position.
    TileAdded { at: Option<Point> },
    TileRemoved(usize),
    /// The user dragged the window of tile `index` to `frame`.
    TileResized { index: usize, frame: Rect },
    ScreenChanged(Rect),
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    /// Index of the tile an add produced.
    pub inserted: Option<usize>,
    /// Window frames for every tile, in tile order.
    pub frames: Vec<Rect>,
}

/// One screen's worth of tiling: the active layout, the settings it was
/// built from, and the raw screen rectangle before outer gaps.
#[derive(Serialize, Deserialize)]
pub struct TilingEngine {
    settings: LayoutSettings,
    screen: Rect,
    layout: Layout,
}

impl TilingEngine {
    pub fn new(screen: Rect, settings: LayoutSettings) -> Self {
        let area = compute_tiling_area(screen, &settings.gaps);
        let layout = Layout::new(settings.default_layout, area, &settings);
        TilingEngine { settings, screen, layout }
    }

    pub fn layout(&self) -> &Layout { &self.layout }

    pub fn layout_kind(&self) -> LayoutKind { self.layout.kind() }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    pub fn screen(&self) -> Rect { self.screen }

    /// The screen minus outer gaps; the tiles cover exactly this.
    pub fn tiling_area(&self) -> Rect { compute_tiling_area(self.screen, &self.settings.gaps) }

    /// Window frames for every tile, with inner gaps applied.
    pub fn frames(&self) -> Vec<Rect> {
        if self.layout.len() == 1 && !self.settings.gaps_on_single {
            return vec![self.screen];
        }
        let area = self.tiling_area();
        self.layout
            .tiles()
            .iter()
            .map(|tile| apply_inner_gaps(tile.rect, area, &self.settings.gaps))
            .collect()
    }

    pub fn draw_tree(&self) -> String {
        match self.layout.draw_tree() {
            Some(tree) => tree,
            None => {
                let mut out = format!("{}\n", self.layout.name());
                for (i, rect) in self.layout.rects().iter().enumerate() {
                    out.push_str(&format!("  tile {i} [{} {} {}x{}]\n", rect.x, rect.y, rect.width, rect.height));
                }
                out
            }
        }
    }

    fn response(&self, inserted: Option<usize>) -> EventResponse {
        EventResponse { inserted, frames: self.frames() }
    }

    #[instrument(level = "debug", skip(self), fields(layout = self.layout.name()))]
    pub fn handle_event(&mut self, event: LayoutEvent) -> Result<EventResponse, LayoutError> {
        match event {
            LayoutEvent::TileAdded { at } => {
                let index = self.layout.add_tile(at);
                Ok(self.response(Some(index)))
            }
            LayoutEvent::TileRemoved(index) => {
                self.layout.remove_tile(index)?;
                Ok(self.response(None))
            }
            LayoutEvent::TileResized { index, frame } => {
                let rect = remove_inner_gaps(frame, self.tiling_area(), &self.settings.gaps);
                self.layout.resize_tile(index, rect)?;
                Ok(self.response(None))
            }
            LayoutEvent::ScreenChanged(screen) => {
                let area = compute_tiling_area(screen, &self.settings.gaps);
                self.layout.set_layout_area(area)?;
                self.screen = screen;
                Ok(self.response(None))
            }
        }
    }

    #[instrument(level = "debug", skip(self), fields(layout = self.layout.name()))]
    pub fn handle_command(&mut self, command: LayoutCommand) -> EventResponse {
        let enabled = &self.settings.enabled_layouts;
        match command {
            LayoutCommand::NextLayout => {
                if let Some(kind) = self.layout.kind().next_in(enabled) {
                    self.switch_layout(kind);
                }
            }
            LayoutCommand::PrevLayout => {
                if let Some(kind) = self.layout.kind().prev_in(enabled) {
                    self.switch_layout(kind);
                }
            }
            LayoutCommand::SetLayout(kind) => self.switch_layout(kind),
            LayoutCommand::IncreaseMaster => {
                if !self.layout.increase_master() {
                    debug!("master count unchanged");
                }
            }
            LayoutCommand::DecrementMaster => {
                if !self.layout.decrement_master() {
                    debug!("master count unchanged");
                }
            }
            LayoutCommand::RotateClockwise => {
                let gravity = self.layout.gravity().rotated_cw();
                self.layout.set_gravity(gravity);
            }
            LayoutCommand::RotateCounterClockwise => {
                let gravity = self.layout.gravity().rotated_ccw();
                self.layout.set_gravity(gravity);
            }
            LayoutCommand::SetGravity(gravity) => self.layout.set_gravity(gravity),
            LayoutCommand::ResetTileSizes => self.layout.reset_tile_sizes(),
            LayoutCommand::SetSplitMode(mode) => {
                if !self.layout.set_split_mode(mode) {
                    warn!(%mode, "layout has no split modes");
                }
            }
        }
        debug!("Tree:\n{}", self.draw_tree().trim());
        self.response(None)
    }

    /// Replaces the layout with a fresh one of `kind` holding as many tiles
    /// as before. Gravity carries over; dragged sizes do not.
    fn switch_layout(&mut self, kind: LayoutKind) {
        if kind == self.layout.kind() {
            return;
        }
        let count = self.layout.len();
        let settings = LayoutSettings {
            gravity: self.layout.gravity(),
            ..self.settings.clone()
        };
        let mut layout = Layout::new(kind, self.tiling_area(), &settings);
        for _ in 0..count {
            layout.add_tile(None);
        }
        info!(from = self.layout.name(), to = layout.name(), count, "switched layout");
        self.layout = layout;
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        Ok(ron::from_str(&buf)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?.write_all(self.serialize_to_string()?.as_bytes())?;
        Ok(())
    }

    pub fn serialize_to_string(&self) -> Result<String, ron::Error> { ron::ser::to_string(&self) }
}
