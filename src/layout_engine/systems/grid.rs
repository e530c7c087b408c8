use serde::{Deserialize, Serialize};
use tracing::trace;

use super::master::MasterArea;
use super::{LayoutStrategy, TileFrame};
use crate::common::config::LayoutSettings;
use crate::layout_engine::LayoutKind;
use crate::layout_engine::layout::Tile;
use crate::layout_engine::utils::{ceil_sqrt, fit_spans};
use crate::sys::geometry::{Point, Rect};

/// Masters on the left as in the half layout, slaves in a square-ish grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    master: MasterArea,
}

/// Columns and rows of a grid holding `slaves` cells.
pub fn get_grid_measurements(slaves: usize) -> (usize, usize) {
    if slaves == 0 {
        return (0, 0);
    }
    let columns = ceil_sqrt(slaves);
    (columns, slaves.div_ceil(columns))
}

/// 1-based `(column, row)` of the slave at `index`.
///
/// Cells fill in L-shaped shells: shell `a` first goes down column `a + 1`,
/// then along row `a + 1`. Growing the grid therefore never moves an
/// existing cell.
pub fn grid_cell(index: usize) -> (usize, usize) {
    let a = ceil_sqrt(index + 1) - 1;
    // index >= a * a, so this is i - (a² - 1) without going negative.
    let offset = index + 1 - a * a;
    if offset <= a {
        (a + 1, offset)
    } else {
        (offset - a, a + 1)
    }
}

/// Inverse of [`grid_cell`].
pub fn cell_index(column: usize, row: usize) -> usize {
    if row < column {
        (column - 1) * (column - 1) + row - 1
    } else {
        (row - 1) * (row - 1) + (row - 1) + column - 1
    }
}

/// Column widths and row heights of the slave grid as it is on screen.
struct GridShape {
    master_width: f64,
    columns: Vec<f64>,
    rows: Vec<f64>,
}

impl GridLayout {
    pub fn new(settings: &LayoutSettings) -> Self {
        GridLayout {
            master: MasterArea {
                count: settings.master_count,
                ratio: settings.master_ratio,
            },
        }
    }

    fn measure(&self, screen: Rect, tiles: &[Tile]) -> GridShape {
        let masters = self.master.effective(tiles.len());
        let slaves = &tiles[masters..];
        let (columns, rows) = get_grid_measurements(slaves.len());
        let size_of = |column: usize, row: usize, f: fn(&Rect) -> f64| {
            slaves.get(cell_index(column, row)).map(|t| f(&t.rect))
        };
        GridShape {
            master_width: self.master.width(screen, tiles),
            columns: (1..=columns)
                .map(|c| size_of(c, 1, |r| r.width))
                .collect::<Option<Vec<_>>>()
                .unwrap_or_default(),
            rows: (1..=rows)
                .map(|r| size_of(1, r, |r| r.height))
                .collect::<Option<Vec<_>>>()
                .unwrap_or_default(),
        }
    }

    fn arrange(&self, screen: Rect, tiles: &mut [Tile], shape: GridShape) {
        let masters = self.master.effective(tiles.len());
        let slaves = tiles.len() - masters;
        let (master_rects, rest) = self.master.split(screen, masters, slaves, shape.master_width);
        for (tile, rect) in tiles.iter_mut().zip(master_rects) {
            tile.rect = rect;
        }
        let Some(area) = rest else {
            return;
        };

        let (columns, rows) = get_grid_measurements(slaves);
        let column_spans = fit_spans(&reshape(shape.columns, columns), area.x, area.width);
        let row_spans = fit_spans(&reshape(shape.rows, rows), area.y, area.height);
        trace!(columns, rows, "grid shape");

        for (i, tile) in tiles[masters..].iter_mut().enumerate() {
            let (column, row) = grid_cell(i);
            let (x, width) = column_spans[column - 1];
            let (y, height) = row_spans[row - 1];
            let last_in_column = row == rows || cell_index(column, row + 1) >= slaves;
            let bottom = if last_in_column { area.bottom() } else { y + height };
            tile.rect = Rect::from_edges(x, y, x + width, bottom);
        }
    }

    fn relayout(&self, frame: TileFrame<'_>, shape: GridShape) {
        self.arrange(frame.screen, frame.tiles, shape);
    }
}

/// Fits measured sizes to a new count. Existing sizes are kept; new columns
/// or rows get the mean size, so growing rescales everything uniformly.
fn reshape(mut sizes: Vec<f64>, count: usize) -> Vec<f64> {
    if sizes.is_empty() {
        return vec![1.0; count];
    }
    let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
    sizes.resize(count, mean);
    sizes
}

impl LayoutStrategy for GridLayout {
    fn name(&self) -> &'static str { "Grid" }

    fn kind(&self) -> LayoutKind { LayoutKind::Grid }

    fn add_tile(&mut self, frame: TileFrame<'_>, _at: Option<Point>) -> usize {
        let shape = self.measure(frame.screen, frame.tiles);
        frame.tiles.push(Tile::default());
        let index = frame.tiles.len() - 1;
        self.relayout(frame, shape);
        index
    }

    fn remove_tile(&mut self, frame: TileFrame<'_>, index: usize) {
        let shape = self.measure(frame.screen, frame.tiles);
        frame.tiles.remove(index);
        self.relayout(frame, shape);
    }

    fn increase_master(&mut self, frame: TileFrame<'_>) -> bool {
        let shape = self.measure(frame.screen, frame.tiles);
        if !self.master.increase(frame.tiles.len()) {
            return false;
        }
        self.relayout(frame, shape);
        true
    }

    fn decrement_master(&mut self, frame: TileFrame<'_>) -> bool {
        let shape = self.measure(frame.screen, frame.tiles);
        if !self.master.decrement(frame.tiles.len()) {
            return false;
        }
        self.relayout(frame, shape);
        true
    }

    fn master_count(&self) -> usize { self.master.count }
}
