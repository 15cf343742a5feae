//! Responsive grid layout for frames.
//!
//! DESIGN
//! ======
//! Stored frame geometry is expressed in grid units for the widest layout.
//! Each breakpoint fits cells to its column count, then compacts them
//! vertically: cells are visited in `(y, x)` order and each rises to the
//! highest row where it overlaps nothing already placed. The result is
//! emitted as CSS grid rules scoped by `min-width` media queries, so the
//! browser picks the layout with no script. Layouts are display-only.

use std::fmt::Write;

use uuid::Uuid;

use crate::services::page::FrameView;

/// Height of one grid row in pixels.
pub const ROW_HEIGHT_PX: u32 = 150;
/// Horizontal gap between cells.
pub const GAP_X_PX: u32 = 10;
/// Vertical gap when edit controls sit under each frame.
pub const GAP_Y_EDIT_PX: u32 = 50;
pub const GAP_Y_VIEW_PX: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub name: &'static str,
    /// Viewport width in pixels at which this breakpoint starts.
    pub min_width: u32,
    pub cols: i32,
}

/// Breakpoints, widest first.
pub const BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint { name: "lg", min_width: 1200, cols: 6 },
    Breakpoint { name: "md", min_width: 996, cols: 4 },
    Breakpoint { name: "sm", min_width: 768, cols: 2 },
    Breakpoint { name: "xs", min_width: 480, cols: 1 },
    Breakpoint { name: "xxs", min_width: 0, cols: 1 },
];

/// A layout cell in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl From<&FrameView> for Cell {
    fn from(frame: &FrameView) -> Self {
        Self { id: frame.id, x: frame.x, y: frame.y, w: frame.width, h: frame.height }
    }
}

impl Cell {
    fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[must_use]
    pub fn collides(&self, other: &Cell) -> bool {
        self.x < other.x + other.w && other.x < self.x + self.w && self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Cells laid out for one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointLayout {
    pub breakpoint: Breakpoint,
    pub cells: Vec<Cell>,
}

/// Clamp a cell so it fits inside `cols` columns.
#[must_use]
pub fn clamp_to_columns(cell: Cell, cols: i32) -> Cell {
    let cols = cols.max(1);
    let w = cell.w.clamp(1, cols);
    Cell { id: cell.id, x: cell.x.clamp(0, cols - w), y: cell.y.max(0), w, h: cell.h.max(1) }
}

/// Fit cells to `cols` columns and compact them vertically.
///
/// The returned cells are in the same order as the input.
#[must_use]
pub fn fit_to_columns(cells: &[Cell], cols: i32) -> Vec<Cell> {
    let mut fitted: Vec<Cell> = cells.iter().map(|c| clamp_to_columns(*c, cols)).collect();

    let mut order: Vec<usize> = (0..fitted.len()).collect();
    order.sort_by_key(|&i| (fitted[i].y, fitted[i].x, i));

    let mut placed: Vec<Cell> = Vec::with_capacity(fitted.len());
    for i in order {
        let mut cell = fitted[i];
        let floor = placed.iter().map(Cell::bottom).max().unwrap_or(0);
        cell.y = cell.y.min(floor);

        // Rise while the row above is free.
        while cell.y > 0 {
            let probe = Cell { y: cell.y - 1, ..cell };
            if placed.iter().any(|p| p.collides(&probe)) {
                break;
            }
            cell.y -= 1;
        }
        // Drop below anything still in the way.
        while let Some(hit) = placed.iter().find(|p| p.collides(&cell)) {
            cell.y = hit.bottom();
        }

        fitted[i] = cell;
        placed.push(cell);
    }

    fitted
}

/// Lay out frames for every breakpoint, widest first.
#[must_use]
pub fn layout(frames: &[FrameView]) -> Vec<BreakpointLayout> {
    let cells: Vec<Cell> = frames.iter().map(Cell::from).collect();
    BREAKPOINTS
        .iter()
        .map(|bp| BreakpointLayout { breakpoint: *bp, cells: fit_to_columns(&cells, bp.cols) })
        .collect()
}

/// DOM id of the element wrapping a frame.
#[must_use]
pub fn cell_dom_id(id: Uuid) -> String {
    format!("frame-{id}")
}

/// CSS for the `.frame-grid` container and every cell at every breakpoint.
///
/// Media queries are emitted narrowest first so wider breakpoints override.
#[must_use]
pub fn stylesheet(layouts: &[BreakpointLayout], editing: bool) -> String {
    let row_gap = if editing { GAP_Y_EDIT_PX } else { GAP_Y_VIEW_PX };
    let mut css = String::new();
    let _ = writeln!(
        css,
        ".frame-grid{{display:grid;grid-auto-rows:{ROW_HEIGHT_PX}px;column-gap:{GAP_X_PX}px;row-gap:{row_gap}px;}}"
    );

    for bp_layout in layouts.iter().rev() {
        let bp = bp_layout.breakpoint;
        let mut rules = format!(".frame-grid{{grid-template-columns:repeat({},minmax(0,1fr));}}", bp.cols);
        for cell in &bp_layout.cells {
            let _ = write!(
                rules,
                "#{}{{grid-column:{} / span {};grid-row:{} / span {};}}",
                cell_dom_id(cell.id),
                cell.x + 1,
                cell.w,
                cell.y + 1,
                cell.h
            );
        }

        if bp.min_width == 0 {
            let _ = writeln!(css, "{rules}");
        } else {
            let _ = writeln!(css, "@media (min-width:{}px){{{rules}}}", bp.min_width);
        }
    }

    css
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;
