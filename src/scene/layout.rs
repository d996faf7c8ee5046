//! Responsive grid layout for the dice tray
//!
//! Given a container size and an item count, picks a `columns x rows` grid
//! biased toward the container's aspect ratio, the largest uniform die size
//! that fits with padding, and the center of each occupied cell with the
//! whole grid centered in the container.

use glam::Vec2;

use crate::consts::GRID_PADDING;

/// Derived layout for one container size and item count
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFrame {
    /// Uniform die size (layout units); 0 when nothing fits
    pub scale: f32,
    /// Cell centers, one per item, row-major
    pub positions: Vec<Vec2>,
}

impl LayoutFrame {
    /// Layout of an empty tray
    pub fn empty() -> Self {
        Self {
            scale: 0.0,
            positions: Vec::new(),
        }
    }
}

/// Compute the grid layout for `count` dice in a `container`-sized viewport.
///
/// Pure function of its inputs: identical arguments always produce an
/// identical frame, so callers may recompute on every add/remove/resize.
/// A zero-sized container (host not measured yet) degrades to scale 0 with
/// all positions at the origin rather than propagating NaN.
pub fn compute_layout(container: Vec2, count: usize) -> LayoutFrame {
    if count == 0 {
        return LayoutFrame::empty();
    }
    if container.x <= 0.0 || container.y <= 0.0 {
        return LayoutFrame {
            scale: 0.0,
            positions: vec![Vec2::ZERO; count],
        };
    }

    let n = count as f32;
    let aspect = container.x / container.y;
    let columns = ((n * aspect).sqrt().ceil().max(1.0)) as usize;
    let rows = count.div_ceil(columns);

    let pad = GRID_PADDING;
    let cols_f = columns as f32;
    let rows_f = rows as f32;
    let max_cell_width = (container.x - (cols_f + 1.0) * pad) / cols_f;
    let max_cell_height = (container.y - (rows_f + 1.0) * pad) / rows_f;
    // The container's short side caps a lone die; a container smaller than
    // its own padding clamps to the degenerate zero scale
    let scale = max_cell_width
        .min(max_cell_height)
        .min(container.min_element())
        .max(0.0);

    let step = scale + pad;
    let grid = Vec2::new(cols_f * step - pad, rows_f * step - pad);
    let origin = (container - grid) / 2.0;

    let positions = (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            origin + Vec2::new(col as f32 * step + scale / 2.0, row as f32 * step + scale / 2.0)
        })
        .collect();

    LayoutFrame { scale, positions }
}
