//! Basic layout engine
//!
//! Places nodes on a grid in declaration order, `ceil(sqrt(n))` columns wide.
//! Column widths and row heights follow the largest node in each, so boxes
//! never overlap.

use log::debug;

use astrolabe_core::geometry::Point;

use crate::{
    error::AstrolabeError,
    layout::{self, LayoutGraph},
};

pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
        }
    }

    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    fn column_count(node_count: usize) -> usize {
        let mut columns = 1;
        while columns * columns < node_count {
            columns += 1;
        }
        columns
    }

    /// Offsets of consecutive cells of the given extents, cell centers.
    fn cell_centers(extents: &[f32], spacing: f32) -> Vec<f32> {
        let mut cursor = 0.0;
        extents
            .iter()
            .map(|extent| {
                let center = cursor + extent / 2.0;
                cursor += extent + spacing;
                center
            })
            .collect()
    }
}

impl layout::Engine for Engine {
    fn positions(&self, graph: &LayoutGraph) -> Result<Vec<Point>, AstrolabeError> {
        let count = graph.node_count();
        if count == 0 {
            return Ok(Vec::new());
        }

        let columns = Self::column_count(count);
        let rows = count.div_ceil(columns);
        debug!(columns = columns, rows = rows; "Arranging nodes on a grid");

        let mut column_widths = vec![0.0_f32; columns];
        let mut row_heights = vec![0.0_f32; rows];
        for index in 0..count {
            let size = graph.size(index);
            let (row, column) = (index / columns, index % columns);
            column_widths[column] = column_widths[column].max(size.width());
            row_heights[row] = row_heights[row].max(size.height());
        }

        let xs = Self::cell_centers(&column_widths, self.horizontal_spacing);
        let ys = Self::cell_centers(&row_heights, self.vertical_spacing);

        Ok((0..count)
            .map(|index| Point::new(xs[index % columns], ys[index / columns]))
            .collect())
    }
}
