//! Connected-component labelling of conductive cells
//!
//! Cells with `conductivity > 0` are grouped under 8-connectivity. Heat may only
//! flow between cells sharing a non-zero label. Labels are assigned in
//! row-major order of each component's first cell, starting at 1; label 0 marks
//! non-conductive cells. The map is rebuilt every tick since occupancy changes
//! arbitrarily between ticks.

use super::fields::FieldData;
use crate::core_types::GridCoord;

/// Label value for cells that belong to no component
pub const NO_COMPONENT: u32 = 0;

/// Per-cell component labels for one tick
#[derive(Debug, Clone)]
pub struct ComponentMap {
    labels: Vec<u32>,
    /// Flood-fill scratch, not part of the map's value
    stack: Vec<usize>,
    rows: usize,
    cols: usize,
    count: u32,
}

impl ComponentMap {
    /// Create an empty map (every cell unlabelled)
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            labels: vec![NO_COMPONENT; rows * cols],
            stack: Vec::new(),
            rows,
            cols,
            count: 0,
        }
    }

    /// Label the components of `conductivity`
    #[must_use]
    pub fn compute(conductivity: &FieldData) -> Self {
        let mut map = Self::new(conductivity.rows, conductivity.cols);
        map.recompute(conductivity);
        map
    }

    /// Relabel in place, reusing the label and stack buffers
    pub fn recompute(&mut self, conductivity: &FieldData) {
        self.rows = conductivity.rows;
        self.cols = conductivity.cols;
        self.labels.clear();
        self.labels.resize(self.rows * self.cols, NO_COMPONENT);
        self.stack.clear();
        self.count = 0;

        let values = conductivity.as_slice();
        for seed in 0..values.len() {
            if values[seed] <= 0.0 || self.labels[seed] != NO_COMPONENT {
                continue;
            }

            self.count += 1;
            let label = self.count;
            self.labels[seed] = label;
            self.stack.push(seed);

            while let Some(idx) = self.stack.pop() {
                let cell = GridCoord::from_index(idx, self.cols);
                for neighbor in cell.neighbors_8(self.rows, self.cols) {
                    let nidx = neighbor.index(self.cols);
                    if values[nidx] > 0.0 && self.labels[nidx] == NO_COMPONENT {
                        self.labels[nidx] = label;
                        self.stack.push(nidx);
                    }
                }
            }
        }
    }

    /// Number of components found
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Row-major labels
    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label at `coord`; `None` outside the grid, `Some(0)` for non-conductive cells
    #[must_use]
    pub fn component_at(&self, coord: GridCoord) -> Option<u32> {
        coord
            .in_bounds(self.rows, self.cols)
            .then(|| self.labels[coord.index(self.cols)])
    }

    /// Whether two cells (by flat index) share a non-zero label
    #[inline]
    #[must_use]
    pub fn connected(&self, a: usize, b: usize) -> bool {
        let label = self.labels[a];
        label != NO_COMPONENT && label == self.labels[b]
    }
}

impl PartialEq for ComponentMap {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.count == other.count
            && self.labels == other.labels
    }
}

impl Eq for ComponentMap {}

/// Label the conductive components of a conductivity field
#[must_use]
pub fn compute_components(conductivity: &FieldData) -> ComponentMap {
    ComponentMap::compute(conductivity)
}
