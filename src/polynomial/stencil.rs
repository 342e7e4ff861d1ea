//! Normalized stencil geometry.
//!
//! Positions are shifted so the center sample sits at 0 and scaled by the
//! width of the center cell. On a uniform grid the nodes are the integers
//! `-(w-1)/2 ..= (w-1)/2` and the center cell is `[-1/2, 1/2]`.

use crate::error::{ReconError, Result};
use crate::samples::cell_edges;

/// Nodes and cell edges of a stencil in normalized coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilGeometry {
    /// Sample positions
    pub nodes: Vec<f64>,
    /// Cell edges, `nodes.len() + 1` entries
    pub edges: Vec<f64>,
}

impl StencilGeometry {
    /// Unit-spaced stencil of odd width centred on 0.
    pub fn uniform(width: usize) -> Self {
        let half = (width / 2) as f64;
        let nodes: Vec<f64> = (0..width).map(|i| i as f64 - half).collect();
        let edges = (0..=width).map(|i| i as f64 - half - 0.5).collect();
        Self { nodes, edges }
    }

    /// Normalize arbitrary strictly increasing positions of odd length.
    pub fn from_positions(positions: &[f64]) -> Result<Self> {
        if positions.len() % 2 == 0 {
            return Err(ReconError::DegenerateStencil(format!(
                "stencil needs an odd number of positions, got {}",
                positions.len()
            )));
        }
        let c = positions.len() / 2;
        let edges = cell_edges(positions);
        let width = edges[c + 1] - edges[c];
        if !(width.is_finite() && width > 0.0) {
            return Err(ReconError::DegenerateStencil(format!(
                "center cell width {width} is not positive"
            )));
        }
        let origin = positions[c];
        Ok(Self {
            nodes: positions.iter().map(|&x| (x - origin) / width).collect(),
            edges: edges.iter().map(|&e| (e - origin) / width).collect(),
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the stencil has no samples.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sub-stencil of `len` samples starting at `start`.
    pub fn sub(&self, start: usize, len: usize) -> Self {
        Self {
            nodes: self.nodes[start..start + len].to_vec(),
            edges: self.edges[start..=start + len].to_vec(),
        }
    }

    /// Edges `[a, b]` of the center cell.
    pub fn center_cell(&self) -> (f64, f64) {
        let c = self.len() / 2;
        (self.edges[c], self.edges[c + 1])
    }

    /// Map a reference offset `xi` in `[-1, 1]` onto the center cell.
    pub fn offset_point(&self, xi: f64) -> f64 {
        let (a, b) = self.center_cell();
        0.5 * (a + b) + 0.5 * xi * (b - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_geometry() {
        let g = StencilGeometry::uniform(5);
        assert_eq!(g.nodes, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(g.edges, vec![-2.5, -1.5, -0.5, 0.5, 1.5, 2.5]);
        assert_eq!(g.center_cell(), (-0.5, 0.5));
        assert_eq!(g.offset_point(1.0), 0.5);
        assert_eq!(g.offset_point(-1.0), -0.5);
    }

    #[test]
    fn test_positions_normalize_to_uniform() {
        let g = StencilGeometry::from_positions(&[10.0, 10.2, 10.4, 10.6, 10.8]).unwrap();
        let u = StencilGeometry::uniform(5);
        for (a, b) in g.nodes.iter().zip(&u.nodes) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in g.edges.iter().zip(&u.edges) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_nonuniform_center_cell() {
        // Center cell spans [0.5, 2.0] around x = 1: width 1.5
        let g = StencilGeometry::from_positions(&[0.0, 1.0, 3.0]).unwrap();
        let (a, b) = g.center_cell();
        assert!((a + 1.0 / 3.0).abs() < 1e-14);
        assert!((b - 2.0 / 3.0).abs() < 1e-14);
        assert!((b - a - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_sub() {
        let g = StencilGeometry::uniform(5);
        let s = g.sub(2, 3);
        assert_eq!(s.nodes, vec![0.0, 1.0, 2.0]);
        assert_eq!(s.edges, vec![-0.5, 0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_even_width_rejected() {
        assert!(StencilGeometry::from_positions(&[0.0, 1.0]).is_err());
    }
}
