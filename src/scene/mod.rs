//! Scene geometry for the spectrum bars.
//!
//! Turns the height grid into one cuboid per cell:
//! - X follows the frequency column
//! - Z follows the time row, newest row furthest back
//! - Y is the bar height
//!
//! Colors come from the selected [`BarColorScheme`], and the whole scene is
//! spun by the [`CameraState`] model matrix.

mod camera;
mod color;
mod mesh;

pub use camera::{frustum, scene_projection, CameraState};
pub use color::{color_for, BarColorScheme};
pub use mesh::{build_bar, side_multipliers, BarMesh, BAR_WIDTH, VERTICES_PER_BAR};

use crate::audio::HeightGrid;

/// Spacing between neighbouring bars.
const BAR_SPACING: f64 = 0.2;

/// Offset of the first bar on both ground axes.
const GRID_ORIGIN: f64 = -1.6;

/// How the bar vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    #[default]
    Triangles,
    Lines,
    Points,
}

impl PrimitiveMode {
    /// Map a host setting value; anything unknown draws triangles.
    pub fn from_setting(value: i32) -> Self {
        match value {
            1 => Self::Lines,
            2 => Self::Points,
            _ => Self::Triangles,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Triangles => "triangles",
            Self::Lines => "lines",
            Self::Points => "points",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Triangles, Self::Lines, Self::Points]
    }
}

/// Ground-plane origin `(x, z)` of the bar for grid cell `(row, col)`.
///
/// Row 0 (newest) sits at the largest Z.
pub fn bar_origin(row: usize, col: usize, rows: usize) -> (f32, f32) {
    let x = GRID_ORIGIN + col as f64 * BAR_SPACING;
    let z = GRID_ORIGIN + (rows - row) as f64 * BAR_SPACING;
    (x as f32, z as f32)
}

/// Vertex streams for every bar of one frame, in draw order.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl SceneGeometry {
    /// Number of bars contained.
    pub fn bar_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_BAR
    }

    /// Vertex range of bar `index` inside the streams.
    pub fn bar_range(index: usize) -> std::ops::Range<u32> {
        let start = (index * VERTICES_PER_BAR) as u32;
        start..start + VERTICES_PER_BAR as u32
    }
}

/// Build the meshes of every grid cell, row-major with rows outermost.
pub fn build_scene(grid: &HeightGrid, scheme: BarColorScheme, mode: PrimitiveMode) -> SceneGeometry {
    let capacity = grid.rows() * grid.cols() * VERTICES_PER_BAR;
    let mut scene = SceneGeometry {
        positions: Vec::with_capacity(capacity),
        colors: Vec::with_capacity(capacity),
    };

    for (row, col, height) in grid.cells() {
        let (x, z) = bar_origin(row, col, grid.rows());
        let mesh = build_bar(x, z, height, color_for(col, row, scheme), mode);
        scene.positions.extend_from_slice(&mesh.positions);
        scene.colors.extend_from_slice(&mesh.colors);
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SpectrumHistory, NUM_BARS};

    #[test]
    fn test_primitive_mode_from_setting() {
        assert_eq!(PrimitiveMode::from_setting(0), PrimitiveMode::Triangles);
        assert_eq!(PrimitiveMode::from_setting(1), PrimitiveMode::Lines);
        assert_eq!(PrimitiveMode::from_setting(2), PrimitiveMode::Points);
        assert_eq!(PrimitiveMode::from_setting(9), PrimitiveMode::Triangles);
    }

    #[test]
    fn test_bar_origin_layout() {
        let (x, z) = bar_origin(0, 0, NUM_BARS);
        assert!((x + 1.6).abs() < 1e-6);
        assert!((z - 1.6).abs() < 1e-6);

        let (x, z) = bar_origin(NUM_BARS - 1, NUM_BARS - 1, NUM_BARS);
        assert!((x - 1.4).abs() < 1e-6);
        assert!((z + 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_scene_has_one_mesh_per_cell() {
        let history = SpectrumHistory::new();
        let scene = build_scene(history.grid(), BarColorScheme::default(), PrimitiveMode::Triangles);

        assert_eq!(scene.bar_count(), NUM_BARS * NUM_BARS);
        assert_eq!(scene.positions.len(), scene.colors.len());
        assert_eq!(SceneGeometry::bar_range(1), 48..96);
    }

    #[test]
    fn test_newest_row_heights_reach_scene() {
        let mut history = SpectrumHistory::new();
        history.update(&[1.0; 256]).unwrap();
        let scene = build_scene(history.grid(), BarColorScheme::SolidColor, PrimitiveMode::Lines);

        let first_bar = &scene.positions[..VERTICES_PER_BAR];
        assert!(first_bar.iter().any(|p| p[1] == 16.0));
        let second_row_bar = &scene.positions[NUM_BARS * VERTICES_PER_BAR..][..VERTICES_PER_BAR];
        assert!(second_row_bar.iter().all(|p| p[1] == 0.0));
    }
}
