//! Cuboid mesh for a single bar.

use super::PrimitiveMode;

/// Footprint width of a bar along X and Z.
pub const BAR_WIDTH: f32 = 0.1;

/// Vertices per bar: 12 on the bottom, 6 per side, 12 on the top. Listed
/// explicitly, no index buffer.
pub const VERTICES_PER_BAR: usize = 48;

/// Side shading when drawing filled triangles, in generation order.
const TRIANGLE_SIDE_SHADES: [f32; 4] = [0.5, 0.25, 0.75, 0.5];

/// Positions and colors of one bar, one entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMesh {
    pub positions: [[f32; 3]; VERTICES_PER_BAR],
    pub colors: [[f32; 3]; VERTICES_PER_BAR],
}

/// Color multipliers for the four side faces.
///
/// Lines and points have no filled faces, so they stay unshaded.
pub fn side_multipliers(mode: PrimitiveMode) -> [f32; 4] {
    match mode {
        PrimitiveMode::Triangles => TRIANGLE_SIDE_SHADES,
        PrimitiveMode::Lines | PrimitiveMode::Points => [1.0; 4],
    }
}

/// Build the cuboid standing at `(x, z)` from `y = 0` up to `y = height`.
///
/// Negative heights are emitted as-is and produce a downward cuboid.
pub fn build_bar(x: f32, z: f32, height: f32, rgb: [f32; 3], mode: PrimitiveMode) -> BarMesh {
    let w = BAR_WIDTH;
    let (x0, x1) = (x, x + w);
    let (z0, z1) = (z, z + w);
    let h = height;

    let positions = [
        // Bottom
        [x1, 0.0, z1],
        [x0, 0.0, z0],
        [x1, 0.0, z0],
        [x1, 0.0, z1],
        [x0, 0.0, z1],
        [x0, 0.0, z0],
        [x0, 0.0, z1],
        [x1, 0.0, z0],
        [x1, 0.0, z1],
        [x0, 0.0, z1],
        [x1, 0.0, z0],
        [x0, 0.0, z0],
        // Side x0
        [x0, 0.0, z0],
        [x0, 0.0, z1],
        [x0, h, z1],
        [x0, 0.0, z0],
        [x0, h, z1],
        [x0, h, z0],
        // Side z0
        [x1, h, z0],
        [x0, 0.0, z0],
        [x0, h, z0],
        [x1, h, z0],
        [x1, 0.0, z0],
        [x0, 0.0, z0],
        // Side z1
        [x0, h, z1],
        [x0, 0.0, z1],
        [x1, 0.0, z1],
        [x1, h, z1],
        [x0, h, z1],
        [x1, 0.0, z1],
        // Side x1
        [x1, h, z1],
        [x1, 0.0, z0],
        [x1, h, z0],
        [x1, 0.0, z0],
        [x1, h, z1],
        [x1, 0.0, z1],
        // Top
        [x1, h, z1],
        [x1, h, z0],
        [x0, h, z0],
        [x1, h, z1],
        [x0, h, z0],
        [x0, h, z1],
        [x0, h, z1],
        [x1, h, z0],
        [x0, h, z0],
        [x1, h, z0],
        [x1, h, z1],
        [x0, h, z1],
    ];

    let [r, g, b] = rgb;
    let shades = side_multipliers(mode);
    let mut colors = [rgb; VERTICES_PER_BAR];
    for (face, shade) in shades.iter().enumerate() {
        let start = 12 + face * 6;
        colors[start..start + 6].fill([r * shade, g * shade, b * shade]);
    }

    BarMesh { positions, colors }
}
