//! Per-bar color schemes.

use crate::audio::NUM_BARS;

/// Formula used to color each bar of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarColorScheme {
    /// Red-to-green across columns, blue rising with row age.
    #[default]
    ComputedGradient,
    /// Plain red.
    SolidColor,
    /// Two-color gradient across columns.
    Gradient2Color,
}

impl BarColorScheme {
    /// Map a host setting value.
    ///
    /// Negative values are rejected. Values beyond the known schemes fall back
    /// to [`BarColorScheme::ComputedGradient`].
    pub fn from_setting(value: i32) -> Option<Self> {
        match value {
            v if v < 0 => None,
            1 => Some(Self::SolidColor),
            2 => Some(Self::Gradient2Color),
            _ => Some(Self::ComputedGradient),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ComputedGradient => "computed-gradient",
            Self::SolidColor => "solid",
            Self::Gradient2Color => "gradient-2-color",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::ComputedGradient, Self::SolidColor, Self::Gradient2Color]
    }
}

/// RGB for the bar at `(column, row)` of a grid with [`NUM_BARS`] columns.
///
/// Components are not clamped; `Gradient2Color` yields red above 1 and
/// negative green, which the render target saturates.
pub fn color_for(column: usize, row: usize, scheme: BarColorScheme) -> [f32; 3] {
    let c = NUM_BARS as f32;
    let x = column as f32;

    match scheme {
        BarColorScheme::ComputedGradient => {
            let b_base = row as f32 * (1.0 / c);
            let r_base = 1.0 - b_base;
            [r_base - x * (r_base / c), x * (1.0 / c), b_base]
        }
        BarColorScheme::SolidColor => [1.0, 0.0, 0.0],
        BarColorScheme::Gradient2Color => {
            let t = (x - c) / c;
            [1.0 - t, t, 0.0]
        }
    }
}
