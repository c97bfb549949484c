//! Spectrum Bars
//!
//! A 3D "spectrum bar" music visualization for media-player hosts.
//!
//! # Features
//!
//! - 16x16 scrolling history of per-bar heights built from host-supplied
//!   frequency magnitudes
//! - One shaded cuboid per history cell, spun by a simple camera
//! - Three color schemes and three primitive modes (triangles, lines, points)
//! - GPU rendering via wgpu with WGSL shaders loaded from the add-on install
//! - A standalone host (JSON settings, FFT audio feed) for demos and tests

pub mod audio;
pub mod gpu;
pub mod host;
pub mod scene;
pub mod settings;
pub mod visualization;

// Re-export commonly used types
pub use audio::{HeightGrid, HistoryError, SpectrumAnalyzer, SpectrumHistory, NUM_BARS};
pub use gpu::{BarRenderer, GpuContext, GpuError, ShaderError, Viewport};
pub use host::{AddonHost, FrequencyFeed, StandaloneHost};
pub use scene::{BarColorScheme, CameraState, PrimitiveMode};
pub use settings::{JsonSettingsStore, RenderSettings, SettingStatus, SettingValue, SettingsError};
pub use visualization::{
    create_visualization, SpectrumVisualization, StartError, StreamInfo, Visualization,
    VisualizationInfo,
};
