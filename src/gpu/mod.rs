//! GPU rendering using wgpu.
//!
//! The host shares its device and queue through a [`GpuContext`]; a headless
//! context can be created for standalone use. Bars are drawn with one
//! pipeline per primitive mode into either an offscreen target (readable
//! back to the CPU) or a view the host supplies.

pub mod context;
pub mod layouts;
pub mod pipeline;
pub mod pipelines;
pub mod renderer;
pub mod shader;
pub mod textures;

pub use context::{GpuContext, GpuError};
pub use pipeline::{BarPipeline, SceneUniforms};
pub use renderer::{BarRenderer, Viewport};
pub use shader::{ShaderBackend, ShaderError, ShaderProgram, ShaderSources};
