//! The spectrum visualization component and its host-facing lifecycle.
//!
//! The host drives a [`Visualization`] through a fixed sequence of calls:
//! `start` once playback begins, then `audio_data` for every delivered audio
//! buffer and `render` once per video frame, and finally `stop`. Settings can
//! change at any point through `set_setting`.
//!
//! [`SpectrumVisualization`] has two states. It is Stopped until `start`
//! loads the shader program and allocates GPU resources; `render` and
//! `audio_data` do nothing while Stopped.

use crate::audio::SpectrumHistory;
use crate::gpu::{BarRenderer, GpuError, SceneUniforms, ShaderBackend, ShaderError, ShaderSources};
use crate::host::AddonHost;
use crate::scene::{build_scene, scene_projection, CameraState, PrimitiveMode, SceneGeometry};
use crate::settings::{RenderSettings, SettingStatus, SettingValue};
use glam::Mat4;
use wgpu::TextureView;

/// Audio stream description passed to `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    pub channels: u32,
    pub sample_rate: u32,
    pub bits_per_sample: u32,
    pub track_name: String,
}

/// What the visualization asks of the host's audio pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizationInfo {
    pub wants_frequency_data: bool,
    /// Audio buffers to hold back before calling `audio_data`.
    pub buffer_delay: u32,
}

/// Reasons `start` can fail. The component stays Stopped in every case.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Failed to create or compile shader: {0}")]
    Shader(#[from] ShaderError),
    #[error("Host has no GPU device to render with")]
    NoGpu,
    #[error("Failed to allocate GPU resources: {0}")]
    Gpu(#[from] GpuError),
}

/// Capabilities a host invokes on a visualization.
pub trait Visualization {
    fn start(&mut self, stream: &StreamInfo) -> Result<(), StartError>;

    /// Release GPU resources. Does nothing when already stopped.
    fn stop(&mut self);

    /// Draw one frame.
    fn render(&mut self);

    /// Deliver one audio buffer and the frequency magnitudes computed from it.
    fn audio_data(&mut self, pcm: &[f32], freq: &[f32]);

    fn info(&self) -> VisualizationInfo;

    fn set_setting(&mut self, name: &str, value: &SettingValue) -> SettingStatus;
}

/// Create the spectrum visualization for `host`.
pub fn create_visualization<H: AddonHost + 'static>(host: H) -> Box<dyn Visualization> {
    Box::new(SpectrumVisualization::new(host))
}

/// Geometry and uniforms for one frame.
struct Frame {
    scene: SceneGeometry,
    uniforms: SceneUniforms,
    mode: PrimitiveMode,
}

/// 16x16 grid of spinning spectrum bars.
pub struct SpectrumVisualization<H> {
    host: H,
    backend: ShaderBackend,
    settings: RenderSettings,
    history: SpectrumHistory,
    camera: CameraState,
    projection: Mat4,
    renderer: Option<BarRenderer>,
    logged_layout: bool,
}

impl<H: AddonHost> SpectrumVisualization<H> {
    /// Create a stopped visualization configured from the host's settings.
    pub fn new(host: H) -> Self {
        let settings = RenderSettings::load(|key| host.setting_int(key));
        let mut camera = CameraState::default();
        camera.speed_y = settings.rotation_speed_y;
        camera.fixed_angle_y = settings.rotation_angle_fixed;

        log::info!(
            "Spectrum visualization created: mode={}, colors={}, update lag={}",
            settings.primitive_mode.name(),
            settings.bar_color_scheme.name(),
            settings.update_lag
        );

        Self {
            host,
            backend: ShaderBackend::default(),
            settings,
            history: SpectrumHistory::new(),
            camera,
            projection: Mat4::IDENTITY,
            renderer: None,
            logged_layout: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn history(&self) -> &SpectrumHistory {
        &self.history
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Projection set by the last successful `start`.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// GPU renderer, present while started.
    pub fn renderer(&self) -> Option<&BarRenderer> {
        self.renderer.as_ref()
    }

    /// Draw one frame over the contents of a host-supplied view.
    ///
    /// `view` must match the host viewport. Does nothing while stopped.
    pub fn render_into(&mut self, view: &TextureView) -> Result<(), GpuError> {
        if self.renderer.is_none() {
            return Ok(());
        }
        let frame = self.next_frame();
        if let Some(renderer) = &self.renderer {
            renderer.render_into(view, &frame.scene, &frame.uniforms, frame.mode)?;
        }
        Ok(())
    }

    /// Advance the camera and build the frame's geometry.
    fn next_frame(&mut self) -> Frame {
        self.camera.speed_y = self.settings.rotation_speed_y;
        self.camera.fixed_angle_y = self.settings.rotation_angle_fixed;
        self.camera.advance();

        let mode = self.settings.primitive_mode;
        Frame {
            scene: build_scene(self.history.grid(), self.settings.bar_color_scheme, mode),
            uniforms: SceneUniforms::new(
                self.projection,
                self.camera.model_matrix(),
                self.settings.point_size,
            ),
            mode,
        }
    }
}

impl<H: AddonHost> Visualization for SpectrumVisualization<H> {
    fn start(&mut self, stream: &StreamInfo) -> Result<(), StartError> {
        self.stop();
        log::debug!(
            "Starting for '{}' ({} channels, {} Hz, {} bit)",
            stream.track_name,
            stream.channels,
            stream.sample_rate,
            stream.bits_per_sample
        );

        let vertex = self.host.addon_path(&self.backend.vertex_path());
        let fragment = self.host.addon_path(&self.backend.fragment_path());
        let sources = ShaderSources::load(&vertex, &fragment).inspect_err(|e| {
            log::error!("Failed to create or compile shader: {}", e);
        })?;

        let Some(gpu) = self.host.gpu() else {
            log::warn!("Host provided no GPU device, staying stopped");
            return Err(StartError::NoGpu);
        };
        let program = sources.create_program(&gpu.device);
        let renderer = BarRenderer::new(gpu, &program, self.host.viewport()).map_err(|e| match e {
            GpuError::Pipeline { message, .. } => {
                let e = ShaderError::Link { message };
                log::error!("Failed to create or compile shader: {}", e);
                StartError::Shader(e)
            }
            e => {
                log::error!("Failed to allocate GPU resources: {}", e);
                StartError::Gpu(e)
            }
        })?;
        if self.settings.primitive_mode == PrimitiveMode::Points
            && !renderer.supports_program_point_size()
        {
            log::debug!("Point size {} is ignored by this backend", self.settings.point_size);
        }

        self.history.reset();
        self.projection = scene_projection();
        self.renderer = Some(renderer);
        log::info!("Spectrum visualization started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.release();
            log::info!("Spectrum visualization stopped");
        }
    }

    fn render(&mut self) {
        if self.renderer.is_none() {
            return;
        }
        let frame = self.next_frame();
        if let Some(renderer) = &self.renderer {
            renderer.render(&frame.scene, &frame.uniforms, frame.mode);
        }
    }

    fn audio_data(&mut self, pcm: &[f32], freq: &[f32]) {
        if !self.is_started() {
            return;
        }

        match self.history.update(freq) {
            Ok(()) if !self.logged_layout => {
                log::debug!(
                    "Audio data: pcm length {}, freq length {}, bucket size {}",
                    pcm.len(),
                    freq.len(),
                    self.history.bucket_size(freq.len())
                );
                self.logged_layout = true;
            }
            Ok(()) => {}
            Err(e) => log::error!("{}", e),
        }
    }

    fn info(&self) -> VisualizationInfo {
        VisualizationInfo {
            wants_frequency_data: true,
            buffer_delay: self.settings.update_lag,
        }
    }

    fn set_setting(&mut self, name: &str, value: &SettingValue) -> SettingStatus {
        let host = &self.host;
        self.settings.apply(name, value, |key| host.setting_int(key))
    }
}
