//! The boundary between the visualization and the media player hosting it.
//!
//! [`AddonHost`] is everything the component asks of its host. The
//! [`StandaloneHost`] and [`FrequencyFeed`] stand in for a real player when
//! running demos and tests.

mod feed;

pub use feed::FrequencyFeed;

use crate::gpu::{GpuContext, Viewport};
use crate::settings::JsonSettingsStore;
use std::path::{Path, PathBuf};

/// Services the host provides to the visualization.
pub trait AddonHost {
    /// Resolve a path relative to the add-on install directory.
    fn addon_path(&self, relative: &str) -> PathBuf;

    /// Host-persisted integer setting, `None` if never stored.
    fn setting_int(&self, name: &str) -> Option<i32>;

    /// GPU device shared by the host, if one is available.
    fn gpu(&self) -> Option<GpuContext>;

    /// Surface the visualization draws into.
    fn viewport(&self) -> Viewport;
}

/// Host backed by a directory on disk and a JSON settings store.
#[derive(Debug)]
pub struct StandaloneHost {
    install_dir: PathBuf,
    settings: JsonSettingsStore,
    gpu: Option<GpuContext>,
    viewport: Viewport,
}

impl StandaloneHost {
    /// Host with no settings stored, no GPU and the default viewport.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            settings: JsonSettingsStore::default(),
            gpu: None,
            viewport: Viewport::default(),
        }
    }

    pub fn with_settings(mut self, settings: JsonSettingsStore) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuContext) -> Self {
        self.gpu = Some(gpu);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn settings(&self) -> &JsonSettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut JsonSettingsStore {
        &mut self.settings
    }
}

impl AddonHost for StandaloneHost {
    fn addon_path(&self, relative: &str) -> PathBuf {
        self.install_dir.join(relative)
    }

    fn setting_int(&self, name: &str) -> Option<i32> {
        self.settings.get(name)
    }

    fn gpu(&self) -> Option<GpuContext> {
        self.gpu.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
