//! GPU context initialization and management.

use super::renderer::Viewport;
use std::sync::Arc;
use wgpu::{Device, Instance, Queue};

/// Errors that can occur during GPU operations.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("Failed to create render pipeline {label}: {message}")]
    Pipeline { label: &'static str, message: String },
    #[error("Viewport {width}x{height} is outside 1..={max} pixels")]
    Viewport { width: u32, height: u32, max: u32 },
    #[error("Render target is {found:?}, expected {expected:?}")]
    TargetMismatch { expected: Viewport, found: Viewport },
    #[error("Device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("Failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),
    #[error("Readback was cancelled before the buffer mapped")]
    MapCancelled,
    #[error("Readback size does not match the viewport")]
    Readback,
}

/// Shared device and queue handles.
///
/// The host normally owns the device and passes clones of its handles in;
/// [`GpuContext::new`] creates a headless one for standalone use.
#[derive(Clone)]
pub struct GpuContext {
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Create a new GPU context for headless rendering.
    pub async fn new() -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::METAL | wgpu::Backends::VULKAN | wgpu::Backends::GL,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("spectrum-bars"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info: adapter.get_info(),
        })
    }

    /// Blocking variant of [`GpuContext::new`] for callers without a runtime.
    pub fn new_blocking() -> Result<Self, GpuError> {
        pollster::block_on(Self::new())
    }

    /// Wrap handles owned by a host.
    pub fn from_parts(device: Arc<Device>, queue: Arc<Queue>, adapter_info: wgpu::AdapterInfo) -> Self {
        Self {
            device,
            queue,
            adapter_info,
        }
    }

    /// Get info about the GPU adapter.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("adapter", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpu_context_creation() {
        let ctx = GpuContext::new().await;
        // May fail on CI without GPU, so just check it doesn't panic
        if let Ok(ctx) = ctx {
            let clone = ctx.clone();
            assert!(Arc::ptr_eq(&ctx.device, &clone.device));
            assert_eq!(clone.adapter_info().name, ctx.adapter_info().name);
        }
    }
}
