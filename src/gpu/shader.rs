//! Shader program loading.
//!
//! The vertex and fragment stages live in two files under the add-on's
//! `resources/shaders/<backend>/` directory. Loading reads both, compiles
//! each with naga and checks that the expected entry points exist before
//! any GPU object is created. Mismatches against the pipeline layout only
//! show up when the pipelines are built and are reported as
//! [`ShaderError::Link`].

use naga::valid::{Capabilities, ValidationFlags, Validator};
use std::path::{Path, PathBuf};
use wgpu::{Device, ShaderModule};

/// Vertex stage entry point.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment stage entry point.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Shading language the program files are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderBackend {
    #[default]
    Wgsl,
}

impl ShaderBackend {
    /// Directory name under `resources/shaders/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Wgsl => "wgsl",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wgsl => "wgsl",
        }
    }

    /// Vertex shader path relative to the add-on install directory.
    pub fn vertex_path(&self) -> String {
        format!("resources/shaders/{}/vert.{}", self.dir_name(), self.extension())
    }

    /// Fragment shader path relative to the add-on install directory.
    pub fn fragment_path(&self) -> String {
        format!("resources/shaders/{}/frag.{}", self.dir_name(), self.extension())
    }
}

/// Errors raised while loading the shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("Failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {stage:?} shader {path}:\n{message}")]
    Parse {
        stage: naga::ShaderStage,
        path: PathBuf,
        message: String,
    },
    #[error("{stage:?} shader {path} failed validation: {message}")]
    Validation {
        stage: naga::ShaderStage,
        path: PathBuf,
        message: String,
    },
    #[error("{stage:?} shader {path} has no `{entry}` entry point")]
    MissingEntryPoint {
        stage: naga::ShaderStage,
        path: PathBuf,
        entry: &'static str,
    },
    /// The stages compiled but do not match the bar pipeline's bindings or
    /// vertex inputs.
    #[error("Failed to link shader program: {message}")]
    Link { message: String },
}

/// Source text of one stage and where it came from.
#[derive(Debug, Clone)]
struct StageSource {
    path: PathBuf,
    code: String,
}

impl StageSource {
    fn read(path: &Path) -> Result<Self, ShaderError> {
        let code = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            code,
        })
    }

    fn compile(&self, stage: naga::ShaderStage, entry: &'static str) -> Result<(), ShaderError> {
        let module =
            naga::front::wgsl::parse_str(&self.code).map_err(|e| ShaderError::Parse {
                stage,
                path: self.path.clone(),
                message: e.emit_to_string(&self.code),
            })?;

        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                stage,
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let has_entry = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage && ep.name == entry);
        if !has_entry {
            return Err(ShaderError::MissingEntryPoint {
                stage,
                path: self.path.clone(),
                entry,
            });
        }

        Ok(())
    }
}

/// Vertex and fragment sources that compiled and linked.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    vertex: StageSource,
    fragment: StageSource,
}

impl ShaderSources {
    /// Read both stages and compile them.
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self, ShaderError> {
        let sources = Self {
            vertex: StageSource::read(vertex_path)?,
            fragment: StageSource::read(fragment_path)?,
        };
        sources.vertex.compile(naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
        sources.fragment.compile(naga::ShaderStage::Fragment, FRAGMENT_ENTRY)?;
        Ok(sources)
    }

    /// Create the GPU shader modules.
    pub fn create_program(&self, device: &Device) -> ShaderProgram {
        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spectrum_vertex_shader"),
            source: wgpu::ShaderSource::Wgsl(self.vertex.code.as_str().into()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spectrum_fragment_shader"),
            source: wgpu::ShaderSource::Wgsl(self.fragment.code.as_str().into()),
        });
        ShaderProgram { vertex, fragment }
    }
}

/// Compiled shader modules for both stages.
pub struct ShaderProgram {
    pub vertex: ShaderModule,
    pub fragment: ShaderModule,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VERT: &str = include_str!("../../resources/shaders/wgsl/vert.wgsl");
    const FRAG: &str = include_str!("../../resources/shaders/wgsl/frag.wgsl");

    fn write_pair(dir: &Path, vert: &str, frag: &str) -> (PathBuf, PathBuf) {
        let v = dir.join("vert.wgsl");
        let f = dir.join("frag.wgsl");
        fs::write(&v, vert).unwrap();
        fs::write(&f, frag).unwrap();
        (v, f)
    }

    #[test]
    fn test_backend_paths() {
        let backend = ShaderBackend::Wgsl;
        assert_eq!(backend.vertex_path(), "resources/shaders/wgsl/vert.wgsl");
        assert_eq!(backend.fragment_path(), "resources/shaders/wgsl/frag.wgsl");
    }

    #[test]
    fn test_bundled_shaders_compile() {
        let dir = tempfile::tempdir().unwrap();
        let (v, f) = write_pair(dir.path(), VERT, FRAG);
        assert!(ShaderSources::load(&v, &f).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShaderSources::load(&dir.path().join("vert.wgsl"), &dir.path().join("frag.wgsl"))
            .unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn test_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let (v, f) = write_pair(dir.path(), "fn vs_main( {", FRAG);
        let err = ShaderSources::load(&v, &f).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { stage: naga::ShaderStage::Vertex, .. }));
    }

    #[test]
    fn test_swapped_stages_fail_to_link() {
        let dir = tempfile::tempdir().unwrap();
        let (v, f) = write_pair(dir.path(), FRAG, VERT);
        let err = ShaderSources::load(&v, &f).unwrap_err();
        assert!(matches!(err, ShaderError::MissingEntryPoint { entry: VERTEX_ENTRY, .. }));
    }
}
