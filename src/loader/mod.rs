//! Asset load orchestration.
//!
//! A [`LoadTarget`] is resolved once from the page location, its fetch URL
//! is downloaded, and the bytes are decoded into a
//! [`SceneGraph`](crate::scene::SceneGraph). The session receives the
//! outcome through
//! [`ViewerSession::handle_load`](crate::ViewerSession::handle_load);
//! there is no progress reporting and no retry.

mod decode;
pub mod fetch;
mod target;
mod transcoder;

use std::path::Path;
#[cfg(feature = "viewer")]
use std::path::PathBuf;

pub use decode::{decode, DecodedAsset};
pub use target::{LoadMode, LoadTarget};
pub use transcoder::{TextureSupport, TranscoderConfig};

use crate::error::ViewerError;
#[cfg(feature = "viewer")]
use crate::options::LoaderOptions;
use crate::scene::SceneGraph;

/// Decode fetched bytes and log what the asset needs from the GPU.
pub fn finish(
    bytes: &[u8],
    base: Option<&Path>,
    textures: TextureSupport,
) -> Result<SceneGraph, ViewerError> {
    let asset = decode(bytes, base)?;
    if asset.basisu_textures {
        log::info!(
            "map uses KHR_texture_basisu textures; transcode target is {textures} ({:?})",
            textures.target_format()
        );
    }
    log::info!(
        "decoded map: {} nodes, {} meshes, {} materials, {} triangles",
        asset.graph.nodes.len(),
        asset.graph.meshes.len(),
        asset.graph.materials.len(),
        asset.graph.triangle_count(),
    );
    Ok(asset.graph)
}

/// Where the native viewer reads a map from.
#[cfg(feature = "viewer")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// A `.glb`/`.gltf` file on disk.
    File(PathBuf),
    /// A map served over HTTP.
    Remote(url::Url),
}

#[cfg(feature = "viewer")]
impl MapSource {
    /// Existing file paths are read from disk. Anything else is treated as
    /// a location; relative fetch URLs resolve against `local_origin`.
    pub fn resolve(input: &str, options: &LoaderOptions) -> Result<Self, ViewerError> {
        let path = Path::new(input);
        if path.is_file() {
            return Ok(Self::File(path.to_path_buf()));
        }
        let target = LoadTarget::from_location(input, options)?;
        target.absolute_url(&options.local_origin).map(Self::Remote)
    }

    /// Short human-readable name for titles and logs.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path
                .file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map_or_else(|| url.to_string(), |name| name.trim_end_matches(".glb").to_owned()),
        }
    }

    /// Fetch and decode, blocking the calling thread.
    pub fn load_blocking(&self, textures: TextureSupport) -> Result<SceneGraph, ViewerError> {
        match self {
            Self::File(path) => {
                log::info!("Reading {}", path.display());
                let bytes = std::fs::read(path)?;
                finish(&bytes, path.parent(), textures)
            }
            Self::Remote(url) => {
                let bytes = fetch::fetch_bytes(url)?;
                finish(&bytes, None, textures)
            }
        }
    }

    /// Load on a worker thread. The single result arrives on the returned
    /// channel.
    #[must_use]
    pub fn spawn_load(
        self,
        textures: TextureSupport,
    ) -> std::sync::mpsc::Receiver<Result<SceneGraph, ViewerError>> {
        let (tx, rx) = std::sync::mpsc::channel();
        let _ = std::thread::spawn(move || {
            // The receiver is gone only if the viewer already exited.
            let _ = tx.send(self.load_blocking(textures));
        });
        rx
    }
}
