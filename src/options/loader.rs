use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Where maps are fetched from and with which conversion parameters.
pub struct LoaderOptions {
    /// Path prefix that marks a first-party location (`/view/<map>`).
    pub view_prefix: String,
    /// Origin used when the map comes from the `map` query parameter.
    pub demo_origin: String,
    /// Origin that relative (first-party) fetch URLs resolve against in
    /// the native viewer.
    pub local_origin: String,
    /// `texture_scale` value used when the location does not set one.
    pub texture_scale: String,
    /// `textures` value used when the location does not set one.
    pub textures: String,
    /// Directory the Basis Universal transcoder files are served from.
    pub transcoder_path: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            view_prefix: "/view/".into(),
            demo_origin: "https://gltf.demos.tf".into(),
            local_origin: "http://localhost:3030".into(),
            texture_scale: "0.25".into(),
            textures: "true".into(),
            transcoder_path: "transcoders/basis/".into(),
        }
    }
}
