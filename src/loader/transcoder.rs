use std::fmt;

use crate::options::LoaderOptions;

/// Location of the Basis Universal transcoder files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscoderConfig {
    /// Directory the transcoder is served from.
    pub path: String,
}

impl TranscoderConfig {
    /// Transcoder location from the loader options.
    #[must_use]
    pub fn from_options(options: &LoaderOptions) -> Self {
        Self {
            path: options.transcoder_path.clone(),
        }
    }
}

/// GPU texture format family that compressed textures would be
/// transcoded to, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSupport {
    /// ASTC 4x4 (mobile and Apple GPUs).
    Astc,
    /// BC7 (desktop GPUs).
    Bc,
    /// ETC2 (GLES-class GPUs).
    Etc2,
    /// No block compression; decode to RGBA8.
    Uncompressed,
}

impl TextureSupport {
    /// Best family the device features allow.
    #[must_use]
    pub fn detect(features: wgpu::Features) -> Self {
        if features.contains(wgpu::Features::TEXTURE_COMPRESSION_ASTC) {
            Self::Astc
        } else if features.contains(wgpu::Features::TEXTURE_COMPRESSION_BC) {
            Self::Bc
        } else if features.contains(wgpu::Features::TEXTURE_COMPRESSION_ETC2) {
            Self::Etc2
        } else {
            Self::Uncompressed
        }
    }

    /// Concrete texture format for color textures.
    #[must_use]
    pub fn target_format(self) -> wgpu::TextureFormat {
        match self {
            Self::Astc => wgpu::TextureFormat::Astc {
                block: wgpu::AstcBlock::B4x4,
                channel: wgpu::AstcChannel::UnormSrgb,
            },
            Self::Bc => wgpu::TextureFormat::Bc7RgbaUnormSrgb,
            Self::Etc2 => wgpu::TextureFormat::Etc2Rgba8UnormSrgb,
            Self::Uncompressed => wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    /// Device features needed to sample the target format.
    #[must_use]
    pub fn required_features(self) -> wgpu::Features {
        match self {
            Self::Astc => wgpu::Features::TEXTURE_COMPRESSION_ASTC,
            Self::Bc => wgpu::Features::TEXTURE_COMPRESSION_BC,
            Self::Etc2 => wgpu::Features::TEXTURE_COMPRESSION_ETC2,
            Self::Uncompressed => wgpu::Features::empty(),
        }
    }
}

impl fmt::Display for TextureSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Astc => "ASTC 4x4",
            Self::Bc => "BC7",
            Self::Etc2 => "ETC2",
            Self::Uncompressed => "RGBA8",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_prefers_astc_then_bc_then_etc2() {
        let all = wgpu::Features::TEXTURE_COMPRESSION_ASTC
            | wgpu::Features::TEXTURE_COMPRESSION_BC
            | wgpu::Features::TEXTURE_COMPRESSION_ETC2;
        assert_eq!(TextureSupport::detect(all), TextureSupport::Astc);
        assert_eq!(
            TextureSupport::detect(all - wgpu::Features::TEXTURE_COMPRESSION_ASTC),
            TextureSupport::Bc
        );
        assert_eq!(
            TextureSupport::detect(wgpu::Features::TEXTURE_COMPRESSION_ETC2),
            TextureSupport::Etc2
        );
        assert_eq!(
            TextureSupport::detect(wgpu::Features::empty()),
            TextureSupport::Uncompressed
        );
    }

    #[test]
    fn detected_support_needs_only_detected_features() {
        for features in [
            wgpu::Features::TEXTURE_COMPRESSION_BC,
            wgpu::Features::TEXTURE_COMPRESSION_ETC2,
            wgpu::Features::empty(),
        ] {
            let support = TextureSupport::detect(features);
            assert!(features.contains(support.required_features()));
        }
    }

    #[test]
    fn target_format_is_an_srgb_color_format() {
        assert_eq!(
            TextureSupport::Bc.target_format(),
            wgpu::TextureFormat::Bc7RgbaUnormSrgb
        );
        assert_eq!(
            TextureSupport::Uncompressed.target_format(),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
        for support in [
            TextureSupport::Astc,
            TextureSupport::Bc,
            TextureSupport::Etc2,
            TextureSupport::Uncompressed,
        ] {
            let format = support.target_format();
            assert!(format.is_srgb());
            assert!(format.required_features().contains(support.required_features()));
        }
    }

    #[test]
    fn transcoder_path_comes_from_options() {
        let config = TranscoderConfig::from_options(&LoaderOptions::default());
        assert_eq!(config.path, "transcoders/basis/");
    }
}
