use url::Url;

use crate::error::ViewerError;
use crate::options::LoaderOptions;

/// Placeholder origin used only to parse relative locations.
const PARSE_BASE: &str = "http://localhost/";

/// Where the map identifier came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMode {
    /// `/view/<map>`: fetched relative to the page's own origin.
    FirstParty,
    /// `?map=<map>`: fetched from the configured demo origin.
    Demo {
        /// Origin the asset is fetched from.
        origin: String,
    },
}

/// The map to load, derived once from the page location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    /// Map identifier, used as the GLB file stem.
    pub identifier: String,
    /// Which origin serves the asset.
    pub mode: LoadMode,
    /// `texture_scale` value, forwarded verbatim.
    pub texture_scale: String,
    /// `textures` value, forwarded verbatim.
    pub textures: String,
    /// Origin of the location itself, when it was an absolute URL.
    pub location_origin: Option<String>,
}

impl LoadTarget {
    /// Resolve a location such as `/view/mapA`, `/?map=mapB&textures=false`
    /// or `https://host/view/mapA`.
    ///
    /// A path starting with the view prefix wins over the `map` query
    /// parameter. Fails if neither names a map.
    pub fn from_location(
        location: &str,
        options: &LoaderOptions,
    ) -> Result<Self, ViewerError> {
        let (url, location_origin) = match Url::parse(location) {
            Ok(url) if url.has_host() => {
                let origin = url.origin().ascii_serialization();
                (url, Some(origin))
            }
            _ => {
                let base = Url::parse(PARSE_BASE)
                    .map_err(|e| ViewerError::Location(e.to_string()))?;
                let url = base
                    .join(location)
                    .map_err(|e| ViewerError::Location(e.to_string()))?;
                (url, None)
            }
        };

        let query = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        let (identifier, mode) = match url.path().strip_prefix(&options.view_prefix) {
            Some(rest) => (rest.to_owned(), LoadMode::FirstParty),
            None => (
                query("map").unwrap_or_default(),
                LoadMode::Demo {
                    origin: options.demo_origin.clone(),
                },
            ),
        };

        if identifier.is_empty() {
            return Err(ViewerError::Location(format!(
                "no map named in {location:?}"
            )));
        }

        Ok(Self {
            identifier,
            mode,
            texture_scale: query("texture_scale")
                .unwrap_or_else(|| options.texture_scale.clone()),
            textures: query("textures").unwrap_or_else(|| options.textures.clone()),
            location_origin,
        })
    }

    /// Asset URL. Relative (`/gltf/..`) for first-party targets.
    #[must_use]
    pub fn fetch_url(&self) -> String {
        let base = match &self.mode {
            LoadMode::FirstParty => "",
            LoadMode::Demo { origin } => origin.trim_end_matches('/'),
        };
        format!(
            "{base}/gltf/{}.glb?texture_scale={}&textures={}",
            self.identifier, self.texture_scale, self.textures
        )
    }

    /// Absolute asset URL. Relative fetch URLs resolve against the
    /// location's own origin, or `fallback_origin` when the location was
    /// only a path.
    pub fn absolute_url(&self, fallback_origin: &str) -> Result<Url, ViewerError> {
        let fetch = self.fetch_url();
        if let Ok(url) = Url::parse(&fetch) {
            return Ok(url);
        }
        let origin = self.location_origin.as_deref().unwrap_or(fallback_origin);
        Url::parse(origin)
            .and_then(|base| base.join(&fetch))
            .map_err(|e| ViewerError::Location(format!("{origin}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(location: &str) -> LoadTarget {
        LoadTarget::from_location(location, &LoaderOptions::default()).unwrap()
    }

    #[test]
    fn view_path_is_first_party() {
        let target = resolve("/view/mapA");
        assert_eq!(target.identifier, "mapA");
        assert_eq!(target.mode, LoadMode::FirstParty);
        assert_eq!(
            target.fetch_url(),
            "/gltf/mapA.glb?texture_scale=0.25&textures=true"
        );
    }

    #[test]
    fn map_query_uses_demo_origin() {
        let target = resolve("/?map=mapB&texture_scale=0.5");
        assert_eq!(target.identifier, "mapB");
        assert_eq!(
            target.fetch_url(),
            "https://gltf.demos.tf/gltf/mapB.glb?texture_scale=0.5&textures=true"
        );
    }

    #[test]
    fn view_path_wins_over_query() {
        let target = resolve("/view/mapA?map=mapB&textures=false");
        assert_eq!(target.identifier, "mapA");
        assert_eq!(target.textures, "false");
    }

    #[test]
    fn query_values_are_forwarded_verbatim() {
        let target = resolve("?map=m&texture_scale=banana&textures=maybe");
        assert_eq!(target.texture_scale, "banana");
        assert_eq!(target.textures, "maybe");
    }

    #[test]
    fn missing_map_is_a_location_error() {
        let options = LoaderOptions::default();
        for location in ["/", "/?texture_scale=1", "/view/", "/?map="] {
            let err = LoadTarget::from_location(location, &options).unwrap_err();
            assert!(matches!(err, ViewerError::Location(_)), "{location}");
        }
    }

    #[test]
    fn relative_url_resolves_against_location_origin() {
        let target = resolve("https://maps.example.org:8443/view/mapC");
        let url = target.absolute_url("http://localhost:3030").unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.org:8443/gltf/mapC.glb?texture_scale=0.25&textures=true"
        );
    }

    #[test]
    fn path_only_location_uses_fallback_origin() {
        let target = resolve("/view/mapA");
        let url = target.absolute_url("http://localhost:3030").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(3030));
        assert_eq!(url.path(), "/gltf/mapA.glb");
    }

    #[test]
    fn demo_url_is_already_absolute() {
        let target = resolve("http://localhost:3030/?map=mapB");
        let url = target.absolute_url("http://unused").unwrap();
        assert_eq!(url.host_str(), Some("gltf.demos.tf"));
    }
}
