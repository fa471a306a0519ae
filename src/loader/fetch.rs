//! Fetching map bytes: blocking HTTP or file reads on native, `fetch()`
//! in the browser.

#[cfg(feature = "viewer")]
pub use native::fetch_bytes;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::fetch_bytes;

#[cfg(feature = "viewer")]
mod native {
    use url::Url;

    use crate::error::ViewerError;

    /// Largest response body accepted. Map GLBs are far larger than
    /// ureq's 10 MB default.
    const MAX_MAP_BYTES: u64 = 1 << 30;

    /// Download `url`. Non-2xx statuses are errors.
    pub fn fetch_bytes(url: &Url) -> Result<Vec<u8>, ViewerError> {
        log::info!("Downloading {url}");
        let mut body = ureq::get(url.as_str())
            .call()
            .map_err(|e| ViewerError::Fetch(format!("{url}: {e}")))?
            .into_body();
        body.with_config()
            .limit(MAX_MAP_BYTES)
            .read_to_vec()
            .map_err(|e| ViewerError::Fetch(format!("{url}: {e}")))
    }
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use crate::error::ViewerError;

    fn js_err(e: JsValue) -> ViewerError {
        ViewerError::Fetch(format!("{e:?}"))
    }

    /// Fetch `url` relative to the page. Non-2xx statuses are errors.
    pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
        let window = web_sys::window()
            .ok_or_else(|| ViewerError::Fetch("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?;
        let response: web_sys::Response = response.dyn_into().map_err(js_err)?;

        if !response.ok() {
            return Err(ViewerError::Fetch(format!(
                "HTTP {} {}",
                response.status(),
                response.status_text()
            )));
        }

        let buffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let array = js_sys::Uint8Array::new(&buffer);
        let mut bytes = vec![0u8; array.length() as usize];
        array.copy_to(&mut bytes);
        Ok(bytes)
    }
}
