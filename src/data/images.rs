//! Image reference resolution
//!
//! Listing images arrive either as absolute URLs or as opaque identifiers
//! stored by the delivery service. Resolution never fails outward: callers
//! ask for [`ImageResolver::resolve_or_placeholder`] and always get a URL.

use crate::constants::{IMAGE_CACHE_SIZE, PLACEHOLDER_IMAGE_URL};
use crate::core::config::ImagePreset;
use crate::{MapError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

pub trait ImageResolver: Send + Sync {
    /// Turns a reference into a display-ready URL for `preset`
    fn resolve(&self, reference: &str, preset: &ImagePreset) -> Result<String>;

    /// Static URL shown when nothing else can be
    fn placeholder(&self) -> &str;

    fn resolve_or_placeholder(&self, reference: Option<&str>, preset: &ImagePreset) -> String {
        let Some(reference) = reference else {
            return self.placeholder().to_string();
        };

        match self.resolve(reference, preset) {
            Ok(url) => url,
            Err(_e) => {
                #[cfg(feature = "debug")]
                log::warn!("Falling back to placeholder for image {:?}: {}", reference, _e);
                self.placeholder().to_string()
            }
        }
    }
}

pub fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("https://") || reference.starts_with("http://")
}

fn is_valid_identifier(reference: &str) -> bool {
    !reference.contains("..")
        && !reference.starts_with('/')
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.'))
}

/// Resolves identifiers against a transformation CDN and memoizes the results
pub struct CdnImageResolver {
    base_url: String,
    placeholder: String,
    cache: Mutex<LruCache<String, String>>,
}

impl CdnImageResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_placeholder(base_url, PLACEHOLDER_IMAGE_URL)
    }

    pub fn with_placeholder(base_url: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let capacity = NonZeroUsize::new(IMAGE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            placeholder: placeholder.into(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn build_url(&self, identifier: &str, preset: &ImagePreset) -> String {
        format!(
            "{}/image/upload/w_{},h_{},c_{},q_auto,f_auto/{}",
            self.base_url, preset.width, preset.height, preset.crop, identifier
        )
    }

    /// Number of memoized URLs
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl ImageResolver for CdnImageResolver {
    fn resolve(&self, reference: &str, preset: &ImagePreset) -> Result<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(MapError::ImageResolution("empty image reference".into()));
        }

        if is_absolute_url(reference) {
            if reference.chars().any(char::is_whitespace) {
                return Err(MapError::ImageResolution(format!("malformed URL {reference:?}")));
            }
            return Ok(reference.to_string());
        }

        if !is_valid_identifier(reference) {
            return Err(MapError::ImageResolution(format!(
                "invalid image identifier {reference:?}"
            )));
        }

        let key = format!("{}x{}:{}:{}", preset.width, preset.height, preset.crop, reference);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(url) = cache.get(&key) {
                return Ok(url.clone());
            }
            let url = self.build_url(reference, preset);
            cache.put(key, url.clone());
            return Ok(url);
        }

        Ok(self.build_url(reference, preset))
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CdnImageResolver {
        CdnImageResolver::new("https://res.example.com/demo/")
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let url = resolver()
            .resolve("https://images.example.com/casa.jpg", &ImagePreset::default())
            .unwrap();
        assert_eq!(url, "https://images.example.com/casa.jpg");
    }

    #[test]
    fn test_identifier_uses_preset() {
        let resolver = resolver();
        let url = resolver
            .resolve("listings/abc123", &ImagePreset::new(300, 200, "fill"))
            .unwrap();
        assert_eq!(
            url,
            "https://res.example.com/demo/image/upload/w_300,h_200,c_fill,q_auto,f_auto/listings/abc123"
        );

        resolver
            .resolve("listings/abc123", &ImagePreset::new(300, 200, "fill"))
            .unwrap();
        assert_eq!(resolver.cached_len(), 1);
    }

    #[test]
    fn test_bad_references_fall_back() {
        let resolver = resolver();
        let preset = ImagePreset::default();

        assert!(resolver.resolve("   ", &preset).is_err());
        assert!(resolver.resolve("../etc/passwd", &preset).is_err());
        assert!(resolver.resolve("bad id<script>", &preset).is_err());

        assert_eq!(
            resolver.resolve_or_placeholder(Some("bad id"), &preset),
            PLACEHOLDER_IMAGE_URL
        );
        assert_eq!(resolver.resolve_or_placeholder(None, &preset), PLACEHOLDER_IMAGE_URL);
    }
}
