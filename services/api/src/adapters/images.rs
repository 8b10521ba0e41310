//! services/api/src/adapters/images.rs
//!
//! Loads remedy pictures for the result card. It implements the `ImageLoader`
//! port from the `core` crate: `http(s)://` references are fetched over the
//! network, anything else is read from the local images directory. Loaded
//! images are cached by reference, so a result card and the image route that
//! follows it share one fetch.

use async_trait::async_trait;
use biofortune_core::{domain::LoadedImage, ports::ImageLoader};
use image::ImageFormat;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const REMOTE_TIMEOUT: Duration = Duration::from_secs(6);

/// An `ImageLoader` backed by the filesystem and `reqwest`.
#[derive(Clone)]
pub struct FsHttpImageLoader {
    images_dir: PathBuf,
    http: reqwest::Client,
    /// Successful loads only; failures are retried on the next request.
    cache: Arc<RwLock<HashMap<String, LoadedImage>>>,
}

impl FsHttpImageLoader {
    pub fn new(images_dir: PathBuf) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REMOTE_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to a default HTTP client for images: {}", e);
                reqwest::Client::new()
            });
        Self {
            images_dir,
            http,
            cache: Arc::default(),
        }
    }

    async fn fetch_remote(&self, url: &str) -> Option<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| warn!("Failed to fetch image {}: {}", url, e))
            .ok()?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| warn!("Failed to read image body {}: {}", url, e))
            .ok()?;
        Some(bytes.to_vec())
    }

    async fn read_local(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.images_dir.join(name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| warn!("Failed to read image {}: {}", path.display(), e))
            .ok()
    }
}

fn is_remote(image_ref: &str) -> bool {
    image_ref.starts_with("http://") || image_ref.starts_with("https://")
}

/// Maps sniffed image bytes to a content type, rejecting anything that is not an image.
fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

#[async_trait]
impl ImageLoader for FsHttpImageLoader {
    async fn load(&self, image_ref: &str) -> Option<LoadedImage> {
        if let Some(image) = self.cache.read().await.get(image_ref) {
            debug!("Image cache hit for {}", image_ref);
            return Some(image.clone());
        }

        let bytes = if is_remote(image_ref) {
            self.fetch_remote(image_ref).await?
        } else {
            self.read_local(image_ref).await?
        };

        let Some(content_type) = sniff_content_type(&bytes) else {
            warn!("{} is not a recognised image.", image_ref);
            return None;
        };
        let image = LoadedImage {
            bytes,
            content_type,
        };
        self.cache
            .write()
            .await
            .insert(image_ref.to_string(), image.clone());
        Some(image)
    }
}
