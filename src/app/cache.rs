// src/app/cache.rs: in-memory decoded image cache in front of the byte fetcher
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use image::GenericImageView;
use tracing::{debug, warn};

use crate::app::error::MediaResult;
use crate::app::keyed_cache::KeyedCache;

/// Default entry count, matching the count limit the mobile client used.
pub const DEFAULT_IMAGE_CAPACITY: usize = 100;

/// Decoded RGBA8 pixels, ready for texture upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub type Image = Arc<DecodedImage>;

#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> MediaResult<Vec<u8>>;
}

/// Turns raw bytes into an image; malformed data yields `None`, never an error.
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Option<DecodedImage>;
}

/// `Decoder` backed by the `image` crate's format sniffing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<DecodedImage> {
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let (width, height) = img.dimensions();
                if width == 0 || height == 0 {
                    return None;
                }
                Some(DecodedImage {
                    width,
                    height,
                    rgba: img.to_rgba8().into_raw(),
                })
            }
            Err(e) => {
                debug!("image decode failed: {e}");
                None
            }
        }
    }
}

/// Locator → decoded image cache. Shared by every screen; clone the `Arc`, not the cache.
pub struct ImageCache {
    entries: RwLock<KeyedCache<String, Image>>,
    fetcher: Arc<dyn ByteFetcher>,
    decoder: Arc<dyn Decoder>,
}

impl ImageCache {
    pub fn new(capacity: usize, fetcher: Arc<dyn ByteFetcher>, decoder: Arc<dyn Decoder>) -> Self {
        Self {
            entries: RwLock::new(KeyedCache::new(capacity)),
            fetcher,
            decoder,
        }
    }

    /// Synchronous hit check; never touches the network.
    pub fn cached(&self, locator: &str) -> Option<Image> {
        match self.entries.read() {
            Ok(guard) => guard.get(locator),
            Err(poisoned) => poisoned.into_inner().get(locator),
        }
    }

    /// Return the image for `locator`, fetching and decoding on a miss.
    ///
    /// Any failure comes back as `None`; callers render a placeholder.
    pub async fn load(&self, locator: &str) -> Option<Image> {
        if locator.trim().is_empty() {
            return None;
        }
        if let Some(hit) = self.cached(locator) {
            return Some(hit);
        }

        let bytes = match self.fetcher.fetch(locator).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("image fetch failed for {locator}: {e}");
                return None;
            }
        };

        let decoder = Arc::clone(&self.decoder);
        let decoded = match tokio::task::spawn_blocking(move || decoder.decode(&bytes)).await {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("image decode task failed for {locator}: {e}");
                None
            }
        };
        let Some(decoded) = decoded else {
            warn!("undecodable image at {locator}");
            return None;
        };

        let image = Arc::new(decoded);
        self.insert(locator, Arc::clone(&image));
        Some(image)
    }

    fn insert(&self, locator: &str, image: Image) {
        match self.entries.write() {
            Ok(mut guard) => guard.put(locator.to_owned(), image),
            Err(poisoned) => poisoned.into_inner().put(locator.to_owned(), image),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
    }
}
