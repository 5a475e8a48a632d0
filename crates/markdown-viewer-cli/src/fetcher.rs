use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use markdown_viewer_core::{ImageError, ImageFetcher};

/// Reads images from disk. Relative sources resolve against `base_dir`.
#[derive(Debug, Clone)]
pub struct FsImageFetcher {
    base_dir: PathBuf,
}

impl FsImageFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, ImageError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(ImageError::Other(format!("remote images are not fetched: {url}")));
        }
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.base_dir.join(path))
        }
    }
}

#[async_trait]
impl ImageFetcher for FsImageFetcher {
    async fn fetch_image_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, ImageError> {
        let path = self.resolve(url)?;
        debug!("reading image {}", path.display());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
