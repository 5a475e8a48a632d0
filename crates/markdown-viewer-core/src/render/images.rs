//! Asynchronous image loading for rendered image nodes.
//!
//! A backend creating an image visual shows a placeholder straight away and
//! calls [`ImageLoader::request`]. The fetch runs as a detached task on the
//! ambient tokio runtime and the completion callback receives either the
//! bytes or a placeholder message. Failures stay local to the image and are
//! recorded in [`Diagnostics`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use log::error;
use tokio::runtime::Handle;

use crate::error::ImageError;

/// Source of image bytes, keyed by the URL written in the document.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// `Ok(None)` when nothing exists at `url`.
    async fn fetch_image_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, ImageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded(Vec<u8>),
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub url: String,
    pub message: String,
}

/// Shared record of image failures.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Arc<Mutex<Vec<Diagnostic>>>);

impl Diagnostics {
    pub fn record(&self, url: &str, message: &str) {
        error!("Error loading image from {url}: {message}");
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Diagnostic {
                url: url.to_string(),
                message: message.to_string(),
            });
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// Callback receiving the result of one image request.
pub type ImageCallback = Box<dyn FnOnce(ImageOutcome) + Send + 'static>;

#[derive(Clone, Default)]
pub struct ImageLoader {
    fetcher: Option<Arc<dyn ImageFetcher>>,
    diagnostics: Diagnostics,
}

impl fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLoader")
            .field("fetcher", &self.fetcher.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl ImageLoader {
    pub fn new(fetcher: Option<Arc<dyn ImageFetcher>>) -> Self {
        Self {
            fetcher,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Starts loading `url`. `on_done` runs exactly once, later on a runtime
    /// worker, or immediately when no fetcher or no runtime is available.
    /// Callers must not hold locks that `on_done` takes.
    pub fn request(&self, url: &str, on_done: ImageCallback) {
        let Some(fetcher) = self.fetcher.clone() else {
            on_done(self.placeholder(url, "image loading is disabled"));
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            on_done(self.placeholder(url, "no async runtime to load images on"));
            return;
        };
        let loader = self.clone();
        let url = url.to_string();
        runtime.spawn(async move {
            let outcome = match fetcher.fetch_image_bytes(&url).await {
                Ok(Some(bytes)) => ImageOutcome::Loaded(bytes),
                Ok(None) => {
                    let message = ImageError::NotFound(url.clone()).to_string();
                    loader.placeholder(&url, &message)
                }
                Err(e) => loader.placeholder(&url, &e.to_string()),
            };
            on_done(outcome);
        });
    }

    fn placeholder(&self, url: &str, message: &str) -> ImageOutcome {
        self.diagnostics.record(url, message);
        ImageOutcome::Placeholder {
            message: message.to_string(),
        }
    }
}
