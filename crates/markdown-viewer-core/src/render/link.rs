use std::fmt;
use std::sync::Arc;

use log::debug;

type Handler = dyn Fn(&str) + Send + Sync;

/// Callback fired when the user activates a rendered link.
///
/// Supplied once to the [`Renderer`](super::Renderer); backends get a clone
/// through the render context and call [`LinkSignal::activate`] from their
/// own input handling.
#[derive(Clone)]
pub struct LinkSignal(Arc<Handler>);

impl LinkSignal {
    pub fn new(handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(handler))
    }

    pub fn activate(&self, url: &str) {
        debug!("link activated: {url}");
        (self.0)(url);
    }
}

impl Default for LinkSignal {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl fmt::Debug for LinkSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkSignal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn activate_passes_url_to_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let signal = LinkSignal::new(move |url| sink.lock().unwrap().push(url.to_string()));
        signal.clone().activate("https://example.com");
        assert_eq!(*seen.lock().unwrap(), vec!["https://example.com"]);
    }
}
