use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use url::Url;

use crate::app::domain::Message;
use crate::app::infrastructure::error::{AppError, Result};

/// Retrieves a resource by locator as text.
///
/// Locators are paths relative to the site (`content/home.html`).
pub trait Fetcher: Send + Sync {
    fn fetch_text(&self, locator: &str) -> Result<String>;
}

/// GETs resources relative to a base URL.
pub struct HttpFetcher {
    base: Url,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid base URL {:?}: {}", base_url, e)))?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, timeout_secs })
    }

    pub fn resolve(&self, locator: &str) -> Result<Url> {
        self.base
            .join(locator)
            .map_err(|e| AppError::Config(format!("invalid locator {:?}: {}", locator, e)))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, locator: &str) -> Result<String> {
        let url = self.resolve(locator)?;
        log::debug!("GET {}", url);

        let response = minreq::get(url.as_str())
            .with_header("User-Agent", "folio")
            .with_timeout(self.timeout_secs)
            .send()?;

        if !(200..300).contains(&response.status_code) {
            return Err(AppError::Status {
                code: response.status_code,
                locator: locator.to_string(),
            });
        }

        Ok(response.as_str()?.to_string())
    }
}

/// Reads resources from a site directory on disk.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a locator onto the site root, refusing anything that would
    /// climb out of it.
    pub fn resolve(&self, locator: &str) -> Result<PathBuf> {
        let relative = Path::new(locator.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AppError::Status {
                code: 403,
                locator: locator.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Fetcher for FsFetcher {
    fn fetch_text(&self, locator: &str) -> Result<String> {
        let path = self.resolve(locator)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::Status {
                code: 404,
                locator: locator.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serves resources from memory. Unknown locators answer 404.
#[derive(Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, String>,
    statuses: HashMap<String, i32>,
    delays: HashMap<String, Duration>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, locator: &str, body: &str) -> Self {
        self.bodies.insert(locator.to_string(), body.to_string());
        self
    }

    pub fn with_status(mut self, locator: &str, code: i32) -> Self {
        self.statuses.insert(locator.to_string(), code);
        self
    }

    /// Hold the response for `delay` before answering.
    pub fn with_delay(mut self, locator: &str, delay: Duration) -> Self {
        self.delays.insert(locator.to_string(), delay);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_text(&self, locator: &str) -> Result<String> {
        if let Some(delay) = self.delays.get(locator) {
            thread::sleep(*delay);
        }
        if let Some(&code) = self.statuses.get(locator) {
            return Err(AppError::Status {
                code,
                locator: locator.to_string(),
            });
        }
        self.bodies.get(locator).cloned().ok_or_else(|| AppError::Status {
            code: 404,
            locator: locator.to_string(),
        })
    }
}

/// Run one fetch on a worker thread and post the outcome as a message.
///
/// Fire-and-forget: a closed channel just drops the result.
pub fn spawn_fetch<F>(fetcher: Arc<dyn Fetcher>, locator: String, sender: Sender<Message>, wrap: F)
where
    F: FnOnce(String, Result<String>) -> Message + Send + 'static,
{
    thread::spawn(move || {
        let result = fetcher.fetch_text(&locator);
        if sender.send(wrap(locator, result)).is_err() {
            log::debug!("Fetch result dropped: receiver gone");
        }
    });
}
