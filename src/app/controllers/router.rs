use std::sync::Arc;
use std::sync::mpsc::Sender;

use chrono::{DateTime, Local};

use crate::app::domain::{Message, PageRegistry, RequestId, SiteConfig};
use crate::app::infrastructure::dom::Dom;
use crate::app::infrastructure::error::Result;
use crate::app::services::fetch::{Fetcher, spawn_fetch};
use crate::app::services::syntax::{Highlighter, highlight_node};

/// What a navigation resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub request: RequestId,
    pub key: String,
    pub title: String,
    pub locator: String,
    pub is_fallback: bool,
}

/// Maps page keys to content and swaps it into the content container.
pub struct ContentRouter {
    registry: PageRegistry,
    site_title: String,
    content_selector: String,
    datetime_selector: String,
    datetime_format: String,
    error_fragment: String,
    next_request: u64,
}

impl ContentRouter {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            registry: config.registry()?,
            site_title: config.site_title.clone(),
            content_selector: config.selectors.content.clone(),
            datetime_selector: config.selectors.datetime.clone(),
            datetime_format: config.datetime_format.clone(),
            error_fragment: config.error_fragment.clone(),
            next_request: 0,
        })
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub fn compose_title(&self, page_title: &str) -> String {
        format!("{} | {}", self.site_title, page_title)
    }

    /// Resolve `key`, set the document title and stamp the date-time
    /// display. The content itself is left for the caller to fetch.
    pub fn begin<D: Dom + ?Sized>(&mut self, dom: &mut D, key: Option<&str>) -> PageRequest {
        let resolved = self.registry.resolve(key);
        if resolved.is_fallback {
            log::info!(
                "Page {:?} not registered, serving fallback {:?}",
                key,
                resolved.key
            );
        }

        let title = self.compose_title(&resolved.entry.title);
        dom.set_title(&title);
        set_date_time(dom, &self.datetime_selector, &self.datetime_format, None);

        self.next_request += 1;
        PageRequest {
            request: RequestId(self.next_request),
            key: resolved.key.to_string(),
            title,
            locator: resolved.entry.resource.clone(),
            is_fallback: resolved.is_fallback,
        }
    }

    /// Resolve and start fetching in the background. The result arrives as
    /// `Message::ContentLoaded` on `sender`; overlapping loads are not
    /// sequenced, whichever result is applied last stays on screen.
    pub fn load_page<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        key: Option<&str>,
        fetcher: Arc<dyn Fetcher>,
        sender: Sender<Message>,
    ) -> PageRequest {
        let page = self.begin(dom, key);
        log::info!("Loading page {:?} from {}", page.key, page.locator);

        let request = page.request;
        spawn_fetch(fetcher, page.locator.clone(), sender, move |locator, result| {
            Message::ContentLoaded {
                request,
                locator,
                result,
            }
        });
        page
    }

    /// Put a fetch result into the content container.
    pub fn apply_content<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        locator: &str,
        result: Result<String>,
        highlighter: Option<&dyn Highlighter>,
    ) {
        match result {
            Ok(text) => {
                for node in dom.query_all(&self.content_selector) {
                    dom.set_html(node, &text);
                    if let Some(hl) = highlighter {
                        highlight_node(hl, dom, node);
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", locator, e);
                dom.set_html_all(&self.content_selector, &self.error_fragment);
            }
        }
    }
}

/// Write the formatted time (now, unless given) into every element
/// matching `selector`.
pub fn set_date_time<D: Dom + ?Sized>(
    dom: &mut D,
    selector: &str,
    format: &str,
    time: Option<DateTime<Local>>,
) {
    let time = time.unwrap_or_else(Local::now);
    let text = time.format(format).to_string();
    dom.set_text_all(selector, &text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::dom::MemoryDom;
    use crate::app::infrastructure::error::AppError;
    use crate::app::services::fetch::MemoryFetcher;
    use chrono::TimeZone;
    use std::sync::mpsc;
    use std::time::Duration;

    fn setup() -> (ContentRouter, MemoryDom) {
        let router = ContentRouter::from_config(&SiteConfig::default()).unwrap();
        let mut dom = MemoryDom::new();
        dom.add_element("span", Some("datetimeDisplay"), &[]);
        dom.add_element("main", Some("content"), &[]);
        dom.add_element("span", Some("datetimeDisplay"), &[]);
        (router, dom)
    }

    fn content(dom: &MemoryDom) -> String {
        dom.html(dom.first("#content").unwrap()).unwrap()
    }

    #[test]
    fn test_begin_known_page() {
        let (mut router, mut dom) = setup();
        let page = router.begin(&mut dom, Some("projects"));
        assert_eq!(page.key, "projects");
        assert_eq!(page.locator, "content/projects.html");
        assert!(!page.is_fallback);
        assert_eq!(dom.title(), "Liam Israel's Site | Projects");
    }

    #[test]
    fn test_begin_unknown_page_falls_back() {
        let (mut router, mut dom) = setup();
        for key in [Some("bogus"), None] {
            let page = router.begin(&mut dom, key);
            assert!(page.is_fallback);
            assert_eq!(page.key, "null");
            assert_eq!(page.locator, "content/home.html");
            assert_eq!(dom.title(), "Liam Israel's Site | Home");
        }
    }

    #[test]
    fn test_request_ids_increase() {
        let (mut router, mut dom) = setup();
        let a = router.begin(&mut dom, Some("home"));
        let b = router.begin(&mut dom, Some("home"));
        assert!(b.request > a.request);
    }

    #[test]
    fn test_begin_stamps_every_datetime_display() {
        let (mut router, mut dom) = setup();
        router.begin(&mut dom, Some("home"));
        for node in dom.query_all("#datetimeDisplay") {
            assert!(!dom.text(node).unwrap().is_empty());
        }
    }

    #[test]
    fn test_set_date_time_format() {
        let (_, mut dom) = setup();
        let time = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        set_date_time(&mut dom, "#datetimeDisplay", "%-m/%-d/%Y, %-I:%M:%S %p", Some(time));
        let texts: Vec<String> = dom
            .query_all("#datetimeDisplay")
            .into_iter()
            .map(|n| dom.text(n).unwrap())
            .collect();
        assert_eq!(texts, vec!["3/5/2024, 2:07:09 PM", "3/5/2024, 2:07:09 PM"]);
    }

    #[test]
    fn test_apply_success_replaces_verbatim() {
        let (router, mut dom) = setup();
        dom.set_html_all("#content", "<p>old</p>");
        router.apply_content(&mut dom, "a.html", Ok("<h1>New</h1>".to_string()), None);
        assert_eq!(content(&dom), "<h1>New</h1>");
    }

    #[test]
    fn test_apply_failure_renders_error_fragment() {
        let (router, mut dom) = setup();
        let err = AppError::Status {
            code: 500,
            locator: "a.html".to_string(),
        };
        router.apply_content(&mut dom, "a.html", Err(err), None);
        assert_eq!(content(&dom), SiteConfig::default().error_fragment);
    }

    #[test]
    fn test_apply_without_container_is_noop() {
        let (router, _) = setup();
        let mut dom = MemoryDom::new();
        router.apply_content(&mut dom, "a.html", Ok("<p>x</p>".to_string()), None);
        assert_eq!(dom.all_nodes().len(), 1);
    }

    #[test]
    fn test_load_page_fetches_once() {
        let (mut router, mut dom) = setup();
        let (tx, rx) = mpsc::channel();
        let fetcher: Arc<dyn Fetcher> =
            Arc::new(MemoryFetcher::new().with_body("content/projects.html", "<p>Projects</p>"));
        let page = router.load_page(&mut dom, Some("projects"), fetcher, tx);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Message::ContentLoaded {
                request,
                locator,
                result,
            } => {
                assert_eq!(request, page.request);
                assert_eq!(locator, "content/projects.html");
                assert_eq!(result.unwrap(), "<p>Projects</p>");
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
