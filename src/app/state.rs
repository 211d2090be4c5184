use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use super::controllers::carousel::DomSlideView;
use super::controllers::markdown::MarkdownRenderer;
use super::controllers::profile::ProfileLoader;
use super::controllers::router::{ContentRouter, PageRequest};
use super::controllers::theme::ThemeStore;
use super::domain::{Carousel, Message, SiteConfig, SlideMove, ThemeMode};
use super::infrastructure::dom::Dom;
use super::infrastructure::error::Result;
use super::infrastructure::platform::SystemPreference;
use super::infrastructure::storage::Storage;
use super::services::fetch::Fetcher;
use super::services::syntax::Highlighter;

/// Owns the document and every component. All document mutation happens
/// here, on the thread that owns the `Site`; fetch workers only post
/// messages back.
pub struct Site<D: Dom> {
    pub dom: D,
    config: SiteConfig,
    router: ContentRouter,
    theme: ThemeStore,
    profile: ProfileLoader,
    markdown: MarkdownRenderer,
    carousel: Option<Carousel>,
    fetcher: Arc<dyn Fetcher>,
    highlighter: Option<Box<dyn Highlighter>>,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    in_flight: usize,
}

impl<D: Dom> Site<D> {
    pub fn new(
        dom: D,
        config: SiteConfig,
        fetcher: Arc<dyn Fetcher>,
        storage: Box<dyn Storage>,
        system: Box<dyn SystemPreference>,
    ) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            router: ContentRouter::from_config(&config)?,
            theme: ThemeStore::from_config(&config, storage, system),
            profile: ProfileLoader::from_config(&config),
            markdown: MarkdownRenderer::from_config(&config),
            carousel: None,
            dom,
            config,
            fetcher,
            highlighter: None,
            sender,
            receiver,
            in_flight: 0,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Highlighting is skipped while no highlighter is set. The highlighter
    /// follows the page theme from here on.
    pub fn set_highlighter(&mut self, highlighter: Option<Box<dyn Highlighter>>) {
        self.highlighter = highlighter;
        let theme = self.theme();
        self.sync_syntax_theme(theme);
    }

    fn sync_syntax_theme(&mut self, theme: ThemeMode) {
        if let Some(highlighter) = self.highlighter.as_mut() {
            highlighter.set_theme(self.config.current_syntax_theme(theme));
        }
    }

    pub fn set_carousel(&mut self, carousel: Option<Carousel>) {
        self.carousel = carousel;
        if let Some(carousel) = self.carousel.as_mut() {
            let mut view = DomSlideView::new(&mut self.dom, &self.config.selectors.carousel_slide);
            carousel.reset(&mut view);
        }
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    /// Handle for posting messages from elsewhere (event handlers, workers).
    pub fn sender(&self) -> Sender<Message> {
        self.sender.clone()
    }

    /// Fetches started but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Page start-up: theme, then the requested page, then the profile.
    pub fn on_load(&mut self, page: Option<&str>) -> PageRequest {
        let theme = self.theme.load_initial(&mut self.dom);
        self.sync_syntax_theme(theme);
        let request = self.navigate(page);
        self.load_profile();
        request
    }

    pub fn navigate(&mut self, page: Option<&str>) -> PageRequest {
        self.in_flight += 1;
        self.router
            .load_page(&mut self.dom, page, self.fetcher.clone(), self.sender.clone())
    }

    pub fn load_profile(&mut self) {
        self.in_flight += 1;
        self.profile.load(self.fetcher.clone(), self.sender.clone());
    }

    /// Render markdown straight into the article container.
    pub fn render_article(&mut self, markdown: &str) {
        self.markdown
            .set_markdown(&mut self.dom, markdown, self.highlighter.as_deref());
    }

    /// Fetch markdown from `locator` and render it when it arrives.
    pub fn load_article(&mut self, locator: &str) {
        self.in_flight += 1;
        self.markdown
            .render_from(locator, self.fetcher.clone(), self.sender.clone());
    }

    pub fn theme(&self) -> ThemeMode {
        ThemeStore::current(&self.dom)
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        let theme = self.theme.toggle(&mut self.dom);
        self.sync_syntax_theme(theme);
        log::info!("Theme switched to {}", theme);
        theme
    }

    pub fn slide_left(&mut self) -> Option<SlideMove> {
        let carousel = self.carousel.as_mut()?;
        let mut view = DomSlideView::new(&mut self.dom, &self.config.selectors.carousel_slide);
        carousel.slide_left(&mut view)
    }

    pub fn slide_right(&mut self) -> Option<SlideMove> {
        let carousel = self.carousel.as_mut()?;
        let mut view = DomSlideView::new(&mut self.dom, &self.config.selectors.carousel_slide);
        carousel.slide_right(&mut view)
    }

    pub fn dispatch(&mut self, message: Message) {
        log::debug!("Dispatching {:?}", message);
        if message.is_fetch_result() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match message {
            Message::ContentLoaded {
                request,
                locator,
                result,
            } => {
                log::debug!("Content for request {:?} arrived", request);
                self.router.apply_content(
                    &mut self.dom,
                    &locator,
                    result,
                    self.highlighter.as_deref(),
                );
            }
            Message::ProfileLoaded(result) => self.profile.apply(&mut self.dom, result),
            Message::ArticleLoaded { locator, result } => self.markdown.apply_loaded(
                &mut self.dom,
                &locator,
                result,
                self.highlighter.as_deref(),
            ),
            Message::Navigate(page) => {
                self.navigate(page.as_deref());
            }
            Message::ToggleTheme => {
                self.toggle_theme();
            }
            Message::SlideLeft => {
                self.slide_left();
            }
            Message::SlideRight => {
                self.slide_right();
            }
        }
    }

    /// Apply every message already waiting. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.dispatch(message);
            handled += 1;
        }
        handled
    }

    /// Block until no fetch is in flight or `timeout` passes. Returns true
    /// when everything settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.pump();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(message) => self.dispatch(message),
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("{} fetch(es) still pending after {:?}", self.in_flight, timeout);
                    return false;
                }
                // Site holds a sender, so this cannot happen while it lives
                Err(RecvTimeoutError::Disconnected) => return false,
            }
            self.pump();
        }
        true
    }
}
