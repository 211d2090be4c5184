use std::sync::Arc;
use std::sync::mpsc::Sender;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use url::Url;

use crate::app::domain::{Message, SiteConfig};
use crate::app::infrastructure::dom::Dom;
use crate::app::infrastructure::error::Result;
use crate::app::services::fetch::{Fetcher, spawn_fetch};
use crate::app::services::syntax::{Highlighter, highlight_document};

/// Link and image schemes allowed through. Relative URLs always pass.
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

fn is_safe_destination(dest: &str) -> bool {
    match Url::parse(dest) {
        Ok(url) => SAFE_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    if is_safe_destination(&dest) {
        dest
    } else {
        log::warn!("Dropping link to {:?}", &*dest);
        CowStr::Borrowed("#")
    }
}

/// Render markdown to HTML. Raw HTML in the source comes out as escaped
/// text, and links or images with a script-capable scheme point at `#`.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Renders an article into the markdown container.
pub struct MarkdownRenderer {
    container: String,
    error_fragment: String,
}

impl MarkdownRenderer {
    pub fn new(container: &str, error_fragment: &str) -> Self {
        Self {
            container: container.to_string(),
            error_fragment: error_fragment.to_string(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.selectors.markdown, &config.error_fragment)
    }

    /// Replace the container's content with the rendered markdown, highlight
    /// the document and reveal the container. Rendering the same text
    /// twice leaves a single copy.
    pub fn set_markdown<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        markdown: &str,
        highlighter: Option<&dyn Highlighter>,
    ) {
        let rendered = render_markdown(markdown);
        self.show(dom, &rendered, highlighter);
    }

    /// Fetch the article source on a worker; it arrives as
    /// `Message::ArticleLoaded`.
    pub fn render_from(&self, locator: &str, fetcher: Arc<dyn Fetcher>, sender: Sender<Message>) {
        log::info!("Loading article {}", locator);
        spawn_fetch(fetcher, locator.to_string(), sender, |locator, result| {
            Message::ArticleLoaded { locator, result }
        });
    }

    pub fn apply_loaded<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        locator: &str,
        result: Result<String>,
        highlighter: Option<&dyn Highlighter>,
    ) {
        match result {
            Ok(markdown) => self.set_markdown(dom, &markdown, highlighter),
            Err(e) => {
                log::error!("Failed to load article {}: {}", locator, e);
                self.show(dom, &self.error_fragment, None);
            }
        }
    }

    fn show<D: Dom + ?Sized>(&self, dom: &mut D, html: &str, highlighter: Option<&dyn Highlighter>) {
        dom.set_html_all(&self.container, html);
        if let Some(hl) = highlighter {
            highlight_document(hl, dom);
        }
        dom.set_visible_all(&self.container, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::SyntaxTheme;
    use crate::app::infrastructure::dom::{MemoryDom, NodeId};
    use crate::app::infrastructure::error::AppError;
    use crate::app::services::syntax::SyntectHighlighter;

    fn shell() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let article = dom.add_element("article", Some("markdown"), &[]);
        dom.set_visible(article, false);
        (dom, article)
    }

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::from_config(&SiteConfig::default())
    }

    #[test]
    fn test_heading() {
        assert_eq!(render_markdown("# Title"), "<h1>Title</h1>\n");
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_unsafe_link_scheme_dropped() {
        let html = render_markdown(
            "[x](javascript:alert(1)) ![i](javascript:alert(2)) [d](data:text/html,hi)",
        );
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:"));
        assert!(html.contains("<a href=\"#\">x</a>"));
        assert!(html.contains("<img src=\"#\" alt=\"i\" />"));
    }

    #[test]
    fn test_safe_links_kept() {
        let html = render_markdown(
            "[a](https://example.com/x) [b](mailto:me@example.com) [c](/about) [d](#top) ![e](img/cat.png)",
        );
        assert!(html.contains("href=\"https://example.com/x\""));
        assert!(html.contains("href=\"mailto:me@example.com\""));
        assert!(html.contains("href=\"/about\""));
        assert!(html.contains("href=\"#top\""));
        assert!(html.contains("src=\"img/cat.png\""));
    }

    #[test]
    fn test_set_markdown_reveals_container() {
        let (mut dom, article) = shell();
        renderer().set_markdown(&mut dom, "# Title", None);
        assert!(dom.is_visible(article));
        assert!(dom.html(article).unwrap().contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_set_markdown_replaces() {
        let (mut dom, article) = shell();
        let r = renderer();
        r.set_markdown(&mut dom, "# Title", None);
        r.set_markdown(&mut dom, "# Title", None);
        assert_eq!(dom.html(article).unwrap().matches("<h1>").count(), 1);
    }

    #[test]
    fn test_set_markdown_highlights_code() {
        let (mut dom, article) = shell();
        let hl = SyntectHighlighter::new(SyntaxTheme::Base16OceanDark);
        renderer().set_markdown(&mut dom, "```rust\nfn main() {}\n```\n", Some(&hl));
        let html = dom.html(article).unwrap();
        assert!(html.contains("<pre style="));
        assert!(!html.contains("language-rust"));
    }

    #[test]
    fn test_load_failure_shows_error() {
        let (mut dom, article) = shell();
        let err = AppError::Status {
            code: 404,
            locator: "articles/x.md".to_string(),
        };
        renderer().apply_loaded(&mut dom, "articles/x.md", Err(err), None);
        assert!(dom.is_visible(article));
        assert_eq!(dom.html(article).unwrap(), SiteConfig::default().error_fragment);
    }

    #[test]
    fn test_missing_container_is_noop() {
        let mut dom = MemoryDom::new();
        renderer().set_markdown(&mut dom, "# Title", None);
        assert_eq!(dom.all_nodes().len(), 1);
    }
}
