use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::app::domain::SyntaxTheme;
use crate::app::infrastructure::dom::{Dom, NodeId, unescape_html};

const BLOCK_OPEN: &str = "<pre><code";
const BLOCK_CLOSE: &str = "</code></pre>";

/// Rewrites code blocks inside a fragment of markup with highlighted ones.
pub trait Highlighter: Send + Sync {
    fn highlight_html(&self, html: &str) -> String;

    /// Switch the colour scheme used for blocks highlighted from now on.
    fn set_theme(&mut self, theme: SyntaxTheme);
}

pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl SyntectHighlighter {
    pub fn new(theme: SyntaxTheme) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.theme_key().to_string(),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Highlight one block's source. `None` leaves the block untouched.
    fn highlight_block(&self, language: &str, code: &str) -> Option<String> {
        let syntax = self.syntax_set.find_syntax_by_token(language)?;
        let theme = self.theme_set.themes.get(&self.theme_name)?;
        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(html) => Some(html),
            Err(e) => {
                log::debug!("Highlighting {} block failed: {}", language, e);
                None
            }
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn set_theme(&mut self, theme: SyntaxTheme) {
        self.theme_name = theme.theme_key().to_string();
    }

    /// Only `<pre><code class="language-xxx">` blocks are touched. Their
    /// output is a styled `<pre>` without the inner `<code>`, so a second
    /// pass finds nothing left to do.
    fn highlight_html(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;

        while let Some(start) = rest.find(BLOCK_OPEN) {
            out.push_str(&rest[..start]);
            let block = &rest[start..];

            let tag_end = block[BLOCK_OPEN.len()..]
                .find('>')
                .map(|i| i + BLOCK_OPEN.len());
            let (tag_end, close) = match (tag_end, block.find(BLOCK_CLOSE)) {
                (Some(tag_end), Some(close)) if close > tag_end => (tag_end, close),
                _ => {
                    rest = block;
                    break;
                }
            };

            let open_tag = &block[..=tag_end];
            let code = &block[tag_end + 1..close];
            let block_len = close + BLOCK_CLOSE.len();

            let highlighted = code_language(open_tag)
                .and_then(|lang| self.highlight_block(&lang, &unescape_html(code)));
            match highlighted {
                Some(h) => out.push_str(&h),
                None => out.push_str(&block[..block_len]),
            }

            rest = &block[block_len..];
        }

        out.push_str(rest);
        out
    }
}

/// Language named by a `language-xxx` class on the opening tag.
fn code_language(open_tag: &str) -> Option<String> {
    let class_start = open_tag.find("class=\"")? + "class=\"".len();
    let class_end = open_tag[class_start..].find('"')? + class_start;
    open_tag[class_start..class_end]
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Highlight the markup inside one node.
pub fn highlight_node<D: Dom + ?Sized>(highlighter: &dyn Highlighter, dom: &mut D, node: NodeId) {
    if let Some(html) = dom.html(node) {
        let highlighted = highlighter.highlight_html(&html);
        if highlighted != html {
            dom.set_html(node, &highlighted);
        }
    }
}

/// Highlight every node in the document.
pub fn highlight_document<D: Dom + ?Sized>(highlighter: &dyn Highlighter, dom: &mut D) {
    for node in dom.all_nodes() {
        highlight_node(highlighter, dom, node);
    }
}
