//! Document capability.
//!
//! Everything the site scripts do to the page goes through [`Dom`]: look up
//! nodes by selector, replace their text or markup, point links somewhere,
//! toggle visibility and class markers, and set the document title.
//! Lookups return every matching node, so an operation against a selector
//! with no matches is simply a no-op.
//!
//! [`MemoryDom`] is a flat, in-process document used by the CLI renderer
//! and by tests. Each node owns its inner markup as an opaque string.

/// Handle to a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

pub trait Dom {
    /// All nodes matching `selector`, in document order.
    ///
    /// Supported selectors: `#id`, `.class`, `:root` and bare tag names.
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Every node in the document, root first.
    fn all_nodes(&self) -> Vec<NodeId>;

    fn html(&self, node: NodeId) -> Option<String>;
    fn set_html(&mut self, node: NodeId, html: &str);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_href(&mut self, node: NodeId, href: &str);
    fn set_visible(&mut self, node: NodeId, visible: bool);

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);

    fn first(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn set_text_all(&mut self, selector: &str, text: &str) {
        for node in self.query_all(selector) {
            self.set_text(node, text);
        }
    }

    fn set_html_all(&mut self, selector: &str, html: &str) {
        for node in self.query_all(selector) {
            self.set_html(node, html);
        }
    }

    fn set_href_all(&mut self, selector: &str, href: &str) {
        for node in self.query_all(selector) {
            self.set_href(node, href);
        }
    }

    fn set_visible_all(&mut self, selector: &str, visible: bool) {
        for node in self.query_all(selector) {
            self.set_visible(node, visible);
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    html: String,
    href: Option<String>,
    visible: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    title: String,
    elements: Vec<Element>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document holding only the `<html>` root.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            elements: vec![Element {
                tag: "html".to_string(),
                id: None,
                classes: Vec::new(),
                html: String::new(),
                href: None,
                visible: true,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element to the document and return its handle.
    pub fn add_element(&mut self, tag: &str, id: Option<&str>, classes: &[&str]) -> NodeId {
        self.elements.push(Element {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            html: String::new(),
            href: None,
            visible: true,
        });
        NodeId(self.elements.len() - 1)
    }

    pub fn href(&self, node: NodeId) -> Option<String> {
        self.elements.get(node.0).and_then(|e| e.href.clone())
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.elements.get(node.0).is_some_and(|e| e.visible)
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.elements
            .get(node.0)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    /// Text content of a node: its markup with tags dropped and the basic
    /// entities decoded.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.elements.get(node.0).map(|e| strip_tags(&e.html))
    }

    /// Serialize one element (not the root) as markup.
    pub fn outer_html(&self, node: NodeId) -> Option<String> {
        let e = self.elements.get(node.0)?;
        let mut out = format!("<{}", e.tag);
        if let Some(id) = &e.id {
            out.push_str(&format!(" id=\"{}\"", escape_html(id)));
        }
        if !e.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&e.classes.join(" "))));
        }
        if let Some(href) = &e.href {
            out.push_str(&format!(" href=\"{}\"", escape_html(href)));
        }
        if !e.visible {
            out.push_str(" style=\"display: none\"");
        }
        out.push('>');
        out.push_str(&e.html);
        out.push_str(&format!("</{}>", e.tag));
        Some(out)
    }

    fn matches(element: &Element, index: usize, selector: &str) -> bool {
        if selector == ":root" {
            return index == 0;
        }
        if let Some(id) = selector.strip_prefix('#') {
            return element.id.as_deref() == Some(id);
        }
        if let Some(class) = selector.strip_prefix('.') {
            return element.classes.iter().any(|c| c == class);
        }
        element.tag.eq_ignore_ascii_case(selector)
    }
}

impl Dom for MemoryDom {
    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();
        self.elements
            .iter()
            .enumerate()
            .filter(|(i, e)| Self::matches(e, *i, selector))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn all_nodes(&self) -> Vec<NodeId> {
        (0..self.elements.len()).map(NodeId).collect()
    }

    fn html(&self, node: NodeId) -> Option<String> {
        self.elements.get(node.0).map(|e| e.html.clone())
    }

    fn set_html(&mut self, node: NodeId, html: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.html = html.to_string();
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.html = escape_html(text);
        }
    }

    fn set_href(&mut self, node: NodeId, href: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.href = Some(href.to_string());
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.visible = visible;
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements
            .get(node.0)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Named or numeric (`#39`, `#x27`) entity body, without `&` and `;`.
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    unescape_html(&out)
}
