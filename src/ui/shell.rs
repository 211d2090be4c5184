use crate::app::domain::SiteConfig;
use crate::app::infrastructure::dom::{Dom, MemoryDom, NodeId, escape_html};

/// Add an element addressed by `selector`: `#id` becomes the id, `.class`
/// the class, anything else is only a tag.
fn add_for_selector(dom: &mut MemoryDom, tag: &str, selector: &str) -> NodeId {
    if let Some(id) = selector.strip_prefix('#') {
        dom.add_element(tag, Some(id), &[])
    } else if let Some(class) = selector.strip_prefix('.') {
        dom.add_element(tag, None, &[class])
    } else {
        dom.add_element(tag, None, &[])
    }
}

/// The site's HTML shell as an in-memory document: header with site name,
/// clock and theme toggle, content area, article area, carousel slides and
/// a contact footer.
pub fn standard_shell(config: &SiteConfig, slides: usize) -> MemoryDom {
    let s = &config.selectors;
    let p = &s.profile;
    let mut dom = MemoryDom::new();

    let site_name = add_for_selector(&mut dom, "h1", &p.site_name);
    dom.set_text(site_name, &config.site_title);
    add_for_selector(&mut dom, "span", &s.datetime);
    let toggle = add_for_selector(&mut dom, "button", &s.theme_toggle);
    dom.set_text(toggle, "\u{1f319}");

    add_for_selector(&mut dom, "main", &s.content);
    let article = add_for_selector(&mut dom, "article", &s.markdown);
    dom.set_visible(article, false);

    for i in 0..slides {
        let slide = add_for_selector(&mut dom, "div", &s.carousel_slide);
        dom.set_text(slide, &format!("Slide {}", i + 1));
    }

    let name = add_for_selector(&mut dom, "span", &p.name);
    dom.set_text(name, "Your Name");
    for selector in [&p.email, &p.github, &p.linkedin, &p.site_repo] {
        let link = add_for_selector(&mut dom, "a", selector);
        dom.set_href(link, "#");
    }
    add_for_selector(&mut dom, "span", &s.datetime);

    dom
}

/// Serialize the document as a complete HTML page.
pub fn render_page(dom: &MemoryDom) -> String {
    let root = dom.root();
    let classes = dom.classes(root);

    let mut out = String::from("<!DOCTYPE html>\n");
    if classes.is_empty() {
        out.push_str("<html>\n");
    } else {
        out.push_str(&format!("<html class=\"{}\">\n", escape_html(&classes.join(" "))));
    }
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(&dom.title())));
    out.push_str("</head>\n<body>\n");
    for node in dom.all_nodes().into_iter().filter(|n| *n != root) {
        if let Some(html) = dom.outer_html(node) {
            out.push_str(&html);
            out.push('\n');
        }
    }
    out.push_str("</body>\n</html>\n");
    out
}
