use crate::app::domain::{SlideDirection, SlideView};
use crate::app::infrastructure::dom::Dom;

const ACTIVE: &str = "active";
const ENTER_LEFT: &str = "enter-left";
const ENTER_RIGHT: &str = "enter-right";

/// Shows slides that live in the document: the nth node matching the
/// selector is slide n. The active slide is visible and carries the
/// `active` class plus a marker for the direction it entered from.
pub struct DomSlideView<'a, D: Dom + ?Sized> {
    dom: &'a mut D,
    selector: &'a str,
}

impl<'a, D: Dom + ?Sized> DomSlideView<'a, D> {
    pub fn new(dom: &'a mut D, selector: &'a str) -> Self {
        Self { dom, selector }
    }

    pub fn slide_count(&self) -> usize {
        self.dom.query_all(self.selector).len()
    }
}

impl<D: Dom + ?Sized> SlideView for DomSlideView<'_, D> {
    fn show_slide(&mut self, index: usize, direction: Option<SlideDirection>) {
        for (i, node) in self.dom.query_all(self.selector).into_iter().enumerate() {
            self.dom.remove_class(node, ENTER_LEFT);
            self.dom.remove_class(node, ENTER_RIGHT);
            if i == index {
                self.dom.add_class(node, ACTIVE);
                match direction {
                    // Strip moving right brings the slide in from the left
                    Some(SlideDirection::Right) => self.dom.add_class(node, ENTER_LEFT),
                    Some(SlideDirection::Left) => self.dom.add_class(node, ENTER_RIGHT),
                    None => {}
                }
                self.dom.set_visible(node, true);
            } else {
                self.dom.remove_class(node, ACTIVE);
                self.dom.set_visible(node, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::{Carousel, EndBehavior, StartingPosition};
    use crate::app::infrastructure::dom::MemoryDom;

    fn slides(count: usize) -> MemoryDom {
        let mut dom = MemoryDom::new();
        for _ in 0..count {
            dom.add_element("div", None, &["carousel-slide"]);
        }
        dom
    }

    fn active(dom: &MemoryDom) -> Vec<usize> {
        dom.query_all(".carousel-slide")
            .into_iter()
            .enumerate()
            .filter(|(_, n)| dom.has_class(*n, "active") && dom.is_visible(*n))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_exactly_one_active_slide() {
        let mut dom = slides(3);
        let mut view = DomSlideView::new(&mut dom, ".carousel-slide");
        assert_eq!(view.slide_count(), 3);
        view.show_slide(1, None);
        assert_eq!(active(&dom), vec![1]);
    }

    #[test]
    fn test_carousel_drives_view() {
        let mut dom = slides(3);
        let mut carousel = Carousel::new(3, StartingPosition::Left, EndBehavior::Wrap).unwrap();
        {
            let mut view = DomSlideView::new(&mut dom, ".carousel-slide");
            carousel.reset(&mut view);
            carousel.slide_left(&mut view);
        }
        assert_eq!(active(&dom), vec![2]);
        let node = dom.query_all(".carousel-slide")[2];
        assert!(dom.has_class(node, "enter-right"));
    }

    #[test]
    fn test_no_slides_is_noop() {
        let mut dom = MemoryDom::new();
        let mut view = DomSlideView::new(&mut dom, ".carousel-slide");
        view.show_slide(0, Some(SlideDirection::Left));
        assert_eq!(dom.all_nodes().len(), 1);
    }
}
