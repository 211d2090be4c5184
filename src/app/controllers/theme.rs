use crate::app::domain::{SiteConfig, ThemeMode};
use crate::app::infrastructure::dom::Dom;
use crate::app::infrastructure::platform::SystemPreference;
use crate::app::infrastructure::storage::Storage;

const ROOT: &str = ":root";

/// Light/dark preference: persisted, applied to the root element as a class
/// marker, and mirrored on the toggle control's icon.
pub struct ThemeStore {
    storage: Box<dyn Storage>,
    system: Box<dyn SystemPreference>,
    storage_key: String,
    toggle_selector: String,
}

impl ThemeStore {
    pub fn new(
        storage: Box<dyn Storage>,
        system: Box<dyn SystemPreference>,
        storage_key: &str,
        toggle_selector: &str,
    ) -> Self {
        Self {
            storage,
            system,
            storage_key: storage_key.to_string(),
            toggle_selector: toggle_selector.to_string(),
        }
    }

    pub fn from_config(
        config: &SiteConfig,
        storage: Box<dyn Storage>,
        system: Box<dyn SystemPreference>,
    ) -> Self {
        Self::new(
            storage,
            system,
            &config.theme_storage_key,
            &config.selectors.theme_toggle,
        )
    }

    /// Stored preference, if it is one we know. Anything else is ignored.
    pub fn persisted(&self) -> Option<ThemeMode> {
        let raw = self.storage.read(&self.storage_key)?;
        match raw.parse::<ThemeMode>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("Ignoring stored theme: {}", e);
                None
            }
        }
    }

    /// Persisted preference, else the system signal, else light.
    pub fn initial_theme(&self) -> ThemeMode {
        self.persisted().unwrap_or_else(|| {
            if self.system.prefers_dark() {
                ThemeMode::Dark
            } else {
                ThemeMode::Light
            }
        })
    }

    pub fn apply<D: Dom + ?Sized>(&mut self, dom: &mut D, theme: ThemeMode) {
        for root in dom.query_all(ROOT) {
            for mode in ThemeMode::all() {
                dom.remove_class(root, mode.as_str());
            }
            dom.add_class(root, theme.as_str());
        }
        dom.set_text_all(&self.toggle_selector, theme.toggle_icon());

        if let Err(e) = self.storage.persist(&self.storage_key, theme.as_str()) {
            log::warn!("Failed to persist theme {}: {}", theme, e);
        }
    }

    /// Theme currently shown, read off the root's class markers.
    pub fn current<D: Dom + ?Sized>(dom: &D) -> ThemeMode {
        let dark = dom
            .query_all(ROOT)
            .into_iter()
            .any(|root| dom.has_class(root, ThemeMode::Dark.as_str()));
        if dark { ThemeMode::Dark } else { ThemeMode::Light }
    }

    pub fn toggle<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ThemeMode {
        let next = Self::current(dom).opposite();
        self.apply(dom, next);
        next
    }

    pub fn load_initial<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ThemeMode {
        let theme = self.initial_theme();
        log::debug!("Initial theme: {}", theme);
        self.apply(dom, theme);
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::dom::MemoryDom;
    use crate::app::infrastructure::error::{AppError, Result};
    use crate::app::infrastructure::platform::FixedPreference;
    use crate::app::infrastructure::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Storage whose contents stay inspectable after being boxed.
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl Storage for SharedStorage {
        fn read(&self, key: &str) -> Option<String> {
            self.0.borrow().read(key)
        }
        fn persist(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().persist(key, value)
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }
        fn persist(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Io(std::io::Error::other("disk full")))
        }
    }

    fn shell() -> MemoryDom {
        let mut dom = MemoryDom::new();
        dom.add_element("button", Some("themeToggle"), &[]);
        dom
    }

    fn store(storage: &SharedStorage, prefers_dark: bool) -> ThemeStore {
        ThemeStore::new(
            Box::new(storage.clone()),
            Box::new(FixedPreference(prefers_dark)),
            "theme",
            "#themeToggle",
        )
    }

    fn stored(storage: &SharedStorage) -> Option<String> {
        storage.read("theme")
    }

    #[test]
    fn test_apply_markers_are_exclusive() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut dom = shell();

        themes.apply(&mut dom, ThemeMode::Dark);
        themes.apply(&mut dom, ThemeMode::Light);

        assert_eq!(dom.classes(dom.root()), vec!["light".to_string()]);
        assert_eq!(stored(&storage).as_deref(), Some("light"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut once = shell();
        let mut twice = shell();

        themes.apply(&mut once, ThemeMode::Dark);
        let after_once = stored(&storage);
        themes.apply(&mut twice, ThemeMode::Dark);
        themes.apply(&mut twice, ThemeMode::Dark);

        assert_eq!(once.classes(once.root()), twice.classes(twice.root()));
        let toggle = once.first("#themeToggle").unwrap();
        assert_eq!(once.html(toggle), twice.html(toggle));
        assert_eq!(after_once, stored(&storage));
    }

    #[test]
    fn test_apply_sets_icon() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut dom = shell();
        let toggle = dom.first("#themeToggle").unwrap();

        themes.apply(&mut dom, ThemeMode::Dark);
        assert_eq!(dom.text(toggle).unwrap(), ThemeMode::Dark.toggle_icon());
        themes.apply(&mut dom, ThemeMode::Light);
        assert_eq!(dom.text(toggle).unwrap(), ThemeMode::Light.toggle_icon());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut dom = shell();
        themes.apply(&mut dom, ThemeMode::Dark);

        assert_eq!(themes.toggle(&mut dom), ThemeMode::Light);
        assert_eq!(themes.toggle(&mut dom), ThemeMode::Dark);
        assert_eq!(ThemeStore::current(&dom), ThemeMode::Dark);
        assert_eq!(stored(&storage).as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_without_marker_assumes_light() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut dom = shell();
        assert_eq!(ThemeStore::current(&dom), ThemeMode::Light);
        assert_eq!(themes.toggle(&mut dom), ThemeMode::Dark);
    }

    #[test]
    fn test_initial_resolution_order() {
        let empty = SharedStorage::default();
        assert_eq!(store(&empty, false).initial_theme(), ThemeMode::Light);
        assert_eq!(store(&empty, true).initial_theme(), ThemeMode::Dark);

        let light = SharedStorage::default();
        light.0.borrow_mut().persist("theme", "light").unwrap();
        assert_eq!(store(&light, true).initial_theme(), ThemeMode::Light);
    }

    #[test]
    fn test_invalid_stored_value_ignored() {
        let storage = SharedStorage::default();
        storage.0.borrow_mut().persist("theme", "purple").unwrap();
        let mut themes = store(&storage, true);
        let mut dom = shell();

        assert_eq!(themes.persisted(), None);
        assert_eq!(themes.load_initial(&mut dom), ThemeMode::Dark);
        assert_eq!(dom.classes(dom.root()), vec!["dark".to_string()]);
        assert_eq!(stored(&storage).as_deref(), Some("dark"));
    }

    #[test]
    fn test_storage_failure_still_applies() {
        let mut themes = ThemeStore::new(
            Box::new(FailingStorage),
            Box::new(FixedPreference(false)),
            "theme",
            "#themeToggle",
        );
        let mut dom = shell();
        themes.apply(&mut dom, ThemeMode::Dark);
        assert_eq!(ThemeStore::current(&dom), ThemeMode::Dark);
    }

    #[test]
    fn test_missing_toggle_control() {
        let storage = SharedStorage::default();
        let mut themes = store(&storage, false);
        let mut dom = MemoryDom::new();
        themes.apply(&mut dom, ThemeMode::Dark);
        assert!(dom.has_class(dom.root(), "dark"));
    }
}
