use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::registry::{PageEntry, PageRegistry};
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Value written to storage, doubling as the class marker on the root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Glyph shown on the toggle control: the mode a click switches to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Self::Light => "\u{1f319}",
            Self::Dark => "\u{2600}\u{fe0f}",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn all() -> &'static [ThemeMode] {
        &[Self::Light, Self::Dark]
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(AppError::InvalidTheme(other.to_string())),
        }
    }
}

/// Syntax highlighting themes bundled with syntect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyntaxTheme {
    #[default]
    Base16OceanDark,
    Base16OceanLight,
    Base16EightiesDark,
    Base16MochaDark,
    SolarizedDark,
    SolarizedLight,
    InspiredGitHub,
}

impl SyntaxTheme {
    /// Get the syntect theme key for this theme
    pub fn theme_key(&self) -> &'static str {
        match self {
            Self::Base16OceanDark => "base16-ocean.dark",
            Self::Base16OceanLight => "base16-ocean.light",
            Self::Base16EightiesDark => "base16-eighties.dark",
            Self::Base16MochaDark => "base16-mocha.dark",
            Self::SolarizedDark => "Solarized (dark)",
            Self::SolarizedLight => "Solarized (light)",
            Self::InspiredGitHub => "InspiredGitHub",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub key: String,
    pub title: String,
    pub resource: String,
}

impl PageConfig {
    fn new(key: &str, title: &str, resource: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// Selectors for the profile fields in the page shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileTargets {
    pub site_name: String,
    pub name: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub site_repo: String,
}

impl Default for ProfileTargets {
    fn default() -> Self {
        Self {
            site_name: "#siteName".to_string(),
            name: "#profileName".to_string(),
            email: "#profileEmail".to_string(),
            github: "#profileGithub".to_string(),
            linkedin: "#profileLinkedin".to_string(),
            site_repo: "#siteRepo".to_string(),
        }
    }
}

/// Selectors the scripts rely on in the page shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub content: String,
    pub datetime: String,
    pub theme_toggle: String,
    pub markdown: String,
    pub carousel_slide: String,
    pub profile: ProfileTargets,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            content: "#content".to_string(),
            datetime: "#datetimeDisplay".to_string(),
            theme_toggle: "#themeToggle".to_string(),
            markdown: "#markdown".to_string(),
            carousel_slide: ".carousel-slide".to_string(),
            profile: ProfileTargets::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub site_title: String,

    #[serde(default = "default_pages")]
    pub pages: Vec<PageConfig>,

    /// Entry served for absent or unknown page keys
    #[serde(default = "default_fallback_page")]
    pub fallback_page: PageConfig,

    #[serde(default)]
    pub selectors: Selectors,

    #[serde(default = "default_theme_storage_key")]
    pub theme_storage_key: String,

    #[serde(default = "default_profile_resource")]
    pub profile_resource: String,

    #[serde(default = "default_error_fragment")]
    pub error_fragment: String,

    /// chrono format string for the date-time display
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_highlighting")]
    pub highlighting_enabled: bool,

    #[serde(default = "default_syntax_theme_light")]
    pub syntax_theme_light: SyntaxTheme,

    #[serde(default = "default_syntax_theme_dark")]
    pub syntax_theme_dark: SyntaxTheme,
}

fn default_site_title() -> String {
    "Liam Israel's Site".to_string()
}

fn default_pages() -> Vec<PageConfig> {
    vec![
        PageConfig::new("home", "Home", "content/home.html"),
        PageConfig::new("about", "About", "content/about.html"),
        PageConfig::new("contact", "Contact", "content/contact.html"),
        PageConfig::new("projects", "Projects", "content/projects.html"),
        PageConfig::new("articles", "Articles", "content/articles.html"),
    ]
}

fn default_fallback_page() -> PageConfig {
    PageConfig::new("null", "Home", "content/home.html")
}

fn default_theme_storage_key() -> String {
    "theme".to_string()
}

fn default_profile_resource() -> String {
    "content/profile.json".to_string()
}

fn default_error_fragment() -> String {
    "<p class=\"load-error\">Sorry, this page could not be loaded. Please try again later.</p>"
        .to_string()
}

fn default_datetime_format() -> String {
    "%-m/%-d/%Y, %-I:%M:%S %p".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_highlighting() -> bool {
    true
}

fn default_syntax_theme_light() -> SyntaxTheme {
    SyntaxTheme::InspiredGitHub
}

fn default_syntax_theme_dark() -> SyntaxTheme {
    SyntaxTheme::Base16OceanDark
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            pages: default_pages(),
            fallback_page: default_fallback_page(),
            selectors: Selectors::default(),
            theme_storage_key: default_theme_storage_key(),
            profile_resource: default_profile_resource(),
            error_fragment: default_error_fragment(),
            datetime_format: default_datetime_format(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            highlighting_enabled: default_highlighting(),
            syntax_theme_light: default_syntax_theme_light(),
            syntax_theme_dark: default_syntax_theme_dark(),
        }
    }
}

impl SiteConfig {
    /// Get the syntax theme for the current mode
    pub fn current_syntax_theme(&self, theme: ThemeMode) -> SyntaxTheme {
        match theme {
            ThemeMode::Light => self.syntax_theme_light,
            ThemeMode::Dark => self.syntax_theme_dark,
        }
    }

    /// Build the page registry. A page reusing the fallback key is
    /// rejected so the fallback stays unique.
    pub fn registry(&self) -> Result<PageRegistry, AppError> {
        let fallback = &self.fallback_page;
        let entries = self
            .pages
            .iter()
            .map(|p| (p.key.clone(), PageEntry::new(&p.title, &p.resource)));
        PageRegistry::new(
            entries,
            &fallback.key,
            PageEntry::new(&fallback.title, &fallback.resource),
        )
    }

    /// Load settings from the default location, or defaults if missing
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    /// Load settings from `path`. A missing file yields defaults silently,
    /// an unreadable one yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "Failed to parse config {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("folio");
        path.push("settings.json");
        path
    }
}
