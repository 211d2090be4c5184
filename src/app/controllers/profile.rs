use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::app::domain::{Message, ProfileRecord, ProfileTargets, SiteConfig};
use crate::app::infrastructure::dom::Dom;
use crate::app::infrastructure::error::Result;
use crate::app::services::fetch::{Fetcher, spawn_fetch};

/// Fills the contact fields of the page from `profile.json`.
pub struct ProfileLoader {
    resource: String,
    targets: ProfileTargets,
}

impl ProfileLoader {
    pub fn new(resource: &str, targets: ProfileTargets) -> Self {
        Self {
            resource: resource.to_string(),
            targets,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.profile_resource, config.selectors.profile.clone())
    }

    /// Fetch and parse on a worker; the record arrives as
    /// `Message::ProfileLoaded`.
    pub fn load(&self, fetcher: Arc<dyn Fetcher>, sender: Sender<Message>) {
        log::debug!("Loading profile from {}", self.resource);
        spawn_fetch(fetcher, self.resource.clone(), sender, |_, result| {
            Message::ProfileLoaded(
                result.and_then(|json| ProfileRecord::from_json(&json).map_err(Into::into)),
            )
        });
    }

    /// Apply a load result. Failures are logged and leave the page as is.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &mut D, result: Result<ProfileRecord>) {
        match result {
            Ok(record) => self.populate(dom, &record),
            Err(e) => log::warn!("Failed to load profile from {}: {}", self.resource, e),
        }
    }

    /// Write each present field into its targets; absent fields leave
    /// their targets untouched.
    pub fn populate<D: Dom + ?Sized>(&self, dom: &mut D, record: &ProfileRecord) {
        let t = &self.targets;
        if let Some(site_name) = &record.site_name {
            dom.set_text_all(&t.site_name, site_name);
        }
        if let Some(name) = &record.name {
            dom.set_text_all(&t.name, name);
        }
        if let (Some(email), Some(mailto)) = (&record.email, record.mailto()) {
            dom.set_text_all(&t.email, email);
            dom.set_href_all(&t.email, &mailto);
        }
        if let Some(github) = &record.github {
            dom.set_href_all(&t.github, github);
        }
        if let Some(linkedin) = &record.linkedin {
            dom.set_href_all(&t.linkedin, linkedin);
        }
        if let Some(site_repo) = &record.site_repo {
            dom.set_href_all(&t.site_repo, site_repo);
        }
    }
}
