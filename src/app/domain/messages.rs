use super::profile::ProfileRecord;
use crate::app::infrastructure::error::Result;

/// Sequence number handed out per content fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Everything the site reacts to. Background fetch workers send the
/// `*Loaded` variants through the site's channel; the rest come from user
/// interaction. The dispatch loop in `Site` handles them on the UI thread.
#[derive(Debug)]
pub enum Message {
    // Background results
    ContentLoaded {
        request: RequestId,
        locator: String,
        result: Result<String>,
    },
    ProfileLoaded(Result<ProfileRecord>),
    ArticleLoaded {
        locator: String,
        result: Result<String>,
    },

    // Interaction
    Navigate(Option<String>),
    ToggleTheme,
    SlideLeft,
    SlideRight,
}

impl Message {
    /// True for results of a fetch started earlier.
    pub fn is_fetch_result(&self) -> bool {
        matches!(
            self,
            Self::ContentLoaded { .. } | Self::ProfileLoaded(_) | Self::ArticleLoaded { .. }
        )
    }
}
