use serde::{Deserialize, Serialize};

/// Contact details published in `profile.json`. Every field is optional;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub site_repo: Option<String>,
}

impl ProfileRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn mailto(&self) -> Option<String> {
        self.email
            .as_deref()
            .filter(|email| !email.is_empty())
            .map(|email| format!("mailto:{}", email))
    }
}
