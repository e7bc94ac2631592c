// Session configuration: where the service lives, how we identify ourselves
// and how far a listing may paginate before we give up.

use crate::error::{DriveError, Result};

pub const DEFAULT_BASE_URL: &str = "https://app.thunderdrive.io";

/// The web app rejects unknown clients, so we present a desktop browser UA.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.54 Safari/537.36";

/// Upper bound on pages fetched by a single full listing.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Settings used to build a `DriveSession`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveConfig {
    pub base_url: String,
    pub user_agent: String,
    pub max_pages: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl DriveConfig {
    /// Build a config from `THUNDERDRIVE_URL`, `THUNDERDRIVE_USER_AGENT` and
    /// `THUNDERDRIVE_MAX_PAGES`, falling back to the defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`, which keeps
    /// the parsing testable without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DriveConfig::default();
        if let Some(url) = lookup("THUNDERDRIVE_URL") {
            config.base_url = url;
        }
        if let Some(ua) = lookup("THUNDERDRIVE_USER_AGENT") {
            config.user_agent = ua;
        }
        if let Some(raw) = lookup("THUNDERDRIVE_MAX_PAGES") {
            let pages = raw.trim().parse::<u32>().map_err(|_| {
                DriveError::Config(format!("THUNDERDRIVE_MAX_PAGES is not a number: {:?}", raw))
            })?;
            config = config.with_max_pages(pages)?;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the pagination safety cap. Zero would never fetch anything and is
    /// rejected.
    pub fn with_max_pages(mut self, max_pages: u32) -> Result<Self> {
        if max_pages == 0 {
            return Err(DriveError::Config("max_pages must be at least 1".into()));
        }
        self.max_pages = max_pages;
        Ok(self)
    }
}
