use reqwest::Url;

use crate::error::AppError;
use crate::report::OutputOptions;

pub const DEFAULT_API_URL: &str = "http://localhost:45869";
pub const ACCESS_KEY_HEADER: &str = "Hydrus-Client-API-Access-Key";
pub const COOKIES_PATH: &str = "/manage_cookies/get_cookies";

pub const PATREON_API_URL: &str = "https://www.patreon.com/api";
pub const PATREON_COOKIE_DOMAIN: &str = "patreon.com";

pub const FANBOX_API_URL: &str = "https://api.fanbox.cc";
pub const FANBOX_COOKIE_DOMAIN: &str = "fanbox.cc";
pub const FANBOX_REFERER: &str = "https://www.fanbox.cc/";
pub const FANBOX_ORIGIN: &str = "https://www.fanbox.cc";

/// Which platform pipelines to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformSelection {
    pub patreon: bool,
    pub fanbox: bool,
}

impl PlatformSelection {
    pub fn is_empty(&self) -> bool {
        !self.patreon && !self.fanbox
    }
}

/// Everything a `check` run needs, resolved once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub platforms: PlatformSelection,
    pub output: OutputOptions,
}

impl Config {
    pub fn new(
        api_url: &str,
        api_key: String,
        platforms: PlatformSelection,
        output: OutputOptions,
    ) -> Result<Self, AppError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            api_key,
            platforms,
            output,
        })
    }
}

/// Strip a single trailing slash and make sure what is left parses as a URL.
pub fn normalize_api_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.strip_suffix('/').unwrap_or(input);
    Url::parse(trimmed)
        .map_err(|e| AppError::Config(format!("invalid cookie store URL '{input}': {e}")))?;
    Ok(trimmed.to_string())
}
