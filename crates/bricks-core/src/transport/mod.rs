//! HTTP transport over libcurl.
//!
//! Every operation builds its own `Easy` handle, so a handle never outlives the
//! request that created it. Runs in the current thread.

mod get;
mod head;
mod parse;

pub use get::{download_to, get_capped, Fetched};
pub use head::{probe, HeadResult};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::error::FetchError;

/// Per-request curl settings, taken from [`ProviderSettings`].
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirects: u32,
}

impl From<&ProviderSettings> for CurlOptions {
    fn from(s: &ProviderSettings) -> Self {
        Self {
            user_agent: s.http_user_agent.clone(),
            connect_timeout: s.connect_timeout(),
            timeout: s.timeout(),
            max_redirects: s.max_redirects,
        }
    }
}

impl Default for CurlOptions {
    fn default() -> Self {
        CurlOptions::from(&ProviderSettings::default())
    }
}

/// Parses `url` and checks it is something curl should be pointed at.
pub fn parse_http_url(url: &str) -> Result<url::Url, FetchError> {
    let parsed = url::Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::UnsupportedScheme {
            url: url.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// Builds an easy handle for `url` with redirects, timeouts and user agent applied.
fn easy_for(url: &str, opts: &CurlOptions) -> Result<curl::easy::Easy, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(transport)?;
    easy.follow_location(true).map_err(transport)?;
    easy.max_redirections(opts.max_redirects).map_err(transport)?;
    easy.connect_timeout(opts.connect_timeout).map_err(transport)?;
    easy.timeout(opts.timeout).map_err(transport)?;
    easy.useragent(&opts.user_agent).map_err(transport)?;
    Ok(easy)
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// Path for the in-progress file: appends `.part` (e.g. `data.zip` → `data.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}
