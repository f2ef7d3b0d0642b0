//! Crawl policy (robots.txt) retrieval and evaluation.
//!
//! The policy lives at `/robots.txt` on the target URL's scheme, host and port.
//! Status handling: 2xx is parsed, 401/403 deny everything, any other 4xx
//! allows everything. A 5xx, a transport failure or an oversized document
//! means the policy is unreachable and
//! [`PolicyFallback`](crate::config::PolicyFallback) decides.

mod parse;

pub use parse::{parse, Group, Rule, RuleSet};

use crate::config::ProviderSettings;
use crate::error::FetchError;
use crate::transport::{self, CurlOptions};
use crate::url_model::percent_decode;

/// Well-known location of the crawl policy on a host.
pub const POLICY_PATH: &str = "/robots.txt";

/// A host's crawl policy as retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    AllowAll,
    DisallowAll,
    Rules(RuleSet),
}

impl RobotsPolicy {
    pub fn parse(text: &str) -> Self {
        RobotsPolicy::Rules(parse(text))
    }

    /// Maps a policy response to a policy. `None` means the policy is unreachable.
    pub fn from_response(status: u32, body: &[u8]) -> Option<Self> {
        match status {
            200..=299 => Some(RobotsPolicy::parse(&String::from_utf8_lossy(body))),
            401 | 403 => Some(RobotsPolicy::DisallowAll),
            400..=499 => Some(RobotsPolicy::AllowAll),
            _ => None,
        }
    }

    /// Evaluates `url` for `agent`.
    pub fn allows(&self, agent: &str, url: &url::Url) -> bool {
        match self {
            RobotsPolicy::AllowAll => true,
            RobotsPolicy::DisallowAll => false,
            RobotsPolicy::Rules(set) => set.allows(agent, &target_path(url)),
        }
    }
}

/// `scheme://host[:port]/robots.txt` for the host serving `url`.
pub fn policy_url(url: &url::Url) -> url::Url {
    let mut policy = url.clone();
    policy.set_path(POLICY_PATH);
    policy.set_query(None);
    policy.set_fragment(None);
    let _ = policy.set_username("");
    let _ = policy.set_password(None);
    policy
}

/// Decoded path plus query of `url`; `/` when the path is empty.
fn target_path(url: &url::Url) -> String {
    let mut path = url.path().to_string();
    if path.is_empty() {
        path.push('/');
    }
    if let Some(q) = url.query() {
        path.push('?');
        path.push_str(q);
    }
    percent_decode(&path)
}

/// Downloads the policy for `url`'s host. `Ok(None)` means unreachable.
pub fn fetch_policy(
    url: &url::Url,
    opts: &CurlOptions,
    limit: u64,
) -> Result<Option<RobotsPolicy>, FetchError> {
    let location = policy_url(url);
    match transport::get_capped(location.as_str(), opts, limit) {
        Ok(resp) => {
            let policy = RobotsPolicy::from_response(resp.status, &resp.body);
            if policy.is_none() {
                tracing::warn!(url = %location, status = resp.status, "crawl policy unavailable");
            }
            Ok(policy)
        }
        Err(e) if e.is_unreachable() => {
            tracing::warn!(url = %location, "crawl policy unreachable: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Whether the host's crawl policy lets `settings.policy_agent` retrieve `url`.
pub fn can_fetch(url: &str, settings: &ProviderSettings) -> Result<bool, FetchError> {
    let parsed = transport::parse_http_url(url)?;
    let opts = CurlOptions::from(settings);
    let allowed = match fetch_policy(&parsed, &opts, settings.max_policy_bytes)? {
        Some(policy) => policy.allows(&settings.policy_agent, &parsed),
        None => settings.on_policy_unreachable.permits(),
    };
    tracing::debug!(url, agent = %settings.policy_agent, allowed, "crawl policy checked");
    Ok(allowed)
}
