//! HTTP HEAD probing.

use std::str;

use super::{easy_for, is_success, parse::parse_headers, CurlOptions};
use crate::error::FetchError;

/// Headers of interest from a HEAD response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// Declared `Content-Type`, verbatim.
    pub content_type: Option<String>,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
}

/// Performs a HEAD request and returns the final response's headers.
///
/// Follows redirects. A non-2xx final status is an error.
pub fn probe(url: &str, opts: &CurlOptions) -> Result<HeadResult, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let mut headers: Vec<String> = Vec::new();

    let mut easy = easy_for(url, opts)?;
    easy.nobody(true).map_err(transport)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(transport)?;
        transfer.perform().map_err(transport)?;
    }

    let code = easy.response_code().map_err(transport)?;
    if !is_success(code) {
        return Err(FetchError::Http {
            method: "HEAD",
            url: url.to_string(),
            status: code,
        });
    }

    let result = parse_headers(&headers);
    tracing::debug!(
        url,
        content_type = ?result.content_type,
        content_length = ?result.content_length,
        "HEAD probe"
    );
    Ok(result)
}
