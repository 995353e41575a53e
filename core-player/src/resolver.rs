//! # Stream Resolution
//!
//! Turns a track's public page URL into a time-limited media URL for direct
//! playback, in two sequential requests against the third-party service:
//!
//! 1. **Resolve**: fetch the track description keyed by page URL and client
//!    credential, yielding the available transcodings and display metadata.
//! 2. **Locate**: fetch the chosen transcoding's locator endpoint to obtain
//!    the final media URL.
//!
//! Progressive transcodings are preferred over HLS. When the chosen
//! transcoding's locate step fails and the other protocol family was also
//! offered, the locate is retried exactly once against that alternate.
//!
//! Everything here is idempotent and side-effect-free; resolved URLs are
//! time-limited and must never be persisted.

use std::time::{SystemTime, UNIX_EPOCH};

use bridge_traits::{HttpClient, HttpRequest};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{PlayerError, Result};

// ============================================================================
// Wire Format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    user: Option<ResolveUser>,
    #[serde(default)]
    media: Option<ResolveMedia>,
}

#[derive(Debug, Deserialize)]
struct ResolveUser {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResolveMedia {
    #[serde(default)]
    transcodings: Vec<Transcoding>,
}

#[derive(Debug, Clone, Deserialize)]
struct Transcoding {
    url: String,
    #[serde(default)]
    format: Option<TranscodingFormat>,
}

#[derive(Debug, Clone, Deserialize)]
struct TranscodingFormat {
    #[serde(default)]
    protocol: Option<String>,
}

impl Transcoding {
    fn protocol(&self) -> &str {
        self.format
            .as_ref()
            .and_then(|f| f.protocol.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct LocatorResponse {
    url: String,
}

// ============================================================================
// Public Types
// ============================================================================

/// The final, time-limited media URL and its delivery protocol family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    pub url: String,
    pub is_hls: bool,
}

/// A successful resolution: the playable stream plus the display metadata the
/// resolve step happened to carry, usable immediately without waiting for
/// playback to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub stream: ResolvedStream,
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Resolves page URLs against the third-party service's resolver endpoint.
pub struct StreamResolver<'a> {
    http: &'a dyn HttpClient,
    endpoint: &'a str,
}

impl<'a> StreamResolver<'a> {
    pub fn new(http: &'a dyn HttpClient, endpoint: &'a str) -> Self {
        Self { http, endpoint }
    }

    /// Resolve `page_url` to a playable stream using `credential`.
    ///
    /// # Errors
    ///
    /// [`PlayerError::ResolveFailed`] on any transport failure or non-success
    /// status, [`PlayerError::NoTranscodings`] when the track offers none.
    pub async fn resolve(&self, page_url: &str, credential: &str) -> Result<Resolution> {
        let resolve_url = format!(
            "{}?url={}&client_id={}&_ts={}",
            self.endpoint,
            urlencoding::encode(page_url),
            urlencoding::encode(credential),
            cache_buster(),
        );
        let response: ResolveResponse = self.fetch_json(&resolve_url, "resolve").await?;

        let transcodings = response
            .media
            .map(|m| m.transcodings)
            .unwrap_or_default();
        let (chosen, alternate) = pick_transcodings(&transcodings).ok_or(PlayerError::NoTranscodings)?;

        let stream = match self.locate(chosen, credential).await {
            Ok(stream) => stream,
            Err(e) => {
                let Some(alternate) = alternate else {
                    return Err(e);
                };
                warn!(
                    error = %e,
                    protocol = alternate.protocol(),
                    "Locate failed, retrying against alternate transcoding"
                );
                self.locate(alternate, credential).await?
            }
        };

        debug!(is_hls = stream.is_hls, "Resolved stream");
        Ok(Resolution {
            stream,
            title: response.title,
            artist: response.user.and_then(|u| u.username),
        })
    }

    async fn locate(&self, transcoding: &Transcoding, credential: &str) -> Result<ResolvedStream> {
        let separator = if transcoding.url.contains('?') { '&' } else { '?' };
        let locate_url = format!(
            "{}{}client_id={}&_ts={}",
            transcoding.url,
            separator,
            urlencoding::encode(credential),
            cache_buster(),
        );
        let located: LocatorResponse = self.fetch_json(&locate_url, "locate").await?;
        Ok(ResolvedStream {
            url: located.url,
            is_hls: is_hls(transcoding),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str, step: &str) -> Result<T> {
        let response = self
            .http
            .execute(HttpRequest::get(url))
            .await
            .map_err(|e| PlayerError::ResolveFailed(format!("{step} request failed: {e}")))?;
        if !response.is_success() {
            return Err(PlayerError::ResolveFailed(format!(
                "{step} returned status {}",
                response.status
            )));
        }
        response
            .json()
            .map_err(|e| PlayerError::ResolveFailed(format!("{step} response malformed: {e}")))
    }
}

fn is_hls(transcoding: &Transcoding) -> bool {
    transcoding.protocol().eq_ignore_ascii_case("hls")
}

/// Pick the transcoding to locate: progressive if present, else the first
/// HLS one. The second element is the alternate from the other protocol
/// family, if any, used for the single locate retry.
fn pick_transcodings(transcodings: &[Transcoding]) -> Option<(&Transcoding, Option<&Transcoding>)> {
    let progressive = transcodings
        .iter()
        .find(|t| t.protocol().eq_ignore_ascii_case("progressive"));
    let hls = transcodings.iter().find(|t| is_hls(t));

    match (progressive, hls) {
        (Some(p), alt) => Some((p, alt)),
        (None, Some(h)) => Some((h, None)),
        (None, None) => None,
    }
}

fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcoding(url: &str, protocol: &str) -> Transcoding {
        Transcoding {
            url: url.to_string(),
            format: Some(TranscodingFormat {
                protocol: Some(protocol.to_string()),
            }),
        }
    }

    #[test]
    fn progressive_preferred_with_hls_alternate() {
        let list = vec![
            transcoding("https://api.example/hls", "hls"),
            transcoding("https://api.example/prog", "progressive"),
        ];
        let (chosen, alternate) = pick_transcodings(&list).unwrap();
        assert_eq!(chosen.url, "https://api.example/prog");
        assert_eq!(alternate.unwrap().url, "https://api.example/hls");
    }

    #[test]
    fn hls_only_has_no_alternate() {
        let list = vec![transcoding("https://api.example/hls", "hls")];
        let (chosen, alternate) = pick_transcodings(&list).unwrap();
        assert_eq!(chosen.url, "https://api.example/hls");
        assert!(alternate.is_none());
    }

    #[test]
    fn unknown_protocols_yield_nothing() {
        assert!(pick_transcodings(&[]).is_none());
        let list = vec![transcoding("https://api.example/x", "ctr-encrypted-hls")];
        assert!(pick_transcodings(&list).is_none());
    }

    #[test]
    fn protocol_matching_ignores_case() {
        let list = vec![transcoding("https://api.example/p", "Progressive")];
        let (chosen, _) = pick_transcodings(&list).unwrap();
        assert!(!is_hls(chosen));
    }
}
