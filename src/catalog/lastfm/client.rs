//! Last.fm HTTP client
//!
//! Handles communication with the Last.fm web service.
//! See: https://www.last.fm/api
//!
//! ## API Quirks
//!
//! ### Errors inside successful responses
//! Last.fm frequently answers with HTTP 200 and an `{"error": N, "message": ...}`
//! body. Every response is therefore inspected for an `error` field before it is
//! decoded into the method's DTO. Error 6 means the requested entity does not
//! exist and error 29 means we exceeded the rate limit.
//!
//! ### Periods
//! `artist.getTopTracks` only accepts a fixed set of period names, so the
//! requested recent window is rounded up to the nearest supported period.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::catalog::domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogError, CatalogTrack, SimilarArtist,
    TrackInfo,
};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm error code for an unknown artist/album/track
const ERROR_NOT_FOUND: u32 = 6;
/// Last.fm error code for rate limit exceeded
const ERROR_RATE_LIMITED: u32 = 29;

/// Number of candidates requested from `artist.search`
const SEARCH_LIMIT: usize = 5;

/// Last.fm API client
pub struct LastFmClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl LastFmClient {
    /// Create a new client with the given API key and per-request timeout
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send a User-Agent header identifying the application
    /// - Give up on any single request after `timeout`
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into(),
        })
    }

    pub async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CatalogError> {
        let limit = SEARCH_LIMIT.to_string();
        let response: dto::ArtistSearchResponse = self
            .call("artist.search", &[("artist", name), ("limit", &limit)])
            .await?;
        Ok(adapter::to_resolved_artist(name, response))
    }

    pub async fn artist_info(&self, name: &str) -> Result<CatalogArtist, CatalogError> {
        let response: dto::ArtistInfoResponse = self
            .call("artist.getinfo", &[("artist", name), ("autocorrect", "1")])
            .await?;
        Ok(adapter::to_artist(response))
    }

    pub async fn top_albums(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<CatalogAlbum>, CatalogError> {
        let limit = limit.to_string();
        let response: dto::TopAlbumsResponse = self
            .call("artist.gettopalbums", &[("artist", artist), ("limit", &limit)])
            .await?;
        Ok(adapter::to_albums(response))
    }

    pub async fn top_tracks(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let limit = limit.to_string();
        let response: dto::TopTracksResponse = self
            .call("artist.gettoptracks", &[("artist", artist), ("limit", &limit)])
            .await?;
        Ok(adapter::to_tracks(response))
    }

    pub async fn recent_tracks(
        &self,
        artist: &str,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let limit = limit.to_string();
        let response: dto::TopTracksResponse = self
            .call(
                "artist.gettoptracks",
                &[
                    ("artist", artist),
                    ("limit", &limit),
                    ("period", period_for_window(window_days)),
                ],
            )
            .await?;
        Ok(adapter::to_tracks(response))
    }

    pub async fn album_info(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<CatalogAlbumDetail, CatalogError> {
        let response: dto::AlbumInfoResponse = self
            .call("album.getinfo", &[("artist", artist), ("album", album)])
            .await?;
        Ok(adapter::to_album_detail(response))
    }

    pub async fn track_info(&self, artist: &str, track: &str) -> Result<TrackInfo, CatalogError> {
        let response: dto::TrackInfoResponse = self
            .call("track.getinfo", &[("artist", artist), ("track", track)])
            .await?;
        Ok(adapter::to_track_info(response))
    }

    pub async fn similar_artists(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<SimilarArtist>, CatalogError> {
        let limit = limit.to_string();
        let response: dto::SimilarArtistsResponse = self
            .call("artist.getsimilar", &[("artist", artist), ("limit", &limit)])
            .await?;
        Ok(adapter::to_similar_artists(response))
    }

    /// Build the request URL for a method call
    fn method_url(&self, method: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&format=json",
            self.base_url,
            method,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Send the HTTP request and decode the response body
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.method_url(method, params);
        tracing::debug!(method, ?params, "Last.fm request");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::from_transport(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        // Error bodies are JSON even on 4xx, so decode before checking status
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::Parse(e.to_string())
                }
            })?;

        decode_body(status, body)
    }
}

/// Turn a decoded JSON body into the method's DTO or a catalog error
fn decode_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: serde_json::Value,
) -> Result<T, CatalogError> {
    if body.get("error").is_some() {
        let error: dto::ApiError =
            serde_json::from_value(body).map_err(|e| CatalogError::Parse(e.to_string()))?;
        return Err(match error.error {
            ERROR_NOT_FOUND => CatalogError::NotFound,
            ERROR_RATE_LIMITED => CatalogError::RateLimited,
            code => CatalogError::Api {
                code,
                message: error.message,
            },
        });
    }

    if !status.is_success() {
        return Err(CatalogError::Network(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    serde_json::from_value(body).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Round a window in days up to the nearest period `artist.getTopTracks` accepts
pub fn period_for_window(window_days: u32) -> &'static str {
    match window_days {
        0..=7 => "7day",
        8..=30 => "1month",
        31..=90 => "3month",
        91..=180 => "6month",
        181..=365 => "12month",
        _ => "overall",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn client() -> LastFmClient {
        LastFmClient::new("test key", "http://localhost:8080/2.0/", Duration::from_secs(10))
            .unwrap()
    }

    #[test]
    fn test_method_url_encodes_params() {
        let url = client().method_url("album.getinfo", &[("artist", "AC/DC"), ("album", "Back in Black")]);
        assert!(url.starts_with("http://localhost:8080/2.0/?method=album.getinfo"));
        assert!(url.contains("api_key=test%20key"));
        assert!(url.contains("artist=AC%2FDC"));
        assert!(url.contains("album=Back%20in%20Black"));
        assert!(url.contains("format=json"));
    }

    #[test]
    fn test_period_mapping() {
        assert_eq!(period_for_window(7), "7day");
        assert_eq!(period_for_window(30), "1month");
        assert_eq!(period_for_window(31), "3month");
        assert_eq!(period_for_window(180), "6month");
        assert_eq!(period_for_window(365), "12month");
        assert_eq!(period_for_window(1000), "overall");
    }

    #[test]
    fn test_decode_not_found_error() {
        let body = json!({"error": 6, "message": "Artist not found"});
        let result: Result<dto::TopAlbumsResponse, _> = decode_body(StatusCode::OK, body);
        assert_eq!(result.unwrap_err(), CatalogError::NotFound);
    }

    #[test]
    fn test_decode_rate_limit_error() {
        let body = json!({"error": 29, "message": "Rate Limit Exceeded"});
        let result: Result<dto::TopAlbumsResponse, _> =
            decode_body(StatusCode::BAD_REQUEST, body);
        assert_eq!(result.unwrap_err(), CatalogError::RateLimited);
    }

    #[test]
    fn test_decode_other_api_error() {
        let body = json!({"error": 10, "message": "Invalid API key"});
        let result: Result<dto::TopAlbumsResponse, _> = decode_body(StatusCode::FORBIDDEN, body);
        assert!(matches!(result, Err(CatalogError::Api { code: 10, .. })));
    }

    #[test]
    fn test_decode_http_failure_without_error_body() {
        let body = json!({});
        let result: Result<dto::TopAlbumsResponse, _> =
            decode_body(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(matches!(result, Err(CatalogError::Network(_))));
    }

    #[test]
    fn test_decode_malformed_body() {
        let body = json!({"topalbums": "nope"});
        let result: Result<dto::TopAlbumsResponse, _> = decode_body(StatusCode::OK, body);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_decode_success() {
        let body = json!({"topalbums": {"album": [{"name": "Evolve", "playcount": 900}]}});
        let result: dto::TopAlbumsResponse = decode_body(StatusCode::OK, body).unwrap();
        assert_eq!(result.top_albums.album[0].name, "Evolve");
    }
}
