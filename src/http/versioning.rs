//! API version negotiation.
//!
//! The version is read from the `v{version}` path segment after `/api`, the
//! `api-version` query parameter, the `X-Version` header, or the `ver`
//! parameter of the `Content-Type`/`Accept` media type. When none is given,
//! [`ApiVersion::DEFAULT`] is assumed. Sources that disagree are rejected.

use std::fmt;
use std::str::FromStr;
use axum::extract::{Query, Request};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use super::error::ApiError;

pub static X_VERSION: HeaderName = HeaderName::from_static("x-version");
pub static API_SUPPORTED_VERSIONS: HeaderName = HeaderName::from_static("api-supported-versions");

pub const VERSION_QUERY_PARAM: &str = "api-version";
pub const VERSION_MEDIA_TYPE_PARAM: &str = "ver";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
}

impl ApiVersion {
    pub const V1_0: ApiVersion = ApiVersion { major: 1, minor: 0 };
    pub const DEFAULT: ApiVersion = ApiVersion::V1_0;
    pub const SUPPORTED: &'static [ApiVersion] = &[ApiVersion::V1_0];

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = ApiError;

    /// Accepts `1`, `1.0`, `v1` and `v1.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::UnsupportedVersion(format!("invalid API version '{s}'"));
        let digits = s.trim().strip_prefix(['v', 'V']).unwrap_or(s.trim());
        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, "0"),
        };
        Ok(ApiVersion {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// Collects every version the request states, in no particular priority.
fn requested_versions(req: &Request) -> Result<Vec<ApiVersion>, ApiError> {
    let mut versions = Vec::new();

    let mut segments = req.uri().path().split('/').filter(|s| !s.is_empty());
    if let (Some("api"), Some(segment)) = (segments.next(), segments.next()) {
        if segment != "produtos" {
            if !segment.starts_with(['v', 'V']) {
                return Err(ApiError::UnsupportedVersion(format!("invalid API version segment '{segment}'")));
            }
            versions.push(segment.parse()?);
        }
    }

    let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
        .map_err(|e| ApiError::UnsupportedVersion(format!("invalid query string: {}", e.body_text())))?;
    for (name, value) in params {
        if name == VERSION_QUERY_PARAM {
            versions.push(value.parse()?);
        }
    }

    if let Some(value) = req.headers().get(&X_VERSION) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::UnsupportedVersion("invalid X-Version header".to_string()))?;
        versions.push(value.parse()?);
    }

    for header in [CONTENT_TYPE, ACCEPT] {
        let Some(media_type) = req.headers().get(&header).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        for param in media_type.split(';').skip(1) {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case(VERSION_MEDIA_TYPE_PARAM) {
                    versions.push(value.trim_matches(|c: char| c == '"' || c.is_whitespace()).parse()?);
                }
            }
        }
    }

    Ok(versions)
}

/// Resolves the single version a request asks for.
pub fn resolve_version(req: &Request) -> Result<ApiVersion, ApiError> {
    let versions = requested_versions(req)?;
    let Some(first) = versions.first().copied() else {
        return Ok(ApiVersion::DEFAULT);
    };
    if versions.iter().any(|v| *v != first) {
        return Err(ApiError::UnsupportedVersion(
            "the request specifies more than one API version".to_string(),
        ));
    }
    if !first.is_supported() {
        return Err(ApiError::UnsupportedVersion(format!("API version {first} is not supported")));
    }
    Ok(first)
}

fn supported_versions_header() -> HeaderValue {
    let list = ApiVersion::SUPPORTED
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&list).unwrap_or_else(|_| HeaderValue::from_static("1.0"))
}

/// Middleware storing the negotiated [`ApiVersion`] in the request extensions
/// and reporting the supported versions on every response.
pub async fn api_version_middleware(mut req: Request, next: Next) -> Response {
    let mut response = match resolve_version(&req) {
        Ok(version) => {
            debug!(%version, "API version resolved");
            req.extensions_mut().insert(version);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    };
    response
        .headers_mut()
        .insert(API_SUPPORTED_VERSIONS.clone(), supported_versions_header());
    response
}
