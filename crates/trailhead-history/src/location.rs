//! Locations and history state.
//!
//! A [`HistorySource`](crate::source::HistorySource) reports where it is as a
//! [`RawLocation`]. The navigator turns that into a [`Location`], whose
//! pathname is normalized: every component is percent-decoded and then
//! re-encoded with the `encodeURIComponent` character set, so equivalent
//! spellings of a path compare equal.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use trailhead_core::{TrailheadError, TrailheadResult};
use url::Url;

/// Key reported by a location whose entry carries no state.
pub const INITIAL_KEY: &str = "initial";

/// Characters escaped when re-encoding a path component. Everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// State stored with a history entry.
///
/// Values are immutable once written; [`HistoryState::stamp`] builds a new one
/// with a fresh key for every navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Distinguishes this entry from every other entry.
    pub key: String,
    /// Caller-supplied state.
    pub data: Option<serde_json::Value>,
}

impl HistoryState {
    /// Wraps `data` with a freshly generated key.
    pub fn stamp(data: Option<serde_json::Value>) -> Self {
        Self {
            key: uuid::Uuid::new_v4().simple().to_string(),
            data,
        }
    }
}

/// A location exactly as a history source reports it.
///
/// Sources that know nothing about origins (the memory source) leave those
/// fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub href: String,
    pub origin: String,
    pub protocol: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    /// State of the current entry, if any was written.
    pub state: Option<HistoryState>,
}

impl RawLocation {
    /// Builds a location from a path with an optional query, e.g.
    /// `/search?q=rust`. The search keeps its leading `?`.
    pub fn from_path(uri: &str) -> Self {
        let (pathname, search) = uri
            .find('?')
            .map_or((uri, ""), |idx| (&uri[..idx], &uri[idx..]));
        Self {
            pathname: pathname.to_string(),
            search: if search == "?" { String::new() } else { search.to_string() },
            ..Self::default()
        }
    }

    /// Builds a location from every component of an absolute URL.
    pub fn from_url(url: &Url, state: Option<HistoryState>) -> Self {
        let hostname = url.host_str().unwrap_or_default().to_string();
        let port = url.port().map(|p| p.to_string()).unwrap_or_default();
        let host = if port.is_empty() {
            hostname.clone()
        } else {
            format!("{hostname}:{port}")
        };
        Self {
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hash: url.fragment().map(|f| format!("#{f}")).unwrap_or_default(),
            href: url.as_str().to_string(),
            origin: url.origin().ascii_serialization(),
            protocol: format!("{}:", url.scheme()),
            host,
            hostname,
            port,
            state,
        }
    }
}

/// Where the navigator currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Normalized pathname.
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub href: String,
    pub origin: String,
    pub protocol: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    /// Caller-supplied state of the current entry.
    pub state: Option<serde_json::Value>,
    /// The entry's key, or [`INITIAL_KEY`] for an entry written without state.
    pub key: String,
}

impl Location {
    /// Derives a location from what a source reports.
    ///
    /// An empty pathname is recovered from `href` when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`TrailheadError::MalformedUri`] if a pathname component decodes
    /// to invalid UTF-8, and [`TrailheadError::InvalidUrl`] if an `href` needed
    /// for the pathname does not parse.
    pub fn from_raw(raw: &RawLocation) -> TrailheadResult<Self> {
        let pathname = if raw.pathname.is_empty() && !raw.href.is_empty() {
            Url::parse(&raw.href)?.path().to_string()
        } else {
            raw.pathname.clone()
        };

        let (state, key) = raw.state.as_ref().map_or((None, INITIAL_KEY.to_string()), |s| {
            (s.data.clone(), s.key.clone())
        });

        Ok(Self {
            pathname: normalize_pathname(&pathname)?,
            search: raw.search.clone(),
            hash: raw.hash.clone(),
            href: raw.href.clone(),
            origin: raw.origin.clone(),
            protocol: raw.protocol.clone(),
            host: raw.host.clone(),
            hostname: raw.hostname.clone(),
            port: raw.port.clone(),
            state,
            key,
        })
    }

    /// The pathname followed by the search, e.g. `/search?q=rust`.
    pub fn path_and_query(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

/// Decodes and re-encodes every `/`-separated component of `pathname`.
///
/// The result is stable: normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use trailhead_history::location::normalize_pathname;
///
/// assert_eq!(normalize_pathname("/caf%c3%a9/a b").unwrap(), "/caf%C3%A9/a%20b");
/// ```
pub fn normalize_pathname(pathname: &str) -> TrailheadResult<String> {
    let parts = pathname
        .split('/')
        .map(|part| {
            let decoded = percent_decode_str(part)
                .decode_utf8()
                .map_err(|e| TrailheadError::MalformedUri(format!("{part}: {e}")))?;
            Ok(utf8_percent_encode(&decoded, COMPONENT).to_string())
        })
        .collect::<TrailheadResult<Vec<_>>>()?;
    Ok(parts.join("/"))
}
