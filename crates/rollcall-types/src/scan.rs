//! The QR encoding boundary.
//!
//! The admin screen encodes a URL into the QR canvas; the student's
//! scanner decodes it back and hands the parsed fields to the
//! attendance recorder. The URL carries exactly two things: which
//! session, and which token frame was on screen at scan time.
//!
//! Format:
//!
//! ```text
//! {base}/mark/{session_id}?t={token}
//! ```
//!
//! The token travels as a query parameter (not a path segment) so a
//! rotation never changes the QR deep-link's route shape.

use serde::{Deserialize, Serialize};

use crate::SessionId;

/// Path segment shared by encoder and parser.
const MARK_SEGMENT: &str = "mark";
/// Query key carrying the token frame.
const TOKEN_KEY: &str = "t";

/// Errors from parsing a scanned URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScanError {
    /// The URL doesn't contain the `/mark/{session_id}` route.
    #[error("not an attendance URL: {0}")]
    NotAttendanceUrl(String),

    /// The session id path segment is empty.
    #[error("missing session id in scanned URL")]
    MissingSessionId,

    /// The `t=` query parameter is absent or empty.
    #[error("missing token in scanned URL")]
    MissingToken,
}

/// The (session, token) pair a QR frame encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPayload {
    pub session_id: SessionId,
    /// The token value observed on the QR at scan time. The recorder
    /// re-verifies this against the session's *current* token, so a
    /// screenshot of an old frame is rejected once rotation moves on.
    pub token: String,
}

impl ScanPayload {
    pub fn new(session_id: SessionId, token: impl Into<String>) -> Self {
        Self {
            session_id,
            token: token.into(),
        }
    }

    /// Renders the URL to encode into the QR canvas.
    pub fn to_url(&self, base: &str) -> String {
        format!(
            "{}/{}/{}?{}={}",
            base.trim_end_matches('/'),
            MARK_SEGMENT,
            self.session_id.0,
            TOKEN_KEY,
            self.token
        )
    }

    /// Parses a scanned URL back into its payload.
    ///
    /// Tolerant of any base/origin prefix — only the trailing
    /// `/mark/{id}?t={token}` part matters.
    pub fn parse_url(url: &str) -> Result<Self, ScanError> {
        let (path, query) = match url.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (url, None),
        };

        let mut segments = path.rsplit('/');
        let session_segment = segments.next().unwrap_or("");
        let route_segment = segments.next().unwrap_or("");
        if route_segment != MARK_SEGMENT {
            return Err(ScanError::NotAttendanceUrl(url.to_string()));
        }
        if session_segment.is_empty() {
            return Err(ScanError::MissingSessionId);
        }

        let token = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == TOKEN_KEY)
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
            .ok_or(ScanError::MissingToken)?;

        Ok(Self {
            session_id: SessionId(session_segment.to_string()),
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_url_shape() {
        let payload = ScanPayload::new(SessionId("abc123".into()), "f00dcafe");
        assert_eq!(
            payload.to_url("https://attend.example.edu"),
            "https://attend.example.edu/mark/abc123?t=f00dcafe"
        );
    }

    #[test]
    fn test_to_url_trims_trailing_slash_on_base() {
        let payload = ScanPayload::new(SessionId("s".into()), "tok");
        assert_eq!(
            payload.to_url("https://x.test/"),
            "https://x.test/mark/s?t=tok"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let payload = ScanPayload::new(SessionId("abc123".into()), "f00dcafe");
        let url = payload.to_url("https://attend.example.edu");
        assert_eq!(ScanPayload::parse_url(&url).unwrap(), payload);
    }

    #[test]
    fn test_parse_ignores_extra_query_params() {
        let parsed =
            ScanPayload::parse_url("https://x.test/mark/s1?utm=qr&t=tok&x=1")
                .unwrap();
        assert_eq!(parsed.session_id, SessionId("s1".into()));
        assert_eq!(parsed.token, "tok");
    }

    #[test]
    fn test_parse_rejects_foreign_url() {
        let err = ScanPayload::parse_url("https://x.test/login?t=tok");
        assert!(matches!(err, Err(ScanError::NotAttendanceUrl(_))));
    }

    #[test]
    fn test_parse_rejects_missing_token() {
        let err = ScanPayload::parse_url("https://x.test/mark/s1");
        assert_eq!(err, Err(ScanError::MissingToken));

        let err = ScanPayload::parse_url("https://x.test/mark/s1?t=");
        assert_eq!(err, Err(ScanError::MissingToken));
    }

    #[test]
    fn test_parse_rejects_missing_session_id() {
        let err = ScanPayload::parse_url("https://x.test/mark/?t=tok");
        assert_eq!(err, Err(ScanError::MissingSessionId));
    }
}
