use time::OffsetDateTime;

/// Prefix identifying which flow minted a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMarker {
    MockToken,
    MockRefresh,
    NewToken,
    NewRefresh,
}

impl TokenMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MockToken => "mock_token",
            Self::MockRefresh => "mock_refresh",
            Self::NewToken => "new_token",
            Self::NewRefresh => "new_refresh",
        }
    }
}

const REFRESH_MARKERS: [TokenMarker; 2] = [TokenMarker::MockRefresh, TokenMarker::NewRefresh];

/// Access/refresh markers for one issuing flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Login,
    Refresh,
}

impl TokenKind {
    pub fn markers(self) -> (TokenMarker, TokenMarker) {
        match self {
            Self::Login => (TokenMarker::MockToken, TokenMarker::MockRefresh),
            Self::Refresh => (TokenMarker::NewToken, TokenMarker::NewRefresh),
        }
    }
}

/// `<marker>_<epoch-ms>_<user-id>`. Opaque and unsigned.
pub fn mint(marker: TokenMarker, issued_at: OffsetDateTime, user_id: &str) -> String {
    let epoch_ms = issued_at.unix_timestamp_nanos() / 1_000_000;
    format!("{}_{}_{}", marker.as_str(), epoch_ms, user_id)
}

/// Recovers the user id from a refresh token, if it looks like one we minted.
pub fn user_id_from_refresh(token: &str) -> Option<&str> {
    if !REFRESH_MARKERS.iter().any(|m| token.contains(m.as_str())) {
        return None;
    }
    let parts: Vec<&str> = token.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    parts.last().copied().filter(|id| !id.is_empty())
}
