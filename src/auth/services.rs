use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::{
    cpf,
    dto::{
        DebugUsersResponse, HealthResponse, RegisterRequest, SessionResponse, UserWithPassword,
        UsersResponse,
    },
    error::AuthError,
    failure::FailureInjector,
    repo::UserStore,
    repo_types::{NewUser, User},
    tokens::{self, TokenKind},
};
use crate::config::MockConfig;

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Stateless field checks run before touching the store, in the order
/// clients expect the first failing rule to be reported.
pub fn validate_registration(req: &RegisterRequest) -> Result<NewUser, AuthError> {
    let name = req.name.trim();
    let email = req.email.trim();
    let cpf_raw = req.cpf.trim();
    if name.is_empty() || email.is_empty() || req.password.is_empty() || cpf_raw.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if !cpf::is_valid_cpf(cpf_raw) {
        return Err(AuthError::InvalidCpf);
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }

    let phone = req
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(NewUser {
        name: name.to_string(),
        email: normalize_email(email),
        cpf: cpf::normalize(cpf_raw),
        phone,
        password: req.password.clone(),
    })
}

/// The fake identity backend: in-memory users, opaque tokens, simulated
/// latency and flaky refreshes.
#[derive(Debug)]
pub struct IdentityService {
    store: RwLock<UserStore>,
    failures: FailureInjector,
    config: MockConfig,
}

impl IdentityService {
    pub fn new(store: UserStore, config: MockConfig) -> Self {
        let failures =
            FailureInjector::new(config.refresh_failure_rate, config.refresh_failure_seed);
        Self {
            store: RwLock::new(store),
            failures,
            config,
        }
    }

    fn issue_session(&self, user: User, kind: TokenKind) -> SessionResponse {
        let now = OffsetDateTime::now_utc();
        let (access, refresh) = kind.markers();
        SessionResponse {
            token: tokens::mint(access, now, &user.id),
            refresh_token: tokens::mint(refresh, now, &user.id),
            expires_at: now + TimeDuration::minutes(self.config.token_ttl_minutes),
            user,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionResponse, AuthError> {
        // Normalized like registration stores it, so the address as typed at signup logs in.
        let email = normalize_email(email);
        info!(email = %email, "login attempt");

        let user = {
            let store = self.store.read().await;
            match store.password_for(&email) {
                Some(stored) if stored == password => {}
                _ => {
                    warn!(email = %email, "login invalid credentials");
                    return Err(AuthError::InvalidCredentials);
                }
            }
            match store.find_by_email(&email) {
                Some(user) => user.clone(),
                None => {
                    warn!(email = %email, "credential without user record");
                    return Err(AuthError::UserNotFound);
                }
            }
        };

        tokio::time::sleep(self.config.login_delay).await;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(self.issue_session(user, TokenKind::Login))
    }

    pub fn logout(&self, auth_header: Option<&str>) {
        debug!(authorization = ?auth_header, "logout request");
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionResponse, AuthError> {
        if self.failures.should_fail() {
            warn!("simulated refresh token expiry");
            return Err(AuthError::RefreshTokenExpired);
        }

        let user = {
            let store = self.store.read().await;
            let owner = tokens::user_id_from_refresh(refresh_token)
                .and_then(|id| store.find_by_id(id));
            match owner {
                Some(user) => user.clone(),
                None if self.config.refresh_strict => {
                    warn!("malformed refresh token rejected");
                    return Err(AuthError::MalformedToken);
                }
                None => {
                    warn!("unrecognized refresh token, falling back to first user");
                    store.first().cloned().ok_or(AuthError::UserNotFound)?
                }
            }
        };

        debug!(user_id = %user.id, "token refreshed");
        Ok(self.issue_session(user, TokenKind::Refresh))
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        let new_user = match validate_registration(req) {
            Ok(u) => u,
            Err(e) => {
                warn!(email = %req.email, error = %e, "registration rejected");
                return Err(e);
            }
        };

        tokio::time::sleep(self.config.register_delay).await;

        let mut store = self.store.write().await;
        let user = store
            .insert(new_user, OffsetDateTime::now_utc())
            .map_err(|e| {
                warn!(email = %req.email, error = %e, "registration conflict");
                e
            })?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok",
            timestamp: OffsetDateTime::now_utc(),
            users_count: self.store.read().await.len(),
        }
    }

    pub async fn list_users(&self) -> UsersResponse {
        let store = self.store.read().await;
        UsersResponse {
            users: store.users().to_vec(),
            credentials: store.credential_emails(),
        }
    }

    /// Joins every user with its plaintext password. Fixture-only.
    pub async fn users_with_credentials(&self) -> DebugUsersResponse {
        let store = self.store.read().await;
        let users = store
            .users()
            .iter()
            .map(|u| UserWithPassword {
                password: store.password_for(&u.email.to_lowercase()).map(str::to_string),
                user: u.clone(),
            })
            .collect();
        DebugUsersResponse { users }
    }

    #[cfg(test)]
    pub(crate) async fn with_store<R>(&self, f: impl FnOnce(&mut UserStore) -> R) -> R {
        let mut store = self.store.write().await;
        f(&mut store)
    }
}
