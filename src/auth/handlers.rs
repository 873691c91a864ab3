use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            DebugUsersResponse, HealthResponse, LoginRequest, MessageResponse, RefreshRequest,
            RegisterRequest, RegisterResponse, SessionResponse, UsersResponse,
        },
        error::AuthError,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

pub fn introspection_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users))
}

pub fn debug_routes() -> Router<AppState> {
    Router::new().route("/debug/users-credentials", get(users_with_credentials))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let session = state
        .identity
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(session))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let user = state.identity.register(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuário cadastrado com sucesso".into(),
            user,
        }),
    ))
}

#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    let auth_header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.identity.logout(auth_header);
    Json(MessageResponse {
        message: "Logout realizado com sucesso".into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let session = state.identity.refresh(&payload.refresh_token).await?;
    Ok(Json(session))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.identity.health().await)
}

pub async fn list_users(State(state): State<AppState>) -> Json<UsersResponse> {
    Json(state.identity.list_users().await)
}

pub async fn users_with_credentials(State(state): State<AppState>) -> Json<DebugUsersResponse> {
    Json(state.identity.users_with_credentials().await)
}
