use crate::state::AppState;
use axum::Router;

pub mod cpf;
pub mod dto;
pub mod error;
pub mod failure;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod tokens;

pub fn router(expose_debug_routes: bool) -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::introspection_routes());
    if expose_debug_routes {
        router.merge(handlers::debug_routes())
    } else {
        router
    }
}
