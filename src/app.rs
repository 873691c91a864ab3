use std::net::SocketAddr;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::auth;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let expose_debug_routes = state.config.mock.expose_debug_routes;
    Router::new()
        .merge(auth::router(expose_debug_routes))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

fn announce(state: &AppState, addr: SocketAddr) {
    tracing::info!("mock server running on http://{}", addr);
    let mut endpoints = vec![
        "POST /auth/login",
        "POST /auth/register",
        "POST /auth/logout",
        "POST /auth/refresh",
        "GET /health",
        "GET /users",
    ];
    if state.config.mock.expose_debug_routes {
        endpoints.push("GET /debug/users-credentials");
    }
    for endpoint in endpoints {
        tracing::info!(endpoint, "available");
    }
    tracing::info!(
        password = auth::repo::SEED_PASSWORD,
        "test credentials: joao@test.com, maria@test.com, sindico@test.com"
    );
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    announce(&state, addr);
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
