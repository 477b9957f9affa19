use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::password_reset::password_reset;
use super::handlers::password_reset_confirm::password_reset_confirm;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::resend_verification::resend_verification;
use super::handlers::verify_email::verify_email;
use super::handlers::verify_token::verify_token;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::ports::AuthServicePort;

pub struct AppState<S: AuthServicePort> {
    pub auth_service: Arc<S>,
    /// Base link embedded in verification messages
    pub verify_email_url: String,
}

impl<S: AuthServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            verify_email_url: self.verify_email_url.clone(),
        }
    }
}

pub fn create_router<S: AuthServicePort>(
    auth_service: Arc<S>,
    verify_email_url: String,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        auth_service,
        verify_email_url,
    };

    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/register", post(register::<S>))
        .route("/api/v1/login", post(login::<S>))
        .route("/api/v1/refresh", post(refresh::<S>))
        .route("/api/v1/verify-token", post(verify_token::<S>))
        .route("/api/v1/logout", post(logout::<S>))
        .route("/api/v1/verify", get(verify_email::<S>))
        .route(
            "/api/v1/resend-verification",
            post(resend_verification::<S>),
        )
        .route("/api/v1/password-reset", post(password_reset::<S>))
        .route(
            "/api/v1/password-reset-confirm",
            post(password_reset_confirm::<S>),
        );

    let protected_routes = Router::new()
        .route("/api/v1/authorized/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
