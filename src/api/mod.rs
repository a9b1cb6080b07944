pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Settings;
use middleware::rate_limit::{rate_limit, RateLimiter};
use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let settings = state.settings.clone();
    let limits = &settings.rate_limit;

    let api_limiter = RateLimiter::new(
        limits.api_max,
        Duration::from_secs(limits.window_seconds),
        "Too many requests from this IP, please try again later.",
        limits.enabled,
    );
    let auth_limiter = RateLimiter::new(
        limits.auth_max,
        Duration::from_secs(limits.window_seconds),
        "Too many authentication attempts, please try again later.",
        limits.enabled,
    );
    let create_limiter = RateLimiter::new(
        limits.create_max,
        Duration::from_secs(limits.create_window_seconds),
        "Too many create requests, please try again later.",
        limits.enabled,
    );

    Router::new()
        // Liveness probe, no auth
        .route("/health", get(handlers::root::health))
        // API routes
        .nest(
            "/api",
            api_routes(state.clone(), api_limiter, auth_limiter, create_limiter),
        )
        // Unknown routes get a {error, path} body
        .fallback(handlers::root::not_found)
        // Add state to the router
        .with_state(state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(cors_layer(&settings))
        .layer(TraceLayer::new_for_http())
}

fn api_routes(
    state: AppState,
    api_limiter: RateLimiter,
    auth_limiter: RateLimiter,
    create_limiter: RateLimiter,
) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(state.clone(), auth_limiter))
        .nest(
            "/announcements",
            announcement_routes(state.clone(), create_limiter.clone()),
        )
        .nest("/quizzes", quiz_routes(state, create_limiter))
        .layer(axum::middleware::from_fn_with_state(api_limiter, rate_limit))
}

fn auth_routes(state: AppState, auth_limiter: RateLimiter) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            post(handlers::auth::login).route_layer(axum::middleware::from_fn_with_state(
                auth_limiter.clone(),
                rate_limit,
            )),
        )
        .route(
            "/logout",
            post(handlers::auth::logout)
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth::require_auth,
                ))
                .route_layer(axum::middleware::from_fn_with_state(
                    auth_limiter,
                    rate_limit,
                )),
        )
        .route(
            "/me",
            get(handlers::auth::me).route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            )),
        )
}

fn announcement_routes(state: AppState, create_limiter: RateLimiter) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list))
        .route(
            "/",
            post(handlers::announcements::create).route_layer(
                axum::middleware::from_fn_with_state(create_limiter, rate_limit),
            ),
        )
        .route("/:id", get(handlers::announcements::get))
        .route("/:id", put(handlers::announcements::update))
        .route("/:id", delete(handlers::announcements::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn quiz_routes(state: AppState, create_limiter: RateLimiter) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::quizzes::list))
        .route(
            "/",
            post(handlers::quizzes::create).route_layer(axum::middleware::from_fn_with_state(
                create_limiter,
                rate_limit,
            )),
        )
        .route("/upcoming", get(handlers::quizzes::upcoming))
        .route("/:id", get(handlers::quizzes::get))
        .route("/:id", put(handlers::quizzes::update))
        .route("/:id", delete(handlers::quizzes::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    match settings.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(
                "Invalid CORS origin {:?}, falling back to permissive CORS",
                settings.server.cors_origin
            );
            CorsLayer::permissive()
        }
    }
}
