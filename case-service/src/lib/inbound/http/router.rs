use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_assignment::create_assignment;
use super::handlers::create_identity::create_identity;
use super::handlers::health::health;
use super::handlers::list_assignments::list_assignments;
use super::handlers::login::login;
use super::handlers::update_assignment::update_assignment;
use super::middleware::authenticate;
use super::middleware::require_admin;
use crate::domain::access::authentication::AuthenticationService;
use crate::domain::access::gate::AuthorizationGate;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::assignment::service::AssignmentService;
use crate::domain::identity::ports::IdentityRepository;

pub struct AppState<IR, AR>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    pub authentication: Arc<AuthenticationService<IR>>,
    pub gate: Arc<AuthorizationGate<IR>>,
    pub assignments: Arc<AssignmentService<AR, IR>>,
}

// Derived Clone would require IR: Clone and AR: Clone.
impl<IR, AR> Clone for AppState<IR, AR>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    fn clone(&self) -> Self {
        Self {
            authentication: Arc::clone(&self.authentication),
            gate: Arc::clone(&self.gate),
            assignments: Arc::clone(&self.assignments),
        }
    }
}

pub fn create_router<IR, AR>(state: AppState<IR, AR>) -> Router
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(login::<IR, AR>));

    let authenticated_routes = Router::new()
        .route(
            "/clients/:client_id/services/:user_id",
            put(update_assignment::<IR, AR>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<IR, AR>,
        ));

    // Layers run outermost-last: authenticate, then require_admin.
    let admin_routes = Router::new()
        .route("/auth/users", post(create_identity::<IR, AR>))
        .route(
            "/clients/:client_id/case-assignment",
            post(create_assignment::<IR, AR>),
        )
        .route(
            "/clients/:client_id/services",
            get(list_assignments::<IR, AR>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin::<IR, AR>,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<IR, AR>,
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
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
