use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{categories, distributions, donations, locations, recipients, reports, users};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves basic-auth credentials to an [`engine::Actor`] and stores it in
/// the request extensions. Inactive accounts are rejected even with correct
/// credentials.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let actor = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(actor) => actor,
        Err(EngineError::Database(err)) => {
            tracing::error!("authentication lookup failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let authed = Router::new()
        .route(
            "/profile",
            get(users::get_profile).patch(users::update_profile),
        )
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{username}",
            patch(users::set_role).delete(users::remove),
        )
        .route("/users/{username}/status", patch(users::set_status))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::remove),
        )
        .route("/locations", get(locations::list).post(locations::create))
        .route(
            "/locations/{id}",
            patch(locations::update).delete(locations::remove),
        )
        .route(
            "/recipients",
            get(recipients::list).post(recipients::create),
        )
        .route(
            "/recipients/{id}",
            patch(recipients::update).delete(recipients::remove),
        )
        .route("/donations", post(donations::create_batch))
        .route("/donations/mine", get(donations::mine))
        .route("/donations/pending", get(donations::pending))
        .route("/stock", get(donations::stock))
        .route("/distributions", post(distributions::create))
        .route("/reports/donations", get(reports::donations))
        .route("/stats", get(reports::stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/register", post(users::register))
        .merge(authed)
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

/// The full router with its state attached (also used by the router tests).
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
