// HTTP routes: login flow, dashboard page, JSON API

mod api;
mod auth;
mod http;
mod pages;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::docker_repo::ContainerEngine;
use crate::grouping::GroupingRule;
use crate::session::SessionStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Arc<dyn ContainerEngine>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) grouping: Arc<GroupingRule>,
    pub(crate) config: AppConfig,
}

pub fn app(
    engine: Arc<dyn ContainerEngine>,
    sessions: Arc<SessionStore>,
    config: AppConfig,
) -> Router {
    let dispatcher = Arc::new(Dispatcher::new(
        engine.clone(),
        config.engine.project_label.clone(),
    ));
    let grouping = Arc::new(GroupingRule::new(
        config.engine.project_label.clone(),
        config.engine.fallback_group.clone(),
    ));
    let state = AppState {
        engine,
        dispatcher,
        sessions,
        grouping,
        config,
    };

    let api_routes = Router::new()
        .route("/api/containers", get(api::list_groups)) // GET /api/containers
        .route("/api/start/{id}", post(api::start_container)) // POST /api/start/:id
        .route("/api/stop/{id}", post(api::stop_container)) // POST /api/stop/:id
        .route("/api/delete/{id}", post(api::delete_container)) // POST /api/delete/:id
        .route("/api/group-action/{group}", post(api::group_action)) // POST /api/group-action/:group
        .route("/api/cpu-usage/{id}", get(api::cpu_usage)) // GET /api/cpu-usage/:id
        .route("/api/ram-usage/{id}", get(api::ram_usage)) // GET /api/ram-usage/:id
        .route("/api/network-info/{id}", get(api::network_info)) // GET /api/network-info/:id
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_session,
        ));

    let page_routes = Router::new()
        .route("/", get(pages::dashboard)) // GET /
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_page_session,
        ));

    Router::new()
        .route("/login", get(pages::login_page).post(auth::login)) // GET, POST /login
        .route("/logout", get(auth::logout)) // GET /logout
        .route("/version", get(http::version_handler)) // GET /version
        .merge(api_routes)
        .merge(page_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
