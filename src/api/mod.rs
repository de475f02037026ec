pub mod account;
pub mod error;
pub mod flash;
pub mod forms;
pub mod inventory;
pub mod validation;

#[cfg(test)]
mod tests;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::gate::{self, GuardChain, Identity, ADMIN, MEMBER, STAFF_ACTION, STAFF_VIEW};
use crate::ui::{render, IndexTemplate, Page};
use crate::AppState;
use error::AppError;
use flash::Flash;

/// Vehicles shown on the home page
const LATEST_VEHICLES: i64 = 3;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Account routes (public)
    let public_account = Router::new()
        .route("/account/login", get(account::build_login))
        .route("/account/login", post(account::login))
        .route("/account/register", get(account::build_register))
        .route("/account/register", post(account::register))
        .route("/account/logout", get(account::logout));

    // Account routes for the logged-in owner
    let member_account = Router::new()
        .route("/account", get(account::build_management))
        .route("/account/", get(account::build_management))
        .route("/account/update/:account_id", get(account::build_update))
        .route("/account/change-password/:account_id", get(account::build_change_password))
        .route("/account/update", post(account::update_account))
        .route("/account/update-password", post(account::update_password))
        .route_layer(middleware::from_fn_with_state(
            GuardChain::new(state.clone(), MEMBER),
            gate::enforce,
        ));

    // Catalog (public)
    let public_inventory = Router::new()
        .route("/inv/type/:classification_id", get(inventory::build_by_classification))
        .route("/inv/detail/:inv_id", get(inventory::build_detail))
        .route("/inv/getInventory/:classification_id", get(inventory::inventory_json))
        .route("/inv/trigger-error", get(inventory::trigger_error));

    // Staff views: anonymous visitors are sent to log in
    let staff_views = Router::new()
        .route("/inv", get(inventory::build_management))
        .route("/inv/", get(inventory::build_management))
        .route("/inv/add-classification", get(inventory::build_add_classification))
        .route("/inv/add-inventory", get(inventory::build_add_inventory))
        .route("/inv/edit/:inv_id", get(inventory::build_edit))
        .route("/inv/delete/:inv_id", get(inventory::build_delete))
        .route_layer(middleware::from_fn_with_state(
            GuardChain::new(state.clone(), STAFF_VIEW),
            gate::enforce,
        ));

    // Staff mutations: refused with 403 without the role
    let staff_actions = Router::new()
        .route("/inv/add-classification", post(inventory::add_classification))
        .route("/inv/add-inventory", post(inventory::add_inventory))
        .route("/inv/update", post(inventory::update_vehicle))
        .route("/inv/delete", post(inventory::delete_vehicle))
        .route_layer(middleware::from_fn_with_state(
            GuardChain::new(state.clone(), STAFF_ACTION),
            gate::enforce,
        ));

    let admin_routes = Router::new()
        .route(
            "/inv/delete-classification/:classification_id",
            get(inventory::build_delete_classification),
        )
        .route("/inv/delete-classification", post(inventory::delete_classification))
        .route_layer(middleware::from_fn_with_state(
            GuardChain::new(state.clone(), ADMIN),
            gate::enforce,
        ));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .merge(public_account)
        .merge(member_account)
        .merge(public_inventory)
        .merge(staff_views)
        .merge(staff_actions)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), gate::identify))
        .layer(middleware::from_fn(flash::sweep))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// GET /
async fn home(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    let latest = state.store.latest_vehicles(LATEST_VEHICLES).await?;
    let page = Page::build(&state.store, &identity, "Home", flash.notice()).await?;
    Ok(render(StatusCode::OK, IndexTemplate { page, latest })?)
}

/// Fallback for paths that match neither a route nor a static file.
pub async fn not_found() -> Response {
    AppError::not_found("no route or file").into_response()
}
