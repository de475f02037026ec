//! Classification and vehicle handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form, Json,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::AppError;
use super::flash::{self, Flash};
use super::forms::{ClassificationForm, DeleteClassificationForm, DeleteVehicleForm, InventoryForm};
use super::validation::{Validate, ValidationErrors};
use crate::auth::gate::Identity;
use crate::db::{Classification, InventoryItem, StoreError};
use crate::ui::{
    render, AddClassificationTemplate, ClassificationTemplate, DeleteClassificationTemplate, DeleteVehicleTemplate,
    DetailTemplate, InventoryManagementTemplate, Page, VehicleFormTemplate,
};
use crate::AppState;

const MANAGEMENT_PATH: &str = "/inv/";

pub const MSG_ADD_CLASSIFICATION_FAILED: &str = "Sorry, adding the classification failed.";
pub const MSG_ADD_VEHICLE_FAILED: &str = "Sorry, adding the vehicle failed.";
pub const MSG_UPDATE_VEHICLE_FAILED: &str = "Sorry, the update failed.";
pub const MSG_DELETE_FAILED: &str = "Sorry, the delete failed.";

/// Which vehicle form is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VehicleFormMode {
    Add,
    Edit,
}

impl VehicleFormMode {
    fn action(self) -> &'static str {
        match self {
            VehicleFormMode::Add => "/inv/add-inventory",
            VehicleFormMode::Edit => "/inv/update",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            VehicleFormMode::Add => "Add Vehicle",
            VehicleFormMode::Edit => "Update Vehicle",
        }
    }

    fn title(self, form: &InventoryForm) -> String {
        match self {
            VehicleFormMode::Add => "Add Vehicle".to_string(),
            VehicleFormMode::Edit => format!("Edit {} {}", form.inv_make.trim(), form.inv_model.trim()),
        }
    }
}

async fn vehicle_form_view(
    state: &AppState,
    identity: &Identity,
    mode: VehicleFormMode,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    form: InventoryForm,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, mode.title(&form), notice).await?;
    Ok(render(
        status,
        VehicleFormTemplate {
            page,
            errors,
            form,
            action: mode.action(),
            submit_label: mode.submit_label(),
        },
    )?)
}

async fn add_classification_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    form: ClassificationForm,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, "Add Classification", notice).await?;
    Ok(render(status, AddClassificationTemplate { page, errors, form })?)
}

async fn delete_classification_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    classification: Classification,
) -> Result<Response, AppError> {
    let vehicle_count = match state.store.count_vehicles_in(classification.classification_id).await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Failed to count vehicles in classification");
            None
        }
    };
    let title = format!("Delete {}", classification.classification_name);
    let page = Page::build(&state.store, identity, title, notice).await?;
    Ok(render(
        status,
        DeleteClassificationTemplate {
            page,
            errors,
            classification,
            vehicle_count,
        },
    )?)
}

/// GET /inv/type/:classification_id
pub async fn build_by_classification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(classification_id): Path<i64>,
) -> Result<Response, AppError> {
    let classification = state
        .store
        .find_classification(classification_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("classification {} not found", classification_id)))?;
    let items = state.store.inventory_by_classification(classification_id).await?;

    let title = format!("{} vehicles", classification.classification_name);
    let page = Page::build(&state.store, &identity, title, flash.notice()).await?;
    Ok(render(
        StatusCode::OK,
        ClassificationTemplate {
            page,
            classification,
            items,
        },
    )?)
}

/// GET /inv/detail/:inv_id
pub async fn build_detail(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(inv_id): Path<i64>,
) -> Result<Response, AppError> {
    let item = state
        .store
        .find_vehicle(inv_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("vehicle {} not found", inv_id)))?;

    let title = format!("{} {}", item.inv_year, item.title());
    let page = Page::build(&state.store, &identity, title, flash.notice()).await?;
    Ok(render(StatusCode::OK, DetailTemplate { page, item })?)
}

/// GET /inv/getInventory/:classification_id
pub async fn inventory_json(
    State(state): State<Arc<AppState>>,
    Path(classification_id): Path<i64>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let items = state.store.inventory_by_classification(classification_id).await?;
    Ok(Json(items))
}

/// GET /inv/
pub async fn build_management(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, &identity, "Vehicle Management", flash.notice()).await?;
    Ok(render(StatusCode::OK, InventoryManagementTemplate { page })?)
}

/// GET /inv/add-classification
pub async fn build_add_classification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    add_classification_view(
        &state,
        &identity,
        StatusCode::OK,
        flash.notice(),
        ValidationErrors::new(),
        ClassificationForm::default(),
    )
    .await
}

/// POST /inv/add-classification
pub async fn add_classification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<ClassificationForm>,
) -> Result<Response, AppError> {
    let name = match form.validate(&state.store).await {
        Ok(Ok(name)) => name,
        Ok(Err(errors)) => {
            return add_classification_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, form).await;
        }
        Err(e) => {
            error!(error = %e, "Classification validation failed");
            return add_classification_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_ADD_CLASSIFICATION_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await;
        }
    };

    match state.store.insert_classification(&name).await {
        Ok(classification) => {
            info!(classification_id = classification.classification_id, name = %name, "Added classification");
            let notice = format!("The {} classification was successfully added.", classification.classification_name);
            Ok(flash::redirect(jar, MANAGEMENT_PATH, notice))
        }
        Err(StoreError::Conflict) => {
            let mut errors = ValidationErrors::new();
            errors.add("classification_name", super::forms::MSG_CLASSIFICATION_EXISTS);
            add_classification_view(&state, &identity, StatusCode::CONFLICT, None, errors, form).await
        }
        Err(e) => {
            error!(error = %e, "Failed to insert classification");
            add_classification_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_ADD_CLASSIFICATION_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await
        }
    }
}

/// GET /inv/add-inventory
pub async fn build_add_inventory(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    vehicle_form_view(
        &state,
        &identity,
        VehicleFormMode::Add,
        StatusCode::OK,
        flash.notice(),
        ValidationErrors::new(),
        InventoryForm::blank(),
    )
    .await
}

/// POST /inv/add-inventory
pub async fn add_inventory(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<InventoryForm>,
) -> Result<Response, AppError> {
    let mode = VehicleFormMode::Add;
    let vehicle = match form.validate(&state.store).await {
        Ok(Ok(vehicle)) => vehicle,
        Ok(Err(errors)) => {
            return vehicle_form_view(&state, &identity, mode, StatusCode::BAD_REQUEST, None, errors, form).await;
        }
        Err(e) => {
            error!(error = %e, "Vehicle validation failed");
            return vehicle_form_view(
                &state,
                &identity,
                mode,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_ADD_VEHICLE_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await;
        }
    };

    match state.store.insert_vehicle(&vehicle).await {
        Ok(inv_id) => {
            info!(inv_id, "Added vehicle");
            let notice = format!("The {} {} was successfully added.", vehicle.make, vehicle.model);
            Ok(flash::redirect(jar, MANAGEMENT_PATH, notice))
        }
        Err(e) => {
            error!(error = %e, "Failed to insert vehicle");
            vehicle_form_view(
                &state,
                &identity,
                mode,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_ADD_VEHICLE_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await
        }
    }
}

/// GET /inv/edit/:inv_id
pub async fn build_edit(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(inv_id): Path<i64>,
) -> Result<Response, AppError> {
    let item = state
        .store
        .find_vehicle(inv_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("vehicle {} not found", inv_id)))?;
    vehicle_form_view(
        &state,
        &identity,
        VehicleFormMode::Edit,
        StatusCode::OK,
        flash.notice(),
        ValidationErrors::new(),
        InventoryForm::from(&item),
    )
    .await
}

/// POST /inv/update
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<InventoryForm>,
) -> Result<Response, AppError> {
    let mode = VehicleFormMode::Edit;
    let inv_id = form
        .inv_id
        .ok_or_else(|| AppError::not_found("vehicle update without an id").with_status(StatusCode::BAD_REQUEST))?;

    let vehicle = match form.validate(&state.store).await {
        Ok(Ok(vehicle)) => vehicle,
        Ok(Err(errors)) => {
            return vehicle_form_view(&state, &identity, mode, StatusCode::BAD_REQUEST, None, errors, form).await;
        }
        Err(e) => {
            error!(error = %e, "Vehicle validation failed");
            return vehicle_form_view(
                &state,
                &identity,
                mode,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UPDATE_VEHICLE_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await;
        }
    };

    match state.store.update_vehicle(inv_id, &vehicle).await {
        Ok(true) => {
            info!(inv_id, "Updated vehicle");
            let notice = format!("The {} {} was successfully updated.", vehicle.make, vehicle.model);
            Ok(flash::redirect(jar, MANAGEMENT_PATH, notice))
        }
        Ok(false) => Err(AppError::not_found(format!("vehicle {} not found", inv_id))),
        Err(e) => {
            error!(error = %e, inv_id, "Failed to update vehicle");
            vehicle_form_view(
                &state,
                &identity,
                mode,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UPDATE_VEHICLE_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await
        }
    }
}

/// GET /inv/delete/:inv_id
pub async fn build_delete(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(inv_id): Path<i64>,
) -> Result<Response, AppError> {
    let item = state
        .store
        .find_vehicle(inv_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("vehicle {} not found", inv_id)))?;

    let title = format!("Delete {}", item.title());
    let page = Page::build(&state.store, &identity, title, flash.notice()).await?;
    Ok(render(StatusCode::OK, DeleteVehicleTemplate { page, item })?)
}

/// POST /inv/delete
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<DeleteVehicleForm>,
) -> Result<Response, AppError> {
    match state.store.delete_vehicle(form.inv_id).await {
        Ok(true) => {
            info!(inv_id = form.inv_id, "Deleted vehicle");
            Ok(flash::redirect(jar, MANAGEMENT_PATH, "The deletion was successful."))
        }
        Ok(false) => Err(AppError::not_found(format!("vehicle {} not found", form.inv_id))),
        Err(e) => {
            error!(error = %e, inv_id = form.inv_id, "Failed to delete vehicle");
            let to = format!("/inv/delete/{}", form.inv_id);
            Ok(flash::redirect(jar, &to, MSG_DELETE_FAILED))
        }
    }
}

/// GET /inv/delete-classification/:classification_id
pub async fn build_delete_classification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(classification_id): Path<i64>,
) -> Result<Response, AppError> {
    let classification = state
        .store
        .find_classification(classification_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("classification {} not found", classification_id)))?;
    delete_classification_view(
        &state,
        &identity,
        StatusCode::OK,
        flash.notice(),
        ValidationErrors::new(),
        classification,
    )
    .await
}

/// POST /inv/delete-classification
///
/// Refused while any vehicle is still filed under the classification.
pub async fn delete_classification(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<DeleteClassificationForm>,
) -> Result<Response, AppError> {
    let classification = match form.validate(&state.store).await {
        Ok(Ok(classification)) => classification,
        Ok(Err(errors)) => {
            let Some(classification) = state.store.find_classification(form.classification_id).await? else {
                return Err(AppError::not_found(format!(
                    "classification {} not found",
                    form.classification_id
                )));
            };
            return delete_classification_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, classification)
                .await;
        }
        Err(e) => {
            error!(error = %e, "Classification delete validation failed");
            let Some(classification) = state.store.find_classification(form.classification_id).await? else {
                return Err(e.into());
            };
            return delete_classification_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_DELETE_FAILED.to_string()),
                ValidationErrors::new(),
                classification,
            )
            .await;
        }
    };

    match state.store.delete_classification(classification.classification_id).await {
        Ok(true) => {
            info!(classification_id = classification.classification_id, "Deleted classification");
            let notice = format!("The {} classification was deleted.", classification.classification_name);
            Ok(flash::redirect(jar, MANAGEMENT_PATH, notice))
        }
        Ok(false) => Err(AppError::not_found(format!(
            "classification {} not found",
            classification.classification_id
        ))),
        Err(StoreError::Referenced) => {
            // A vehicle was filed under it after the check
            let mut errors = ValidationErrors::new();
            errors.add("classification_id", super::forms::MSG_CLASSIFICATION_IN_USE);
            delete_classification_view(&state, &identity, StatusCode::CONFLICT, None, errors, classification).await
        }
        Err(e) => {
            error!(error = %e, "Failed to delete classification");
            delete_classification_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_DELETE_FAILED.to_string()),
                ValidationErrors::new(),
                classification,
            )
            .await
        }
    }
}

/// GET /inv/trigger-error
pub async fn trigger_error() -> Result<Response, AppError> {
    Err(AppError::internal("Intentional server error"))
}
