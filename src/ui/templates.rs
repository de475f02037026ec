use askama::Template;

use super::Page;
use crate::api::forms::{ClassificationForm, InventoryForm, RegistrationForm, UpdateAccountForm};
use crate::api::validation::ValidationErrors;
use crate::db::{Classification, InventoryItem};

// Home
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: Page,
    pub latest: Vec<InventoryItem>,
}

// Generic error view
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: Page,
    pub status: u16,
    pub message: String,
}

// Account views

#[derive(Template)]
#[template(path = "account/login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub account_email: String,
}

#[derive(Template)]
#[template(path = "account/register.html")]
pub struct RegisterTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub form: RegistrationForm,
}

#[derive(Template)]
#[template(path = "account/management.html")]
pub struct AccountManagementTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "account/update.html")]
pub struct UpdateAccountTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub form: UpdateAccountForm,
}

#[derive(Template)]
#[template(path = "account/change_password.html")]
pub struct ChangePasswordTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub account_id: i64,
}

// Inventory views

#[derive(Template)]
#[template(path = "inventory/classification.html")]
pub struct ClassificationTemplate {
    pub page: Page,
    pub classification: Classification,
    pub items: Vec<InventoryItem>,
}

#[derive(Template)]
#[template(path = "inventory/detail.html")]
pub struct DetailTemplate {
    pub page: Page,
    pub item: InventoryItem,
}

#[derive(Template)]
#[template(path = "inventory/management.html")]
pub struct InventoryManagementTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "inventory/add_classification.html")]
pub struct AddClassificationTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub form: ClassificationForm,
}

/// Shared by the add and edit vehicle views; `action` is the form target.
#[derive(Template)]
#[template(path = "inventory/vehicle_form.html")]
pub struct VehicleFormTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub form: InventoryForm,
    pub action: &'static str,
    pub submit_label: &'static str,
}

#[derive(Template)]
#[template(path = "inventory/delete_vehicle.html")]
pub struct DeleteVehicleTemplate {
    pub page: Page,
    pub item: InventoryItem,
}

#[derive(Template)]
#[template(path = "inventory/delete_classification.html")]
pub struct DeleteClassificationTemplate {
    pub page: Page,
    pub errors: ValidationErrors,
    pub classification: Classification,
    /// None when the store could not count them
    pub vehicle_count: Option<i64>,
}

impl DeleteClassificationTemplate {
    pub fn can_delete(&self) -> bool {
        self.vehicle_count == Some(0)
    }
}
