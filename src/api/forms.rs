//! Submitted forms and their rule sets.
//!
//! Fields arrive as raw strings so a rejected form can be echoed back
//! exactly as typed. Validation produces the sanitized values a handler
//! acts on.

use async_trait::async_trait;
use serde::Deserialize;

use super::validation::{
    is_classification_name, is_email, is_present, normalize_email, parse_id, parse_integer_at_least,
    parse_number_in_range, Validate, ValidationErrors, CHANGE_POLICY, REGISTRATION_POLICY,
};
use crate::db::{Classification, Store, StoreError, VehicleData};

pub const MSG_FIRST_NAME: &str = "Please provide a first name.";
pub const MSG_LAST_NAME: &str = "Please provide a last name.";
pub const MSG_EMAIL: &str = "A valid email is required.";
pub const MSG_EMAIL_REGISTERED: &str = "Email exists. Please log in or use different email";
pub const MSG_EMAIL_TAKEN: &str = "Email exists. Please use a different email.";
pub const MSG_WEAK_PASSWORD: &str = "Password does not meet requirements.";
pub const MSG_LOGIN_EMAIL: &str = "Please provide a valid email address.";
pub const MSG_LOGIN_PASSWORD: &str = "Please provide your password.";
pub const MSG_CHANGE_PASSWORD: &str =
    "Password must be at least 8 characters, include uppercase, lowercase, and a number.";
pub const MSG_CLASSIFICATION_REQUIRED: &str = "Classification name is required.";
pub const MSG_CLASSIFICATION_FORMAT: &str =
    "Classification name cannot contain spaces or special characters.";
pub const MSG_CLASSIFICATION_EXISTS: &str = "That classification already exists.";
pub const MSG_CLASSIFICATION_IN_USE: &str =
    "This classification still has vehicles assigned and cannot be deleted.";
pub const MSG_PRICE: &str = "Price must be a number from 0 to 100,000,000.";

/// Highest accepted vehicle price, in dollars
const MAX_PRICE: f64 = 100_000_000.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
impl Validate for RegistrationForm {
    type Valid = Registration;

    async fn validate(&self, store: &Store) -> Result<Result<Registration, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        let email = normalize_email(&self.account_email);

        if !is_present(&self.account_firstname) {
            errors.add("account_firstname", MSG_FIRST_NAME);
        }
        if !is_present(&self.account_lastname) {
            errors.add("account_lastname", MSG_LAST_NAME);
        }
        if !is_email(&email) {
            errors.add("account_email", MSG_EMAIL);
        } else if store.email_owner(&email).await?.is_some() {
            errors.add("account_email", MSG_EMAIL_REGISTERED);
        }
        if !REGISTRATION_POLICY.accepts(&self.account_password) {
            errors.add("account_password", MSG_WEAK_PASSWORD);
        }

        Ok(errors.finish(Registration {
            first_name: self.account_firstname.trim().to_string(),
            last_name: self.account_lastname.trim().to_string(),
            email,
            password: self.account_password.clone(),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub account_email: String,
    pub account_password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[async_trait]
impl Validate for LoginForm {
    type Valid = Credentials;

    async fn validate(&self, _store: &Store) -> Result<Result<Credentials, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        let email = normalize_email(&self.account_email);

        if !is_email(&email) {
            errors.add("account_email", MSG_LOGIN_EMAIL);
        }
        if self.account_password.is_empty() {
            errors.add("account_password", MSG_LOGIN_PASSWORD);
        }

        Ok(errors.finish(Credentials {
            email,
            password: self.account_password.clone(),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAccountForm {
    pub account_id: i64,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[async_trait]
impl Validate for UpdateAccountForm {
    type Valid = ProfileUpdate;

    async fn validate(&self, store: &Store) -> Result<Result<ProfileUpdate, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        let email = normalize_email(&self.account_email);

        if !is_present(&self.account_firstname) {
            errors.add("account_firstname", MSG_FIRST_NAME);
        }
        if !is_present(&self.account_lastname) {
            errors.add("account_lastname", MSG_LAST_NAME);
        }
        if !is_email(&email) {
            errors.add("account_email", MSG_EMAIL);
        } else if let Some(owner) = store.email_owner(&email).await? {
            // Keeping one's own address is not a conflict
            if owner != self.account_id {
                errors.add("account_email", MSG_EMAIL_TAKEN);
            }
        }

        Ok(errors.finish(ProfileUpdate {
            account_id: self.account_id,
            first_name: self.account_firstname.trim().to_string(),
            last_name: self.account_lastname.trim().to_string(),
            email,
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordForm {
    pub account_id: i64,
    pub account_password: String,
}

#[async_trait]
impl Validate for PasswordForm {
    type Valid = String;

    async fn validate(&self, _store: &Store) -> Result<Result<String, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        if !CHANGE_POLICY.accepts(&self.account_password) {
            errors.add("account_password", MSG_CHANGE_PASSWORD);
        }
        Ok(errors.finish(self.account_password.clone()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationForm {
    pub classification_name: String,
}

#[async_trait]
impl Validate for ClassificationForm {
    type Valid = String;

    async fn validate(&self, store: &Store) -> Result<Result<String, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        let name = self.classification_name.trim();

        if name.is_empty() {
            errors.add("classification_name", MSG_CLASSIFICATION_REQUIRED);
        } else if !is_classification_name(name) {
            errors.add("classification_name", MSG_CLASSIFICATION_FORMAT);
        } else if store.classification_name_exists(name).await? {
            errors.add("classification_name", MSG_CLASSIFICATION_EXISTS);
        }

        Ok(errors.finish(name.to_string()))
    }
}

/// Add and edit vehicle form. `inv_id` is only sent by the edit view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub inv_id: Option<i64>,
    pub classification_id: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: String,
    pub inv_miles: String,
    pub inv_color: String,
}

impl InventoryForm {
    /// Prefill for the add view
    pub fn blank() -> Self {
        Self {
            inv_image: "/images/vehicles/no-image.png".to_string(),
            inv_thumbnail: "/images/vehicles/no-image-tn.png".to_string(),
            ..Self::default()
        }
    }

    /// Selected classification as a number, for the option `selected` check
    pub fn selected_classification(&self) -> i64 {
        parse_id(&self.classification_id).unwrap_or_default()
    }
}

impl From<&crate::db::InventoryItem> for InventoryForm {
    fn from(item: &crate::db::InventoryItem) -> Self {
        Self {
            inv_id: Some(item.inv_id),
            classification_id: item.classification_id.to_string(),
            inv_make: item.inv_make.clone(),
            inv_model: item.inv_model.clone(),
            inv_year: item.inv_year.to_string(),
            inv_description: item.inv_description.clone(),
            inv_image: item.inv_image.clone(),
            inv_thumbnail: item.inv_thumbnail.clone(),
            inv_price: item.inv_price.to_string(),
            inv_miles: item.inv_miles.to_string(),
            inv_color: item.inv_color.clone(),
        }
    }
}

#[async_trait]
impl Validate for InventoryForm {
    type Valid = VehicleData;

    async fn validate(&self, store: &Store) -> Result<Result<VehicleData, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();

        let classification_id = match parse_id(&self.classification_id) {
            Some(id) => store.find_classification(id).await?.map(|c| c.classification_id),
            None => None,
        };
        if classification_id.is_none() {
            errors.add("classification_id", "Classification is required.");
        }
        if !is_present(&self.inv_make) {
            errors.add("inv_make", "Make is required.");
        }
        if !is_present(&self.inv_model) {
            errors.add("inv_model", "Model is required.");
        }
        let year = parse_integer_at_least(&self.inv_year, 1900);
        if year.is_none() {
            errors.add("inv_year", "Valid year required.");
        }
        if !is_present(&self.inv_description) {
            errors.add("inv_description", "Description is required.");
        }
        if !is_present(&self.inv_image) {
            errors.add("inv_image", "Image path required.");
        }
        if !is_present(&self.inv_thumbnail) {
            errors.add("inv_thumbnail", "Thumbnail path required.");
        }
        let price = parse_number_in_range(&self.inv_price, 0.0, MAX_PRICE);
        if price.is_none() {
            errors.add("inv_price", MSG_PRICE);
        }
        let miles = parse_integer_at_least(&self.inv_miles, 0);
        if miles.is_none() {
            errors.add("inv_miles", "Miles must be a number.");
        }
        if !is_present(&self.inv_color) {
            errors.add("inv_color", "Color is required.");
        }

        match (classification_id, year, price, miles) {
            (Some(classification_id), Some(year), Some(price), Some(miles)) => Ok(errors.finish(VehicleData {
                classification_id,
                make: self.inv_make.trim().to_string(),
                model: self.inv_model.trim().to_string(),
                year,
                description: self.inv_description.trim().to_string(),
                image: self.inv_image.trim().to_string(),
                thumbnail: self.inv_thumbnail.trim().to_string(),
                price,
                miles,
                color: self.inv_color.trim().to_string(),
            })),
            _ => Ok(Err(errors)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteVehicleForm {
    pub inv_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteClassificationForm {
    pub classification_id: i64,
}

#[async_trait]
impl Validate for DeleteClassificationForm {
    type Valid = Classification;

    async fn validate(&self, store: &Store) -> Result<Result<Classification, ValidationErrors>, StoreError> {
        let mut errors = ValidationErrors::new();
        let Some(classification) = store.find_classification(self.classification_id).await? else {
            errors.add("classification_id", "Classification is required.");
            return Ok(Err(errors));
        };
        if store.count_vehicles_in(classification.classification_id).await? > 0 {
            errors.add("classification_id", MSG_CLASSIFICATION_IN_USE);
        }
        Ok(errors.finish(classification))
    }
}
