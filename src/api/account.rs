//! Account registration, login, profile and password handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::AppError;
use super::flash::{self, Flash};
use super::forms::{LoginForm, PasswordForm, RegistrationForm, UpdateAccountForm};
use super::validation::{Validate, ValidationErrors};
use crate::auth::gate::{session_cookie, session_removal, Identity};
use crate::auth::password::{hash_password, verify_password, verify_unknown_account};
use crate::db::{AccountProfile, AccountType, NewAccount, StoreError};
use crate::ui::{
    render, AccountManagementTemplate, ChangePasswordTemplate, LoginTemplate, Page, RegisterTemplate,
    UpdateAccountTemplate,
};
use crate::AppState;

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const MSG_REGISTRATION_FAILED: &str = "Sorry, the registration failed.";
pub const MSG_UNEXPECTED: &str = "Sorry, something went wrong. Please try again.";
pub const MSG_PROFILE_UPDATED: &str = "Congratulations, your information has been updated.";
pub const MSG_UPDATE_FAILED: &str = "Sorry, the update failed.";
pub const MSG_PASSWORD_UPDATED: &str = "Password updated successfully.";
pub const MSG_PASSWORD_FAILED: &str = "Sorry, the password update failed.";
pub const MSG_LOGGED_OUT: &str = "You have been logged out.";

const ACCOUNT_HOME: &str = "/account/";

async fn login_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    account_email: String,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, "Login", notice).await?;
    Ok(render(
        status,
        LoginTemplate {
            page,
            errors,
            account_email,
        },
    )?)
}

/// Login view with an empty form; also what a refused guard shows.
pub async fn render_login(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
) -> Result<Response, AppError> {
    login_view(state, identity, status, notice, ValidationErrors::new(), String::new()).await
}

async fn register_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    form: RegistrationForm,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, "Register", notice).await?;
    Ok(render(status, RegisterTemplate { page, errors, form })?)
}

async fn update_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    form: UpdateAccountForm,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, "Edit Account", notice).await?;
    Ok(render(status, UpdateAccountTemplate { page, errors, form })?)
}

async fn change_password_view(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    notice: Option<String>,
    errors: ValidationErrors,
    account_id: i64,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, identity, "Change Password", notice).await?;
    Ok(render(
        status,
        ChangePasswordTemplate {
            page,
            errors,
            account_id,
        },
    )?)
}

/// GET /account/login
pub async fn build_login(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    render_login(&state, &identity, StatusCode::OK, flash.notice()).await
}

/// POST /account/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let credentials = match form.validate(&state.store).await {
        Ok(Ok(credentials)) => credentials,
        Ok(Err(errors)) => {
            return login_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, form.account_email).await;
        }
        Err(e) => {
            error!(error = %e, "Login validation failed");
            return login_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UNEXPECTED.to_string()),
                ValidationErrors::new(),
                form.account_email,
            )
            .await;
        }
    };

    let account = match state.store.find_account_by_email(&credentials.email).await {
        Ok(account) => account,
        Err(e) => {
            error!(error = %e, "Account lookup failed during login");
            return login_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UNEXPECTED.to_string()),
                ValidationErrors::new(),
                credentials.email,
            )
            .await;
        }
    };

    // Unknown email, missing hash and wrong password look the same
    let verified = match &account {
        Some(a) if a.has_password() => verify_password(&credentials.password, &a.account_password),
        _ => verify_unknown_account(&credentials.password),
    };
    let account = match account.filter(|_| verified) {
        Some(account) => account,
        None => {
            info!(email = %credentials.email, "Login failed");
            return login_view(
                &state,
                &identity,
                StatusCode::BAD_REQUEST,
                Some(MSG_INVALID_CREDENTIALS.to_string()),
                ValidationErrors::new(),
                credentials.email,
            )
            .await;
        }
    };

    let profile = AccountProfile::from(account);
    let token = match state.tokens.issue(&profile) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to issue session token");
            return login_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UNEXPECTED.to_string()),
                ValidationErrors::new(),
                credentials.email,
            )
            .await;
        }
    };

    info!(account_id = profile.account_id, "Login succeeded");
    let secure = state.config.server.environment.is_production();
    Ok((jar.add(session_cookie(token, secure)), Redirect::to(ACCOUNT_HOME)).into_response())
}

/// GET /account/register
pub async fn build_register(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    register_view(
        &state,
        &identity,
        StatusCode::OK,
        flash.notice(),
        ValidationErrors::new(),
        RegistrationForm::default(),
    )
    .await
}

/// POST /account/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let registration = match form.validate(&state.store).await {
        Ok(Ok(registration)) => registration,
        Ok(Err(errors)) => {
            let sticky = RegistrationForm {
                account_password: String::new(),
                ..form
            };
            return register_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, sticky).await;
        }
        Err(e) => {
            error!(error = %e, "Registration validation failed");
            return register_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_REGISTRATION_FAILED.to_string()),
                ValidationErrors::new(),
                RegistrationForm::default(),
            )
            .await;
        }
    };

    let password_hash = match hash_password(&registration.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed during registration");
            return register_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_REGISTRATION_FAILED.to_string()),
                ValidationErrors::new(),
                RegistrationForm::default(),
            )
            .await;
        }
    };

    let account = NewAccount {
        first_name: registration.first_name,
        last_name: registration.last_name,
        email: registration.email,
        password_hash,
        account_type: AccountType::Client,
    };
    match state.store.insert_account(&account).await {
        Ok(account_id) => {
            info!(account_id, "Registered account");
            let notice = format!("Congratulations, you're registered {}. Please log in.", account.first_name);
            render_login(&state, &identity, StatusCode::CREATED, Some(notice)).await
        }
        Err(e) => {
            let status = match e {
                // Lost a race with a concurrent registration of the same email
                StoreError::Conflict => {
                    warn!(email = %account.email, "Registration hit the email uniqueness constraint");
                    StatusCode::CONFLICT
                }
                other => {
                    error!(error = %other, "Failed to insert account");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            register_view(
                &state,
                &identity,
                status,
                Some(MSG_REGISTRATION_FAILED.to_string()),
                ValidationErrors::new(),
                RegistrationForm::default(),
            )
            .await
        }
    }
}

/// GET /account/
pub async fn build_management(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
) -> Result<Response, AppError> {
    let page = Page::build(&state.store, &identity, "Account Management", flash.notice()).await?;
    Ok(render(StatusCode::OK, AccountManagementTemplate { page })?)
}

/// GET /account/update/:account_id
pub async fn build_update(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(account_id): Path<i64>,
) -> Result<Response, AppError> {
    if !identity.owns(account_id) {
        return Err(AppError::forbidden(format!("account {} is not the caller's", account_id)));
    }
    let account = state
        .store
        .find_account_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("account {} not found", account_id)))?;

    let form = UpdateAccountForm {
        account_id,
        account_firstname: account.account_firstname,
        account_lastname: account.account_lastname,
        account_email: account.account_email,
    };
    update_view(&state, &identity, StatusCode::OK, flash.notice(), ValidationErrors::new(), form).await
}

/// POST /account/update
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<UpdateAccountForm>,
) -> Result<Response, AppError> {
    if !identity.owns(form.account_id) {
        return Err(AppError::forbidden(format!("account {} is not the caller's", form.account_id)));
    }

    let update = match form.validate(&state.store).await {
        Ok(Ok(update)) => update,
        Ok(Err(errors)) => {
            return update_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, form).await;
        }
        Err(e) => {
            error!(error = %e, "Profile validation failed");
            return update_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_UPDATE_FAILED.to_string()),
                ValidationErrors::new(),
                form,
            )
            .await;
        }
    };

    let status = match state
        .store
        .update_account(update.account_id, &update.first_name, &update.last_name, &update.email)
        .await
    {
        Ok(true) => None,
        Ok(false) => return Err(AppError::not_found(format!("account {} not found", update.account_id))),
        Err(StoreError::Conflict) => Some(StatusCode::CONFLICT),
        Err(e) => {
            error!(error = %e, "Failed to update account");
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    if let Some(status) = status {
        return update_view(
            &state,
            &identity,
            status,
            Some(MSG_UPDATE_FAILED.to_string()),
            ValidationErrors::new(),
            form,
        )
        .await;
    }

    info!(account_id = update.account_id, "Updated account profile");

    // Reissue so the cookie reflects the new names and email
    let account = state
        .store
        .find_account_by_id(update.account_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("account {} not found", update.account_id)))?;
    let token = state.tokens.issue(&AccountProfile::from(account))?;
    let secure = state.config.server.environment.is_production();
    Ok(flash::redirect(jar.add(session_cookie(token, secure)), ACCOUNT_HOME, MSG_PROFILE_UPDATED))
}

/// GET /account/change-password/:account_id
pub async fn build_change_password(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    flash: Flash,
    Path(account_id): Path<i64>,
) -> Result<Response, AppError> {
    if !identity.owns(account_id) {
        return Err(AppError::forbidden(format!("account {} is not the caller's", account_id)));
    }
    change_password_view(&state, &identity, StatusCode::OK, flash.notice(), ValidationErrors::new(), account_id).await
}

/// POST /account/update-password
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    let account_id = form.account_id;
    if !identity.owns(account_id) {
        return Err(AppError::forbidden(format!("account {} is not the caller's", account_id)));
    }

    let password = match form.validate(&state.store).await {
        Ok(Ok(password)) => password,
        Ok(Err(errors)) => {
            return change_password_view(&state, &identity, StatusCode::BAD_REQUEST, None, errors, account_id).await;
        }
        Err(e) => {
            error!(error = %e, "Password validation failed");
            return change_password_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_PASSWORD_FAILED.to_string()),
                ValidationErrors::new(),
                account_id,
            )
            .await;
        }
    };

    let outcome = match hash_password(&password) {
        Ok(hash) => state.store.update_password(account_id, &hash).await,
        Err(e) => {
            error!(error = %e, "Password hashing failed during update");
            return change_password_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_PASSWORD_FAILED.to_string()),
                ValidationErrors::new(),
                account_id,
            )
            .await;
        }
    };

    match outcome {
        Ok(true) => {
            info!(account_id, "Updated account password");
            Ok(flash::redirect(jar, ACCOUNT_HOME, MSG_PASSWORD_UPDATED))
        }
        Ok(false) => Err(AppError::not_found(format!("account {} not found", account_id))),
        Err(e) => {
            error!(error = %e, "Failed to store new password");
            change_password_view(
                &state,
                &identity,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(MSG_PASSWORD_FAILED.to_string()),
                ValidationErrors::new(),
                account_id,
            )
            .await
        }
    }
}

/// GET /account/logout
///
/// Only the cookie is cleared: the token itself stays valid until it expires.
pub async fn logout(identity: Identity, jar: CookieJar) -> Response {
    if let Some(account_id) = identity.account_id() {
        info!(account_id, "Logged out");
    }
    flash::redirect(jar.remove(session_removal()), "/", MSG_LOGGED_OUT)
}
