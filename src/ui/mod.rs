// Server-rendered views
// Askama templates under templates/, one struct per view in templates.rs

mod templates;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::{gate::Identity, token::Claims};
use crate::db::{Classification, Store, StoreError};

pub use templates::*;

/// Render a view with the given status
pub fn render<T: Template>(status: StatusCode, template: T) -> Result<Response, askama::Error> {
    let html = template.render()?;
    Ok((status, Html(html)).into_response())
}

/// Context shared by every view through the layout: title, navigation,
/// the notice to display and who is logged in.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    pub nav: Vec<Classification>,
    pub notice: Option<String>,
    pub account: Option<Claims>,
}

impl Page {
    pub async fn build(
        store: &Store,
        identity: &Identity,
        title: impl Into<String>,
        notice: Option<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            title: title.into(),
            nav: store.list_classifications().await?,
            notice,
            account: identity.claims().cloned(),
        })
    }

    /// Page without navigation, for error views that must not touch the store
    pub fn bare(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn logged_in(&self) -> bool {
        self.account.is_some()
    }

    pub fn first_name(&self) -> &str {
        self.account.as_ref().map(|c| c.first_name.as_str()).unwrap_or_default()
    }

    pub fn account_id(&self) -> i64 {
        self.account.as_ref().map(|c| c.id).unwrap_or_default()
    }

    pub fn is_staff(&self) -> bool {
        self.account.as_ref().map(|c| c.role.is_staff()).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.account
            .as_ref()
            .map(|c| c.role == crate::db::AccountType::Admin)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::AccountType;

    fn claims(role: AccountType) -> Claims {
        Claims {
            id: 4,
            first_name: "Happy".to_string(),
            last_name: "Employee".to_string(),
            email: "happy@example.com".to_string(),
            role,
            iat: 0,
            exp: 3600,
        }
    }

    #[test]
    fn test_page_roles() {
        let anonymous = Page::bare("Home");
        assert!(!anonymous.logged_in());
        assert_eq!(anonymous.first_name(), "");
        assert!(!anonymous.is_staff());

        let employee = Page {
            account: Some(claims(AccountType::Employee)),
            ..Page::bare("Home")
        };
        assert!(employee.logged_in());
        assert_eq!(employee.first_name(), "Happy");
        assert!(employee.is_staff());
        assert!(!employee.is_admin());

        let admin = Page {
            account: Some(claims(AccountType::Admin)),
            ..Page::bare("Home")
        };
        assert!(admin.is_admin());
    }

    #[test]
    fn test_error_view_renders() {
        let response = render(
            StatusCode::NOT_FOUND,
            ErrorTemplate {
                page: Page::bare("404"),
                status: 404,
                message: "Sorry, we appear to have lost that page.".to_string(),
            },
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
