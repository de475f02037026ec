//! Request identity and route guards.
//!
//! `identify` runs on every request: it turns the `jwt` cookie into an
//! `Identity` stored in the request extensions. Routes that need more than
//! anonymous access carry a `GuardChain`, an ordered list of `Guard`s
//! evaluated by `enforce`. The first guard that fails decides the response.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

use super::token::{Claims, TokenError, TOKEN_TTL_SECS};
use crate::api::{account::render_login, flash};
use crate::db::AccountType;
use crate::AppState;

/// Cookie holding the session token
pub const TOKEN_COOKIE: &str = "jwt";

pub const LOGIN_PATH: &str = "/account/login";

pub const MSG_SESSION_INVALID: &str = "Please log in";
pub const MSG_LOGIN_REQUIRED: &str = "Please log in.";
pub const MSG_STAFF_REQUIRED: &str = "Please log in with proper permissions.";
pub const MSG_ADMIN_REQUIRED: &str = "Admin access required.";

/// Who is making the request. Resolved once per request by `identify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(Claims),
}

impl Identity {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(claims) => Some(claims),
        }
    }

    pub fn role(&self) -> Option<AccountType> {
        self.claims().map(|c| c.role)
    }

    pub fn account_id(&self) -> Option<i64> {
        self.claims().map(|c| c.id)
    }

    /// Whether this identity may act on the account `account_id`
    pub fn owns(&self, account_id: i64) -> bool {
        self.account_id() == Some(account_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().unwrap_or_default())
    }
}

/// Session cookie carrying a freshly issued token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS))
        .build()
}

/// Cookie matching the session cookie, for removal from a jar
pub fn session_removal() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, "")).path("/").build()
}

/// Middleware: resolve the request's identity from the session cookie.
///
/// No cookie means anonymous. A cookie that fails verification is cleared
/// and the visitor is sent to log in again.
pub async fn identify(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()) {
        None => Identity::Anonymous,
        Some(token) => match state.tokens.verify(&token) {
            Ok(claims) => Identity::Authenticated(claims),
            Err(TokenError::Invalid { reason }) => {
                debug!(%reason, path = %request.uri().path(), "Rejected session token");
                return flash::redirect(jar.remove(session_removal()), LOGIN_PATH, MSG_SESSION_INVALID);
            }
            Err(e) => {
                warn!(error = %e, "Session token verification failed");
                return flash::redirect(jar.remove(session_removal()), LOGIN_PATH, MSG_SESSION_INVALID);
            }
        },
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// A single access requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any authenticated account
    Login,
    /// Employee or Admin
    Staff,
    /// Admin only
    Admin,
}

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// Redirect to the login view with a notice
    Redirect(&'static str),
    /// 403 rendering the login view with a notice
    Forbidden(&'static str),
}

impl Guard {
    pub fn check(self, identity: &Identity) -> Verdict {
        match self {
            Guard::Login => match identity {
                Identity::Anonymous => Verdict::Redirect(MSG_LOGIN_REQUIRED),
                Identity::Authenticated(_) => Verdict::Continue,
            },
            Guard::Staff => match identity.role() {
                Some(role) if role.is_staff() => Verdict::Continue,
                _ => Verdict::Forbidden(MSG_STAFF_REQUIRED),
            },
            Guard::Admin => match identity.role() {
                Some(AccountType::Admin) => Verdict::Continue,
                _ => Verdict::Redirect(MSG_ADMIN_REQUIRED),
            },
        }
    }
}

/// Pages for any logged-in account
pub const MEMBER: &[Guard] = &[Guard::Login];
/// Staff pages: anonymous visitors are sent to log in first
pub const STAFF_VIEW: &[Guard] = &[Guard::Login, Guard::Staff];
/// Staff form submissions: refused outright without the role
pub const STAFF_ACTION: &[Guard] = &[Guard::Staff];
pub const ADMIN: &[Guard] = &[Guard::Login, Guard::Admin];

/// Evaluate guards in order; the first non-`Continue` verdict wins.
pub fn evaluate(guards: &[Guard], identity: &Identity) -> Verdict {
    guards
        .iter()
        .map(|guard| guard.check(identity))
        .find(|verdict| *verdict != Verdict::Continue)
        .unwrap_or(Verdict::Continue)
}

/// State for `enforce`: the guards attached to a group of routes.
#[derive(Clone)]
pub struct GuardChain {
    state: Arc<AppState>,
    guards: &'static [Guard],
}

impl GuardChain {
    pub fn new(state: Arc<AppState>, guards: &'static [Guard]) -> Self {
        Self { state, guards }
    }
}

/// Middleware: run the route's guard chain before its handler.
pub async fn enforce(
    State(chain): State<GuardChain>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or_default();

    match evaluate(chain.guards, &identity) {
        Verdict::Continue => next.run(request).await,
        Verdict::Redirect(notice) => {
            debug!(path = %request.uri().path(), notice, "Guard redirected to login");
            flash::redirect(jar, LOGIN_PATH, notice)
        }
        Verdict::Forbidden(notice) => {
            warn!(path = %request.uri().path(), account_id = ?identity.account_id(), "Guard refused request");
            match render_login(&chain.state, &identity, StatusCode::FORBIDDEN, Some(notice.to_string())).await {
                Ok(response) => response,
                Err(e) => e.into_response(),
            }
        }
    }
}
