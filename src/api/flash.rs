//! One-shot notices carried across a redirect.
//!
//! A handler that redirects stores its message in the `notice` cookie. The
//! next request reads it through the `Flash` extractor, and `sweep` expires
//! the cookie once that response is on its way out.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

pub const NOTICE_COOKIE: &str = "notice";

/// Notice carried over from the previous response, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash(Option<String>);

impl Flash {
    pub fn from_jar(jar: &CookieJar) -> Self {
        Flash(
            jar.get(NOTICE_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty()),
        )
    }

    pub fn notice(self) -> Option<String> {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flash::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

fn notice_cookie(value: String) -> Cookie<'static> {
    Cookie::build((NOTICE_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Redirect (303) to `to`, leaving `notice` for the next page.
pub fn redirect(jar: CookieJar, to: &str, notice: impl Into<String>) -> Response {
    (jar.add(notice_cookie(notice.into())), Redirect::to(to)).into_response()
}

fn sets_notice(response: &Response) -> bool {
    let prefix = format!("{}=", NOTICE_COOKIE);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().map(|s| s.starts_with(&prefix)).unwrap_or(false))
}

/// Middleware: expire a notice the request carried, unless the response
/// leaves a fresh one.
pub async fn sweep(request: Request, next: Next) -> Response {
    let carried = CookieJar::from_headers(request.headers())
        .get(NOTICE_COOKIE)
        .is_some();

    let mut response = next.run(request).await;

    if carried && !sets_notice(&response) {
        let mut removal = Cookie::build((NOTICE_COOKIE, "")).path("/").build();
        removal.make_removal();
        if let Ok(value) = HeaderValue::from_str(&removal.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
