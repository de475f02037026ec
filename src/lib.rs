pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod ui;

pub use db::{DbPool, Store};

use auth::token::{TokenError, TokenService};
use config::Config;

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub tokens: TokenService,
}

impl AppState {
    /// Fails when no signing secret is configured.
    pub fn new(config: Config, store: Store) -> Result<Self, TokenError> {
        let tokens = TokenService::from_secret(config.auth.token_secret.as_deref())?;
        Ok(Self {
            config,
            store,
            tokens,
        })
    }
}
