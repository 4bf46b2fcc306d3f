//! Strategy plugins, configured onto the app in a fixed order.

use std::sync::Arc;

use crate::app::{App, ConfigureError, Plugin};
use crate::auth::bearer::BearerStrategy;
use crate::auth::local::LocalStrategy;
use crate::auth::service::AuthenticationService;
use crate::auth::strategy::Authentication;
use crate::auth::token::TokenIssuer;
use crate::auth::AUTHENTICATION_SERVICE;
use crate::config::AuthConfig;
use crate::services::USERS_SERVICE;

/// Token issuance. Registers the `authentication` service.
pub struct TokenPlugin {
    issuer: Arc<TokenIssuer>,
}

impl TokenPlugin {
    pub fn new(secret: &str, config: &AuthConfig) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(secret, &config.issuer, config.expires_in_secs)),
        }
    }
}

impl Plugin for TokenPlugin {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn configure(self, app: &App) -> Result<(), ConfigureError> {
        app.set(Authentication::with_token(self.issuer.clone()));
        app.use_service(AUTHENTICATION_SERVICE, AuthenticationService::new(self.issuer));
        Ok(())
    }
}

/// Current authentication state and its issuer; fails unless `TokenPlugin` ran.
fn configured_auth(
    app: &App,
    plugin: &'static str,
) -> Result<(Authentication, Arc<TokenIssuer>), ConfigureError> {
    let auth = app.get::<Authentication>().unwrap_or_default();
    let issuer = auth.token().cloned();
    match issuer {
        Some(issuer) => Ok((auth, issuer)),
        None => Err(ConfigureError::MissingDependency {
            plugin,
            requires: "auth",
        }),
    }
}

/// Username/password strategy.
pub struct LocalPlugin {
    username_field: String,
    password_field: String,
}

impl LocalPlugin {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username_field: config.username_field.clone(),
            password_field: config.password_field.clone(),
        }
    }
}

impl Plugin for LocalPlugin {
    fn name(&self) -> &'static str {
        "local"
    }

    fn configure(self, app: &App) -> Result<(), ConfigureError> {
        let (mut auth, _) = configured_auth(app, self.name())?;
        auth.push_strategy(Arc::new(LocalStrategy::new(
            app.clone(),
            USERS_SERVICE,
            self.username_field,
            self.password_field,
        )));
        app.set(auth);
        Ok(())
    }
}

/// Bearer access token strategy.
#[derive(Default)]
pub struct BearerPlugin;

impl BearerPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for BearerPlugin {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn configure(self, app: &App) -> Result<(), ConfigureError> {
        let (mut auth, issuer) = configured_auth(app, self.name())?;
        auth.push_strategy(Arc::new(BearerStrategy::new(app.clone(), issuer, USERS_SERVICE)));
        app.set(auth);
        Ok(())
    }
}
