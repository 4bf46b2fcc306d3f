//! Authentication wiring (boot step).
//!
//! # Responsibilities
//! - Configure token, local and bearer strategies, in that order
//! - Authenticate `authentication` create (jwt or local) and remove (jwt)
//! - Attach the user to a successful login, minus its password
//! - Hash `users` passwords on create and strip them from every response

use crate::app::{App, ConfigureError};
use crate::auth::hooks::{AttachUser, Authenticate, HashPassword, Protect};
use crate::auth::plugins::{BearerPlugin, LocalPlugin, TokenPlugin};
use crate::auth::strategy::{LOCAL_STRATEGY, TOKEN_STRATEGY};
use crate::auth::AUTHENTICATION_SERVICE;
use crate::config::ActerConfig;
use crate::hooks::{HookPipeline, HookStage};
use crate::services::{Method, USERS_SERVICE};

pub fn wire_authentication(app: &App, config: &ActerConfig) -> Result<(), ConfigureError> {
    app.configure(TokenPlugin::new(&config.secrets.auth, &config.auth))?
        .configure(LocalPlugin::new(&config.auth))?
        .configure(BearerPlugin::new())?;

    let password = config.auth.password_field.as_str();

    let authentication = app
        .service(AUTHENTICATION_SERVICE)
        .ok_or_else(|| ConfigureError::MissingService(AUTHENTICATION_SERVICE.to_string()))?;
    authentication.hooks(
        HookPipeline::new()
            .with(
                HookStage::Before(Method::Create),
                Authenticate::new(app, &[TOKEN_STRATEGY, LOCAL_STRATEGY])?,
            )
            .with(
                HookStage::Before(Method::Remove),
                Authenticate::new(app, &[TOKEN_STRATEGY])?,
            )
            .with(HookStage::After(Method::Create), AttachUser::new(password)),
    );

    let users = app
        .service(USERS_SERVICE)
        .ok_or_else(|| ConfigureError::MissingService(USERS_SERVICE.to_string()))?;
    users.hooks(
        HookPipeline::new()
            .with(HookStage::Before(Method::Create), HashPassword::new(password))
            .with(HookStage::AfterAll, Protect::new([password])),
    );

    tracing::debug!("Authentication configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::services::{CollectionService, Params, ServiceError};
    use serde_json::json;
    use std::sync::Arc;

    fn wired() -> App {
        let app = App::new();
        let store = Arc::new(MemoryStore::new());
        app.use_service(USERS_SERVICE, CollectionService::new("users", store));

        let mut config = ActerConfig::default();
        config.secrets.auth = "secret".into();
        wire_authentication(&app, &config).unwrap();
        app
    }

    fn rest() -> Params {
        Params::external("rest")
    }

    #[test]
    fn test_requires_users_service() {
        let mut config = ActerConfig::default();
        config.secrets.auth = "secret".into();
        assert_eq!(
            wire_authentication(&App::new(), &config).unwrap_err(),
            ConfigureError::MissingService("users".into())
        );
    }

    #[tokio::test]
    async fn test_users_never_expose_password() {
        let app = wired();
        let users = app.service(USERS_SERVICE).unwrap();

        let created = users
            .create(json!({ "email": "a@b.c", "password": "pw" }), rest())
            .await
            .unwrap();
        assert!(created.get("password").is_none());
        let id = created["id"].as_str().unwrap();

        let fetched = users.get(id, rest()).await.unwrap();
        assert!(fetched.get("password").is_none());

        let listed = users.find(rest()).await.unwrap();
        assert!(listed[0].get("password").is_none());

        let stored = users.raw().get(id, &Params::default()).await.unwrap();
        assert!(stored["password"].as_str().unwrap().starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_local_login_then_bearer() {
        let app = wired();
        let users = app.service(USERS_SERVICE).unwrap();
        users
            .create(json!({ "email": "a@b.c", "password": "pw" }), rest())
            .await
            .unwrap();

        let authentication = app.service(AUTHENTICATION_SERVICE).unwrap();
        let login = authentication
            .create(json!({ "strategy": "local", "email": "a@b.c", "password": "pw" }), rest())
            .await
            .unwrap();
        assert_eq!(login["user"]["email"], json!("a@b.c"));
        assert!(login["user"].get("password").is_none());

        let token = login["accessToken"].as_str().unwrap().to_string();
        let refreshed = authentication
            .create(json!({}), rest().with_authorization(format!("Bearer {token}")))
            .await
            .unwrap();
        assert!(refreshed["accessToken"].is_string());

        let logout = authentication
            .remove(Some(token.as_str()), rest().with_authorization(format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(logout["accessToken"], json!(token));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let app = wired();
        app.service(USERS_SERVICE)
            .unwrap()
            .create(json!({ "email": "a@b.c", "password": "pw" }), rest())
            .await
            .unwrap();
        let authentication = app.service(AUTHENTICATION_SERVICE).unwrap();

        let wrong = authentication
            .create(json!({ "email": "a@b.c", "password": "nope" }), rest())
            .await;
        assert!(matches!(wrong, Err(ServiceError::NotAuthenticated(_))));

        let unknown = authentication
            .create(json!({ "email": "x@y.z", "password": "pw" }), rest())
            .await;
        assert!(matches!(unknown, Err(ServiceError::NotAuthenticated(_))));

        let anonymous_logout = authentication.remove(None, rest()).await;
        assert!(matches!(anonymous_logout, Err(ServiceError::NotAuthenticated(_))));
    }
}
