//! Request middleware that negotiates the locale and translates 422 bodies.
//!
//! Install it with [`setup`]. Every routed request gets a [`RequestLocale`]
//! extension; any response carrying a [`ValidationFailure`] is rebuilt with
//! messages in that locale.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_LENGTH};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::Router;
use tracing::debug;

use crate::config::I18nConfig;
use crate::handler::{i18n_error_response, ValidationFailure};
use crate::i18n::{LocaleSettings, LocaleSources, Translator, TranslatorRegistry};

/// Name of the path and query parameter that selects a locale.
pub const LOCALE_PARAM: &str = "locale";

/// Shared state for the i18n middleware.
#[derive(Debug, Clone)]
pub struct I18nState {
    settings: Arc<LocaleSettings>,
    registry: Arc<TranslatorRegistry>,
}

impl I18nState {
    pub fn new(settings: LocaleSettings, registry: TranslatorRegistry) -> Self {
        Self {
            settings: Arc::new(settings),
            registry: Arc::new(registry),
        }
    }

    /// Build state from configuration.
    ///
    /// With `bind_to_lifespan` every supported locale's message catalog is
    /// loaded now and a broken one is an error.
    pub fn from_config(config: &I18nConfig) -> Result<Self> {
        let settings =
            LocaleSettings::new(config.locales.iter().cloned(), &config.fallback_locale)?;
        let locale_path: PathBuf = config.locale_path.clone();

        let registry = if config.bind_to_lifespan {
            TranslatorRegistry::preloaded(locale_path, settings.supported())?
        } else {
            TranslatorRegistry::new(locale_path)
        };

        Ok(Self::new(settings, registry))
    }

    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<TranslatorRegistry> {
        &self.registry
    }
}

/// The locale negotiated for the current request and its translator.
#[derive(Debug, Clone)]
pub struct RequestLocale {
    locale: String,
    translator: Arc<Translator>,
}

impl RequestLocale {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestLocale>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "i18n middleware is not installed",
        ))
    }
}

/// Negotiate the request locale, run the handler, translate validation failures.
pub async fn i18n_middleware(
    State(state): State<I18nState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let path_locale = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(name, _)| *name == LOCALE_PARAM)
                .map(|(_, value)| value.to_string())
        });
    let query_locale = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(mut params)| params.remove(LOCALE_PARAM));
    let header_locale = parts
        .headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let locale = state.settings.negotiate(LocaleSources {
        accept_language: header_locale,
        path: path_locale.as_deref(),
        query: query_locale.as_deref(),
    });
    debug!(locale = %locale, path = %parts.uri.path(), "Negotiated request locale");

    let translator = state.registry.get(&locale);
    parts.extensions.insert(RequestLocale {
        locale,
        translator: Arc::clone(&translator),
    });

    let response = next.run(Request::from_parts(parts, body)).await;

    let Some(failure) = response.extensions().get::<ValidationFailure>().cloned() else {
        return response;
    };

    // Only the body and its framing headers change; everything else the
    // handler set is kept.
    let (mut parts, _) = response.into_parts();
    let (translated, body) = i18n_error_response(&translator, failure.errors()).into_parts();
    parts.status = translated.status;
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.extend(translated.headers);
    Response::from_parts(parts, body)
}

/// Attach the i18n middleware to every route of `router`.
///
/// Call after the routes are registered; routes added later are not covered.
pub fn setup<S>(router: Router<S>, state: I18nState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(state, i18n_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{rules, Loc};
    use axum::body::{to_bytes, Body};
    use axum::http;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state(dir: &TempDir) -> I18nState {
        I18nState::new(
            LocaleSettings::default(),
            TranslatorRegistry::new(dir.path()),
        )
    }

    async fn echo_locale(locale: RequestLocale) -> String {
        locale.locale().to_string()
    }

    async fn reject() -> ValidationFailure {
        ValidationFailure::from(vec![rules::missing(Loc::body().join("name"))])
    }

    async fn reject_with_headers() -> impl IntoResponse {
        (
            [("x-request-id", "abc")],
            ValidationFailure::from(vec![rules::missing(Loc::body().join("name"))]),
        )
    }

    fn app(dir: &TempDir) -> Router {
        let router = Router::new()
            .route("/", get(echo_locale))
            .route("/:locale/echo", get(echo_locale))
            .route("/reject", get(reject))
            .route("/reject-with-headers", get(reject_with_headers));
        setup(router, state(dir))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    // ==================== Negotiation Tests ====================

    #[tokio::test]
    async fn test_defaults_to_fallback() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/").body(Body::empty()).unwrap();

        assert_eq!(send(app(&dir), request).await.1, "zh-TW");
    }

    #[tokio::test]
    async fn test_header_beats_query() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/?locale=ja-JP")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();

        assert_eq!(send(app(&dir), request).await.1, "en-US");
    }

    #[tokio::test]
    async fn test_query_param() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/?locale=ja-jp").body(Body::empty()).unwrap();

        assert_eq!(send(app(&dir), request).await.1, "ja-JP");
    }

    #[tokio::test]
    async fn test_path_param_beats_query() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/en-US/echo?locale=ja-JP")
            .body(Body::empty())
            .unwrap();

        assert_eq!(send(app(&dir), request).await.1, "en-US");
    }

    #[tokio::test]
    async fn test_unsupported_header_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/?locale=ja-JP")
            .header(ACCEPT_LANGUAGE, "fr-FR")
            .body(Body::empty())
            .unwrap();

        assert_eq!(send(app(&dir), request).await.1, "zh-TW");
    }

    // ==================== Translation Tests ====================

    #[tokio::test]
    async fn test_validation_failure_translated() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/reject")
            .header(ACCEPT_LANGUAGE, "ja-JP")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["errors"][0]["msg"], "必須項目です");
        assert_eq!(body["errors"][0]["loc"], serde_json::json!(["body", "name"]));
    }

    #[tokio::test]
    async fn test_handler_headers_survive_translation() {
        let dir = TempDir::new().unwrap();
        let request = http::Request::get("/reject-with-headers")
            .header(ACCEPT_LANGUAGE, "ja-JP")
            .body(Body::empty())
            .unwrap();

        let response = app(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["x-request-id"], "abc");
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"][0]["msg"], "必須項目です");
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_500() {
        let request = http::Request::get("/").body(Body::empty()).unwrap();
        let app: Router = Router::new().route("/", get(echo_locale));

        let (status, _) = send(app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_config_rejects_unknown_fallback() {
        let config = I18nConfig {
            fallback_locale: "fr-FR".to_string(),
            ..I18nConfig::default()
        };
        assert!(I18nState::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_preloads() {
        let dir = TempDir::new().unwrap();
        let config = I18nConfig {
            locale_path: dir.path().to_path_buf(),
            bind_to_lifespan: true,
            ..I18nConfig::default()
        };

        let state = I18nState::from_config(&config).unwrap();

        assert_eq!(state.registry().locales(), vec!["en-US", "ja-JP", "zh-TW"]);
    }
}
