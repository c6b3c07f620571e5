use std::collections::BTreeMap;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;
use validation_i18n::config::Config;
use validation_i18n::i18n::MetricsReport;
use validation_i18n::validation::{rules, Loc};
use validation_i18n::{
    setup, I18nState, RequestLocale, Validate, ValidatedJson, ValidationErrorItem,
};

// ==================== Demo Payload ====================

#[derive(Debug, Serialize, Deserialize)]
struct Cat {
    pet_type: Option<String>,
    color: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DeepBody {
    deep_body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InnerNestedExample {
    inner_body: Option<Vec<DeepBody>>,
    cat: Option<Cat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NestedExample {
    body: Option<String>,
    inner: Option<InnerNestedExample>,
    custom_input: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Example {
    string: Option<String>,
    #[serde(default = "default_integer")]
    integer: i64,
    nested: Option<NestedExample>,
    ipt_enum: Option<String>,
}

fn default_integer() -> i64 {
    1
}

/// Push `missing` for an absent field, otherwise run `check` on it.
fn required<T>(
    errors: &mut Vec<ValidationErrorItem>,
    value: &Option<T>,
    loc: Loc,
    check: impl FnOnce(&T, Loc) -> Vec<ValidationErrorItem>,
) {
    match value {
        Some(value) => errors.extend(check(value, loc)),
        None => errors.push(rules::missing(loc)),
    }
}

fn max_chars(value: &str, loc: Loc, max: usize) -> Vec<ValidationErrorItem> {
    if value.chars().count() > max {
        vec![rules::string_too_long(loc, value, max)]
    } else {
        Vec::new()
    }
}

fn one_of(value: &str, loc: Loc, allowed: &[&str]) -> Vec<ValidationErrorItem> {
    if allowed.contains(&value) {
        Vec::new()
    } else {
        vec![rules::literal_error(loc, value, allowed)]
    }
}

impl Validate for Cat {
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem> {
        let mut errors = Vec::new();
        required(&mut errors, &self.pet_type, loc.join("pet_type"), |v, l| {
            one_of(v, l, &["cat"])
        });
        required(&mut errors, &self.color, loc.join("color"), |v, l| {
            one_of(v, l, &["black", "white"])
        });
        required(&mut errors, &self.name, loc.join("name"), |_, _| Vec::new());
        errors
    }
}

impl Validate for DeepBody {
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem> {
        let mut errors = Vec::new();
        required(&mut errors, &self.deep_body, loc.join("deep_body"), |v, l| {
            if v.chars().count() < 20 {
                vec![rules::string_too_short(l, v, 20)]
            } else {
                Vec::new()
            }
        });
        errors
    }
}

impl Validate for InnerNestedExample {
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem> {
        let mut errors = Vec::new();
        required(&mut errors, &self.inner_body, loc.join("inner_body"), |items, l| {
            let mut found = Vec::new();
            if items.len() > 2 {
                let input = serde_json::to_value(items).unwrap_or(Value::Null);
                found.push(rules::too_long(l.clone(), input, "List", 2, items.len()));
            }
            for (i, item) in items.iter().enumerate() {
                found.extend(item.validate(&l.join(i)));
            }
            found
        });
        required(&mut errors, &self.cat, loc.join("cat"), |cat, l| cat.validate(&l));
        errors
    }
}

impl Validate for NestedExample {
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem> {
        let mut errors = Vec::new();
        required(&mut errors, &self.body, loc.join("body"), |v, l| max_chars(v, l, 2));
        required(&mut errors, &self.inner, loc.join("inner"), |inner, l| inner.validate(&l));
        required(&mut errors, &self.custom_input, loc.join("custom_input"), |v, l| match v {
            Value::String(s) if s.chars().count() < 2 => vec![rules::string_too_short(l, s, 2)],
            Value::String(s) => max_chars(s, l, 5),
            Value::Number(_) => Vec::new(),
            other => vec![rules::string_type(l, other.clone())],
        });
        errors
    }
}

impl Validate for Example {
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem> {
        let mut errors = Vec::new();
        required(&mut errors, &self.string, loc.join("string"), |v, l| max_chars(v, l, 10));
        required(&mut errors, &self.nested, loc.join("nested"), |nested, l| nested.validate(&l));
        required(&mut errors, &self.ipt_enum, loc.join("ipt_enum"), |v, l| {
            one_of(v, l, &["option", "choice"])
        });
        errors
    }
}

// ==================== Routes ====================

async fn root(
    State(state): State<I18nState>,
    locale: RequestLocale,
) -> Result<Json<Value>, (StatusCode, String)> {
    let internal = |err: validation_i18n::TranslateError| {
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    };
    let message = state
        .registry()
        .get("ja-JP")
        .t("message.field required")
        .map_err(internal)?;
    let request_locale_message = locale
        .translator()
        .t("message.field required")
        .map_err(internal)?;

    Ok(Json(json!({
        "message": message,
        "request_locale_message": request_locale_message,
    })))
}

async fn post_root(ValidatedJson(payload): ValidatedJson<Example>) -> Json<Example> {
    Json(payload)
}

async fn metrics(State(state): State<I18nState>) -> Json<BTreeMap<String, MetricsReport>> {
    Json(state.registry().metrics())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("validation_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        locale_path = %config.i18n.locale_path.display(),
        locales = ?config.i18n.locales,
        fallback = %config.i18n.fallback_locale,
        "Starting validation i18n demo server"
    );

    let state = I18nState::from_config(&config.i18n).context("Failed to set up translators")?;

    let routes = Router::new()
        .route("/", get(root).post(post_root))
        .route("/:locale/", get(root).post(post_root))
        .route("/i18n/metrics", get(metrics));
    let app = setup(routes, state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!(port = config.port, "Listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
