use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "RadPilot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default OpenAI-compatible endpoint for report drafting.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default drafting model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Low temperature keeps phrasing close to the structured input.
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.2;

/// Default gateway request timeout (seconds).
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "RADPILOT_LLM_BASE_URL";
const ENV_MODEL: &str = "RADPILOT_LLM_MODEL";
const ENV_TEMPERATURE: &str = "RADPILOT_LLM_TEMPERATURE";
const ENV_TIMEOUT_SECS: &str = "RADPILOT_LLM_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "radpilot=debug,radpilot_lib=debug,reqwest=info"
    } else {
        "radpilot=info,radpilot_lib=info,reqwest=warn"
    }
}

/// Settings for the generative-model gateway.
///
/// `api_key` may be absent: a missing key is reported by the gateway
/// as a configuration failure at call time, not at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: DEFAULT_LLM_TEMPERATURE,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Build the gateway settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the gateway settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_blank(ENV_API_KEY).map(|v| v.trim().to_string()),
            base_url: non_blank(ENV_BASE_URL)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: non_blank(ENV_MODEL)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.model),
            temperature: parse_or_default(
                ENV_TEMPERATURE,
                non_blank(ENV_TEMPERATURE),
                defaults.temperature,
            ),
            timeout_secs: parse_or_default(
                ENV_TIMEOUT_SECS,
                non_blank(ENV_TIMEOUT_SECS),
                defaults.timeout_secs,
            ),
        }
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(variable = name, "Unparseable gateway setting, using default");
                default
            }
        },
    }
}
