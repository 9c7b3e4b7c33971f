use serde::Deserialize;
use std::{collections::HashMap, env};

/// Model used when nothing else is configured; always appended to fallback lists
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 60;
pub const DEFAULT_ROTATION_WINDOW_SECONDS: u64 = 30;

/// Highest numbered `COMPLETION_API_KEY_<n>` variable that is probed
const MAX_NUMBERED_API_KEYS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            completion: CompletionConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "SERVER_PORT must be a valid port number")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// How the starting credential of each logical request is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Process-wide counter, advanced once per request
    #[default]
    Counter,
    /// Wall-clock buckets of `rotation_window_seconds`
    TimeBucket,
}

impl std::str::FromStr for RotationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(Self::Counter),
            "time_bucket" | "time-bucket" | "time" => Ok(Self::TimeBucket),
            other => Err(format!(
                "COMPLETION_ROTATION must be 'counter' or 'time_bucket', got '{other}'"
            )),
        }
    }
}

/// Which failures are retried with another credential on the same model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicyMode {
    /// Retry every failure with the next credential before moving on
    #[default]
    Blanket,
    /// Skip straight to the next model on model-level rejections
    Classified,
}

impl std::str::FromStr for RetryPolicyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blanket" => Ok(Self::Blanket),
            "classified" => Ok(Self::Classified),
            other => Err(format!(
                "COMPLETION_RETRY_POLICY must be 'blanket' or 'classified', got '{other}'"
            )),
        }
    }
}

/// Primary model plus comma-separated fallbacks for one task tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskModelsConfig {
    pub primary: String,
    pub fallbacks: String,
}

/// Outbound completion provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API (e.g., "https://api.together.xyz/v1")
    pub base_url: String,
    /// Optional `OpenAI-Organization` header value
    pub organization_id: Option<String>,
    /// Raw credential entries; unset or empty entries are dropped by the pool
    pub api_keys: Vec<Option<String>>,
    pub primary_model: String,
    /// Comma-separated fallback model ids
    pub fallback_models: String,
    /// Known-good model appended to every fallback list
    pub default_model: String,
    /// Extra `misconfigured id -> correct id` corrections
    pub model_aliases: HashMap<String, String>,
    /// Model lists selected by task tag (e.g., "quiz", "grading")
    pub task_models: HashMap<String, TaskModelsConfig>,
    /// Per-attempt timeout in seconds
    pub timeout_seconds: i64,
    pub rotation: RotationMode,
    pub rotation_window_seconds: u64,
    pub retry_policy: RetryPolicyMode,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            organization_id: None,
            api_keys: Vec::new(),
            primary_model: DEFAULT_MODEL.to_string(),
            fallback_models: String::new(),
            default_model: DEFAULT_MODEL.to_string(),
            model_aliases: HashMap::new(),
            task_models: HashMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            rotation: RotationMode::default(),
            rotation_window_seconds: DEFAULT_ROTATION_WINDOW_SECONDS,
            retry_policy: RetryPolicyMode::default(),
        }
    }
}

impl CompletionConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    ///
    /// Missing credentials are not an error: the router degrades to a
    /// "no credentials configured" response at call time instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut api_keys = vec![lookup("COMPLETION_API_KEY")];
        for i in 2..=MAX_NUMBERED_API_KEYS {
            api_keys.push(lookup(&format!("COMPLETION_API_KEY_{i}")));
        }
        if let Some(csv) = lookup("COMPLETION_API_KEYS") {
            api_keys.extend(csv.split(',').map(|key| Some(key.to_string())));
        }

        Ok(Self {
            base_url: lookup("COMPLETION_BASE_URL").unwrap_or(defaults.base_url),
            organization_id: lookup("COMPLETION_ORGANIZATION_ID").filter(|s| !s.is_empty()),
            api_keys,
            primary_model: lookup("COMPLETION_MODEL").unwrap_or(defaults.primary_model),
            fallback_models: lookup("COMPLETION_FALLBACK_MODELS").unwrap_or_default(),
            default_model: lookup("COMPLETION_DEFAULT_MODEL").unwrap_or(defaults.default_model),
            model_aliases: lookup("COMPLETION_MODEL_ALIASES")
                .map(|s| parse_model_aliases(&s))
                .unwrap_or_default(),
            task_models: lookup("COMPLETION_TASK_MODELS")
                .map(|s| parse_task_models(&s))
                .unwrap_or_default(),
            timeout_seconds: match lookup("COMPLETION_TIMEOUT") {
                Some(s) => s
                    .parse()
                    .ok()
                    .filter(|secs: &i64| *secs > 0)
                    .ok_or("COMPLETION_TIMEOUT must be a positive number of seconds")?,
                None => defaults.timeout_seconds,
            },
            rotation: match lookup("COMPLETION_ROTATION") {
                Some(s) => s.parse()?,
                None => defaults.rotation,
            },
            rotation_window_seconds: match lookup("COMPLETION_ROTATION_WINDOW") {
                Some(s) => s
                    .parse()
                    .map_err(|_| "COMPLETION_ROTATION_WINDOW must be a valid number")?,
                None => defaults.rotation_window_seconds,
            },
            retry_policy: match lookup("COMPLETION_RETRY_POLICY") {
                Some(s) => s.parse()?,
                None => defaults.retry_policy,
            },
        })
    }
}

/// Parse `bad=good,bad2=good2` into an alias map; malformed pairs are skipped
pub fn parse_model_aliases(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(from, to)| (from.trim().to_string(), to.trim().to_string()))
        .filter(|(from, to)| !from.is_empty() && !to.is_empty())
        .collect()
}

/// Parse `quiz=m1,m2;grading=m3` into per-task model lists
///
/// The first model of each entry is the primary, the rest become its fallbacks.
pub fn parse_task_models(raw: &str) -> HashMap<String, TaskModelsConfig> {
    let mut tasks = HashMap::new();
    for entry in raw.split(';') {
        let Some((task, models)) = entry.split_once('=') else {
            continue;
        };
        let task = task.trim().to_ascii_lowercase();
        let mut models = models.split(',').map(str::trim).filter(|m| !m.is_empty());
        let Some(primary) = models.next() else {
            continue;
        };
        if task.is_empty() {
            continue;
        }
        tasks.insert(
            task,
            TaskModelsConfig {
                primary: primary.to_string(),
                fallbacks: models.collect::<Vec<_>>().join(","),
            },
        );
    }
    tasks
}

/// Logging Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub modules: HashMap<String, String>,
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut modules = HashMap::new();

        // Load module-specific log levels
        if let Ok(level) = env::var("LOG_MODULE_API") {
            modules.insert("api".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_SERVICES") {
            modules.insert("services".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_INFERENCE_PROVIDERS") {
            modules.insert("inference_providers".to_string(), level);
        }

        Ok(Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            modules,
        })
    }

    /// Build an `EnvFilter` directive string, e.g. `info,services=debug`
    pub fn filter_directive(&self) -> String {
        let mut filter = self.level.clone();
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut modules = HashMap::new();
        modules.insert("services".to_string(), "debug".to_string());

        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            modules,
        }
    }
}
