use std::path::PathBuf;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert extraction algorithm. \
Extract relevant information from the document. \
If uncertain, return null for that field.";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,

    // Staging
    pub staging_dir: Option<PathBuf>,

    // LLM
    pub openai_url: String,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub temperature: f32,
    pub request_timeout_secs: u64,

    // Prompt
    pub system_prompt: String,
}

impl Config {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("docxtract"))
    }

    /// The provider credential, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 25 * 1024 * 1024,
            staging_dir: None,
            openai_url: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_api_key: None,
            temperature: 0.0,
            request_timeout_secs: 120,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Layers, lowest precedence first: built-in defaults, an optional `config`
/// file in the working directory, `DOCXTRACT_*` variables, then
/// `OPENAI_API_KEY` for the credential.
pub fn read_config() -> anyhow::Result<Config> {
    read_config_from("config")
}

pub fn read_config_from(file: &str) -> anyhow::Result<Config> {
    let defaults = Config::default();
    Ok(config::Config::builder()
        .set_default("host", defaults.host)?
        .set_default("port", defaults.port as i64)?
        .set_default("max_upload_bytes", defaults.max_upload_bytes as i64)?
        .set_default("openai_url", defaults.openai_url)?
        .set_default("openai_model", defaults.openai_model)?
        .set_default("temperature", defaults.temperature as f64)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
        .set_default("system_prompt", defaults.system_prompt)?
        .add_source(config::File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix("DOCXTRACT").try_parsing(true))
        .set_override_option("openai_api_key", std::env::var("OPENAI_API_KEY").ok())?
        .build()?
        .try_deserialize::<Config>()?)
}
