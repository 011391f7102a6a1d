use crate::orchestrator::DishNameStrategy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_CLASSIFIER_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_FOOD_MODEL: &str = "Kaludi/Food-Classification";
const DEFAULT_INGREDIENT_MODEL: &str = "Kaludi/food-category-classification-v2.0";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    discord: DiscordSection,
    llm: LlmSection,
    classifier: ClassifierSection,
    storage: StorageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DiscordSection {
    token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LlmSection {
    provider: Provider,
    key: Option<String>,
    url: Option<String>,
    model: Option<String>,
    dish_name: DishNameStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ClassifierSection {
    key: Option<String>,
    url: Option<String>,
    food_model: Option<String>,
    /// An empty string turns the second model off.
    ingredient_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StorageSection {
    data_dir: Option<String>,
    recipes: RecipeBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    #[default]
    Cohere,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Cohere => "COHERE_API_KEY",
        }
    }

    fn default_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::Cohere => "https://api.cohere.ai",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::Gemini => "gemini-2.0-flash",
            Self::Cohere => "command-r",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub key: Option<String>,
    pub url: String,
    pub model: String,
    pub dish_name: DishNameStrategy,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub key: Option<String>,
    pub url: String,
    pub food_model: String,
    pub ingredient_model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: Option<String>,
    pub llm: LlmConfig,
    pub classifier: ClassifierConfig,
    pub data_dir: PathBuf,
    pub recipe_backend: RecipeBackend,
}

impl Config {
    /// Parses `content`; secrets found through `env` take precedence over the file.
    pub fn parse(content: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse config file")?;
        let provider = file.llm.provider;

        Ok(Self {
            discord_token: secret(&env, "DISCORD_TOKEN", file.discord.token),
            llm: LlmConfig {
                provider,
                key: secret(&env, provider.key_var(), file.llm.key),
                url: file
                    .llm
                    .url
                    .unwrap_or_else(|| provider.default_url().to_string()),
                model: file
                    .llm
                    .model
                    .unwrap_or_else(|| provider.default_model().to_string()),
                dish_name: file.llm.dish_name,
            },
            classifier: ClassifierConfig {
                key: secret(&env, "HF_TOKEN", file.classifier.key),
                url: file
                    .classifier
                    .url
                    .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string()),
                food_model: file
                    .classifier
                    .food_model
                    .unwrap_or_else(|| DEFAULT_FOOD_MODEL.to_string()),
                ingredient_model: match file.classifier.ingredient_model {
                    None => Some(DEFAULT_INGREDIENT_MODEL.to_string()),
                    Some(m) if m.trim().is_empty() => None,
                    Some(m) => Some(m),
                },
            },
            data_dir: file
                .storage
                .data_dir
                .unwrap_or_else(|| "data".to_string())
                .into(),
            recipe_backend: file.storage.recipes,
        })
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(&content, |name| std::env::var(name).ok())
    }

    pub fn load() -> Result<Self> {
        let path =
            std::env::var("NUTRIVISION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !std::path::Path::new(&path).exists() && path == DEFAULT_CONFIG_PATH {
            return Self::parse("", |name| std::env::var(name).ok());
        }
        Self::from_file(&path)
    }
}

fn secret(
    env: &impl Fn(&str) -> Option<String>,
    var: &str,
    from_file: Option<String>,
) -> Option<String> {
    env(var)
        .or(from_file)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
