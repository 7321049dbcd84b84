use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub quiz: QuizSettings,
    /// Absent when the service runs without persistence
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub live_jobs: LiveJobsSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

fn default_catalog_path() -> String { "data/internships.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSettings {
    #[serde(default = "default_quiz_path")]
    pub path: String,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self { path: default_quiz_path() }
    }
}

fn default_quiz_path() -> String { "data/quizzes.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret shared with the identity service
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_completion_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            api_key: None,
            model: default_completion_model(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_completion_url() -> String { "https://api.groq.com/openai/v1".to_string() }
fn default_completion_model() -> String { "llama-3.3-70b-versatile".to_string() }
fn default_completion_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LiveJobsSettings {
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_live_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_live_limit")]
    pub limit: usize,
    #[serde(default = "default_max_merged")]
    pub max_merged: usize,
    #[serde(default = "default_assigned_score")]
    pub assigned_score: f64,
    #[serde(default = "default_live_location")]
    pub default_location: String,
    #[serde(default = "default_live_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_live_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for LiveJobsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_secs: default_live_timeout(),
            limit: default_live_limit(),
            max_merged: default_max_merged(),
            assigned_score: default_assigned_score(),
            default_location: default_live_location(),
            cache_capacity: default_live_cache_capacity(),
            cache_ttl_secs: default_live_cache_ttl(),
        }
    }
}

fn default_live_timeout() -> u64 { 8 }
fn default_live_limit() -> usize { 10 }
fn default_max_merged() -> usize { 3 }
fn default_assigned_score() -> f64 { 95.0 }
fn default_live_location() -> String { "India".to_string() }
fn default_live_cache_capacity() -> u64 { 1000 }
fn default_live_cache_ttl() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_education_weight")]
    pub education: f64,
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_interest_weight")]
    pub interest: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            education: default_education_weight(),
            skills: default_skills_weight(),
            interest: default_interest_weight(),
            location: default_location_weight(),
            experience: default_experience_weight(),
        }
    }
}

fn default_education_weight() -> f64 { 0.25 }
fn default_skills_weight() -> f64 { 0.30 }
fn default_interest_weight() -> f64 { 0.25 }
fn default_location_weight() -> f64 { 0.15 }
fn default_experience_weight() -> f64 { 0.05 }

impl WeightsConfig {
    /// Check the weights and convert them for the matcher
    ///
    /// Every weight must be finite and non-negative, and at least one positive.
    pub fn to_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights {
            education: self.education,
            skills: self.skills,
            interest: self.interest,
            location: self.location,
            experience: self.experience,
        };

        let values = [
            ("education", weights.education),
            ("skills", weights.skills),
            ("interest", weights.interest),
            ("location", weights.location),
            ("experience", weights.experience),
        ];

        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Message(format!(
                "scoring.weights.{} must be a non-negative number, got {}",
                name, value
            )));
        }

        if weights.total() <= 0.0 {
            return Err(ConfigError::Message(
                "scoring.weights must contain at least one positive weight".to_string(),
            ));
        }

        Ok(weights)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with INTERN__)
    /// 5. DATABASE_URL, GROQ_API_KEY and JWT_SECRET_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., INTERN__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("INTERN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("INTERN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.scoring.weights.to_weights()?;
        Ok(self)
    }
}

/// Apply the conventional variables shared with the deployment environment
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("GROQ_API_KEY", "completion.api_key"),
        ("JWT_SECRET_KEY", "auth.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                builder = builder.set_override(key, value)?;
            }
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default().to_weights().unwrap();
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = WeightsConfig {
            skills: -0.1,
            ..Default::default()
        };
        assert!(weights.to_weights().is_err());
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let weights = WeightsConfig {
            education: 0.0,
            skills: 0.0,
            interest: 0.0,
            location: 0.0,
            experience: 0.0,
        };
        assert!(weights.to_weights().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[matching]
default_top_n = 3

[scoring.weights]
skills = 0.5

[database]
url = "postgres://localhost/careers"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 8088);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.default_top_n, 3);
        assert_eq!(settings.scoring.weights.skills, 0.5);
        assert_eq!(settings.scoring.weights.education, 0.25);
        assert!(!settings.live_jobs.enabled);

        let database = settings.database.unwrap();
        assert_eq!(database.max_connections, 10);
    }

    #[test]
    fn test_load_from_file_rejects_bad_weights() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scoring.weights]\nlocation = -1.0").unwrap();

        assert!(Settings::load_from(file.path()).is_err());
    }
}
