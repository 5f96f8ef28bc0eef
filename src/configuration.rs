use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretBox, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

const ENV_PREFIX: &str = "TRIVIA";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,
    /// Full connection URL; takes precedence over the individual parts.
    #[serde(default)]
    pub url: Option<SecretString>,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> SecretString {
        match &self.url {
            Some(url) => SecretString::from(url.expose_secret().to_owned()),
            None => SecretString::from(format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username,
                self.password.expose_secret(),
                self.host,
                self.port,
                self.database_name
            )),
        }
    }
}

/// Reads settings from defaults, an optional `configuration` file in the
/// working directory and `TRIVIA_`-prefixed environment variables
/// (`TRIVIA_DATABASE__PASSWORD`, `TRIVIA_APPLICATION__PORT`, ...).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    build_settings(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
}

fn build_settings(environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 5000)?
        .set_default("database.username", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.database_name", "trivia")?
        .add_source(File::with_name("configuration").required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()
}

/// Process-lifetime secret, regenerated on every start.
pub fn generate_secret_key() -> SecretBox<[u8; 32]> {
    SecretBox::new(Box::new(rand::random()))
}
