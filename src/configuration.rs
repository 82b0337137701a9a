use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults, then an optional `trivia.{toml,yaml,json}` next to the binary,
/// then `TRIVIA_`-prefixed environment variables (`TRIVIA_SERVER__PORT=8080`).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    build(Environment::with_prefix("TRIVIA"))
}

fn build(environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.cors_origins", vec!["*"])?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .add_source(File::with_name("trivia").required(false))
        .add_source(
            environment
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("TRIVIA").source(Some(source))
    }

    #[test]
    fn falls_back_to_defaults() {
        let settings = build(environment(&[])).unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:5000");
        assert_eq!(settings.server.cors_origins, vec!["*".to_owned()]);
        assert_eq!(settings.database.url.expose_secret(), "sqlite:trivia.db");
        assert_eq!(settings.database.max_connections, 5);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = build(environment(&[
            ("TRIVIA_SERVER__PORT", "8080"),
            ("TRIVIA_SERVER__CORS_ORIGINS", "https://a.example,https://b.example"),
            ("TRIVIA_DATABASE__URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.server.cors_origins,
            vec!["https://a.example".to_owned(), "https://b.example".to_owned()]
        );
        assert_eq!(settings.database.url.expose_secret(), "sqlite::memory:");
    }
}
