//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl TargetConfig {
    /// Build a connection string for tokio-postgres.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_applies_defaults() {
        let yaml = r#"
source:
  host: sqlserver.internal
  database: interviews
  user: migrator
  password: s3cret
target:
  host: pg.internal
  database: interviews_anon
  user: migrator
  password: s3cret
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.source.port, 1433);
        assert_eq!(config.source.schema, "dbo");
        assert!(config.source.encrypt);
        assert_eq!(config.target.port, 5432);
        assert_eq!(config.target.schema, "public");
        assert_eq!(config.migration.batch_size, 2000);
        assert_eq!(config.migration.user_batch_size, 500);
        assert_eq!(config.migration.pseudonym_domain, "example.invalid");
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        let yaml = r#"
source:
  host: ""
  database: interviews
  user: migrator
  password: s3cret
target:
  host: pg.internal
  database: interviews_anon
  user: migrator
  password: s3cret
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_pg_connection_string() {
        let target = TargetConfig {
            host: "pg.internal".into(),
            port: 5433,
            database: "anon".into(),
            user: "migrator".into(),
            password: "pw".into(),
            schema: "public".into(),
        };
        assert_eq!(
            target.connection_string(),
            "host=pg.internal port=5433 dbname=anon user=migrator password=pw"
        );
    }
}
