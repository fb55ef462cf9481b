#[cfg(test)]
mod tests {
    use curtain::libs::config::{Config, DatabaseConfig, IN_MEMORY_PATH};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.database.retry_attempts, 3);
        assert_eq!(config.database.retry_delay(), Duration::from_millis(100));
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(2));
        assert!(config.database.path.ends_with("curtain.db"));
        assert!(!config.database.is_in_memory());
    }

    #[test]
    fn test_in_memory_database() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.path, PathBuf::from(IN_MEMORY_PATH));
        assert!(!DatabaseConfig::at("/tmp/theatre.db").is_in_memory());
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("CURTAIN_DB_PATH", " /srv/theatre.db "),
                ("CURTAIN_DB_RETRIES", "5"),
                ("CURTAIN_DB_RETRY_DELAY_MS", "250"),
                ("CURTAIN_DB_BUSY_TIMEOUT_MS", "0"),
                ("CURTAIN_REPORTS_DIR", "out"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/srv/theatre.db"));
        assert_eq!(config.database.retry_attempts, 5);
        assert_eq!(config.database.retry_delay_ms, 250);
        assert_eq!(config.database.busy_timeout_ms, 0);
        assert_eq!(config.reports_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_blank_path_keeps_default() {
        let mut config = Config::default();
        let before = config.clone();
        config.apply_env(env(&[("CURTAIN_DB_PATH", "  ")])).unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[("CURTAIN_DB_RETRIES", "0")])).is_err());
        assert!(config.apply_env(env(&[("CURTAIN_DB_RETRIES", "many")])).is_err());
        assert!(config.apply_env(env(&[("CURTAIN_DB_RETRY_DELAY_MS", "-1")])).is_err());
        assert_eq!(config.database.retry_attempts, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"database": {"path": "theatre.db"}}"#).unwrap();
        assert_eq!(config.database.path, PathBuf::from("theatre.db"));
        assert_eq!(config.database.retry_attempts, 3);
        assert_eq!(config.reports_dir, PathBuf::from("reports"));

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
