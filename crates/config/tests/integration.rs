//! Integration tests for config

#[cfg(test)]
mod tests {
    use modhost_config::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[paths]
data_dir = "/srv/mc/config"
artifacts_dir = "/srv/mc/mods"

[registry]
game_version = "1.20.4"
loader = "quilt"

[network]
timeout = 10
retries = 0

[host]
container = "eldoria-server"
announce_delays = [0, 0, 0]
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/srv/mc/config"));
        assert_eq!(config.artifacts_path(), PathBuf::from("/srv/mc/mods"));
        assert_eq!(config.backups_path(), PathBuf::from(constants::BACKUPS_DIR));
        assert_eq!(config.registry.game_version, "1.20.4");
        assert_eq!(config.registry.loader, "quilt");
        assert_eq!(config.registry.base_url, constants::REGISTRY_BASE_URL);
        assert_eq!(config.network.timeout, 10);
        assert_eq!(config.network.retries, 0);
        assert_eq!(config.network.download_timeout, 300);
        assert_eq!(config.host.container, "eldoria-server");
        assert_eq!(config.host.announce_delays, [0, 0, 0]);
        assert_eq!(config.install.artifact_extension, "jar");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_path(), PathBuf::from("/minecraft/config"));
        assert_eq!(config.artifacts_path(), PathBuf::from("/minecraft/mods"));
        assert_eq!(config.registry.search_limit, 24);
        assert_eq!(config.host.container, "minecraft-server");
        assert!(config.registry.token.is_none());
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[network]\ntimeout = \"soon\"").unwrap_err();
        assert!(matches!(
            err,
            modhost_errors::Error::Config(modhost_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/modhost.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            modhost_errors::Error::Config(modhost_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("MODHOST_REGISTRY_TOKEN", "mrp_secret");
        std::env::set_var("MODHOST_CONTAINER", "eldoria-server");
        std::env::set_var("MODHOST_DATA_DIR", "/tmp/modhost-data");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.registry.token.as_deref(), Some("mrp_secret"));
        assert_eq!(config.host.container, "eldoria-server");
        assert_eq!(config.data_path(), PathBuf::from("/tmp/modhost-data"));

        std::env::remove_var("MODHOST_REGISTRY_TOKEN");
        std::env::remove_var("MODHOST_CONTAINER");
        std::env::remove_var("MODHOST_DATA_DIR");
    }

    #[test]
    fn test_merge_env_invalid_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("MODHOST_NETWORK_TIMEOUT", "forever");
        let mut config = Config::default();
        let result = config.merge_env();
        std::env::remove_var("MODHOST_NETWORK_TIMEOUT");

        assert!(matches!(
            result,
            Err(modhost_errors::Error::Config(
                modhost_errors::ConfigError::InvalidValue { .. }
            ))
        ));
    }
}
