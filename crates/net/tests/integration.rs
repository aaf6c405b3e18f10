//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use modhost_errors::{Error, NetworkError, RegistryError};
    use modhost_net::*;
    use modhost_types::DependencyType;
    use serde_json::json;
    use std::time::Duration;

    fn fast_client() -> NetClient {
        NetClient::new(NetConfig {
            retry_count: 1,
            retry_delay: Duration::from_millis(10),
            max_body_size: 64,
            ..NetConfig::default()
        })
        .unwrap()
    }

    fn registry(server: &MockServer) -> ModrinthClient {
        ModrinthClient::new(fast_client(), &server.url("/v2"), "fabric").unwrap()
    }

    #[tokio::test]
    async fn fetch_version_reads_dependencies() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v2/version/AAAA");
            then.status(200).json_body(json!({
                "id": "AAAA",
                "project_id": "P1",
                "name": "ignored extra field",
                "dependencies": [
                    {"project_id": "P2", "version_id": null, "dependency_type": "required"},
                    {"project_id": "P3", "version_id": null, "dependency_type": "optional"}
                ]
            }));
        });

        let version = registry(&server).fetch_version("AAAA").await.unwrap();
        mock.assert();
        assert_eq!(version.project_id, "P1");
        assert_eq!(version.dependencies.len(), 2);
        assert_eq!(version.dependencies[0].dependency_type, DependencyType::Required);
    }

    #[tokio::test]
    async fn missing_version_is_a_registry_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/version/gone");
            then.status(404);
        });

        let err = registry(&server).fetch_version("gone").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::VersionNotFound { .. })
        ));
        assert!(err.is_registry_failure());
    }

    #[tokio::test]
    async fn latest_file_prefers_primary_and_sends_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v2/project/sodium")
                .header("Authorization", "mrp_token");
            then.status(200).json_body(json!({
                "id": "AANobbMI",
                "title": "Sodium",
                "description": "Rendering engine",
                "icon_url": "https://cdn/icon.png"
            }));
        });
        let versions = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/project/sodium/version")
                .query_param("loaders", "[\"fabric\"]")
                .query_param("game_versions", "[\"1.21.1\"]")
                .header("Authorization", "mrp_token");
            then.status(200).json_body(json!([
                {
                    "id": "newest",
                    "files": [
                        {"url": "https://cdn/sodium-sources.jar", "filename": "sodium-sources.jar", "primary": false},
                        {"url": "https://cdn/sodium.jar", "filename": "sodium.jar", "primary": true}
                    ],
                    "dependencies": []
                },
                {
                    "id": "older",
                    "files": [{"url": "https://cdn/old.jar", "filename": "old.jar", "primary": true}]
                }
            ]));
        });

        let client = registry(&server).with_token(Some("mrp_token".into()));
        let file = client
            .fetch_project_latest_file("sodium", "1.21.1")
            .await
            .unwrap();

        versions.assert();
        assert_eq!(file.version_id, "newest");
        assert_eq!(file.file_name, "sodium.jar");
        assert_eq!(file.title, "Sodium");

        let record = file.into_record();
        assert_eq!(record.project_id, "sodium");
        assert!(record.is_direct());
    }

    #[tokio::test]
    async fn no_compatible_version() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/project/legacy");
            then.status(200)
                .json_body(json!({"id": "legacy", "title": "Legacy"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/v2/project/legacy/version");
            then.status(200).json_body(json!([]));
        });

        let err = registry(&server)
            .fetch_project_latest_file("legacy", "1.21.1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::NoCompatibleVersion { .. })
        ));
    }

    #[tokio::test]
    async fn search_sends_facets_and_maps_hits() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/search")
                .query_param("query", "lithium")
                .query_param("limit", "5")
                .query_param(
                    "facets",
                    "[[\"categories:fabric\"],[\"versions:1.21.1\"],[\"project_type:mod\"],[\"server_side:optional\",\"server_side:required\"]]",
                );
            then.status(200).json_body(json!({
                "hits": [{
                    "project_id": "gvQqBUqZ",
                    "title": "Lithium",
                    "author": "jellysquid3",
                    "description": "Server optimizations",
                    "server_side": "optional"
                }],
                "total_hits": 1,
                "limit": 5,
                "offset": 0
            }));
        });

        let query = SearchQuery::new("1.21.1").text("lithium").page(5, 0);
        let page = registry(&server).search(&query).await.unwrap();
        mock.assert();
        assert_eq!(page.total_hits, 1);
        assert_eq!(page.results[0].title, "Lithium");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/version/bad");
            then.status(200).body("<html>");
        });

        let err = registry(&server).fetch_version("bad").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v2/version/flaky");
            then.status(503);
        });

        let err = registry(&server).fetch_version("flaky").await.unwrap_err();
        assert_eq!(mock.hits(), 2);
        assert!(matches!(
            err,
            Error::Network(NetworkError::HttpError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn artifact_download_and_size_limit() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/small.jar");
            then.status(200).body("jar bytes");
        });
        server.mock(|when, then| {
            when.method(GET).path("/huge.jar");
            then.status(200).body(vec![0u8; 1024]);
        });

        let client = fast_client();
        let bytes = client.fetch_artifact(&server.url("/small.jar")).await.unwrap();
        assert_eq!(bytes, b"jar bytes");

        let err = client
            .fetch_artifact(&server.url("/huge.jar"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::ResponseTooLarge { .. })
        ));
    }

    #[test]
    fn url_validation() {
        assert!(parse_url("https://api.modrinth.com/v2").is_ok());
        assert!(parse_url("ftp://example.com/file.jar").is_err());
        assert!(parse_url("not a url").is_err());
    }
}
