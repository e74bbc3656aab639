//! Integration tests for the Metabase HTTP client using wiremock
//!
//! These tests verify request headers and bodies, and the mapping of response
//! statuses onto typed errors.

use metabase_provider::client::API_KEY_HEADER;
use metabase_provider::{MetabaseClient, ProviderConfig, ProviderError};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> MetabaseClient {
    let config = ProviderConfig::new(server.uri(), "mb_test_key").unwrap();
    MetabaseClient::new(&config).unwrap()
}

/// Test module for request construction
mod request_tests {
    use super::*;

    /// Every request carries the API key and a JSON content type
    #[tokio::test]
    async fn test_post_sends_headers_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/permissions/group"))
            .and(header(API_KEY_HEADER, "mb_test_key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "Analysts"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
            .expect(1)
            .mount(&server)
            .await;

        let response = assert_ok!(
            client(&server)
                .post("/api/permissions/group", &json!({"name": "Analysts"}))
                .await
        );
        assert_eq!(response.status(), 200);
    }

    /// GET and DELETE also authenticate
    #[tokio::test]
    async fn test_get_and_delete_authenticate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/1"))
            .and(header(API_KEY_HEADER, "mb_test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/1"))
            .and(header(API_KEY_HEADER, "mb_test_key"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        assert_ok!(client.get("/api/user/1").await);
        assert_ok!(client.delete("/api/user/1").await);
    }

    /// A trailing slash on the host does not double up in the URL
    #[tokio::test]
    async fn test_host_trailing_slash_is_trimmed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/collection/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::new(format!("{}/", server.uri()), "k").unwrap();
        let client = MetabaseClient::new(&config).unwrap();
        assert_ok!(client.get("/api/collection/1").await);
    }
}

/// Test module for status mapping
mod status_tests {
    use super::*;

    async fn error_for(status: u16, body: &str) -> ProviderError {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/collection/1"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        assert_err!(client(&server).get("/api/collection/1").await)
    }

    /// Known statuses map onto dedicated variants carrying the body text
    #[tokio::test]
    async fn test_known_statuses() {
        assert!(matches!(error_for(404, "Not found.").await, ProviderError::NotFound(m) if m == "Not found."));
        assert!(matches!(error_for(409, "dup").await, ProviderError::Conflict(_)));
        assert!(matches!(error_for(400, "bad").await, ProviderError::BadRequest(_)));
        assert!(matches!(error_for(401, "who").await, ProviderError::Unauthorized(_)));
        assert!(matches!(error_for(403, "no").await, ProviderError::Forbidden(_)));
    }

    /// Other statuses keep the code and body
    #[tokio::test]
    async fn test_other_status_is_generic() {
        let err = error_for(500, "boom").await;
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "boom (status code: 500)");
    }

    /// Unreachable hosts surface as transport errors
    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let server = MockServer::start().await;
        let client = client(&server);
        drop(server);

        let err = assert_err!(client.get("/api/user/1").await);
        assert!(matches!(err, ProviderError::Http(_)));
    }
}

/// Test module for response decoding
mod decode_tests {
    use super::*;
    use metabase_provider::models::CollectionDto;

    /// Decode failures name the operation
    #[tokio::test]
    async fn test_decode_failure_has_context() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let response = client(&server)
            .post("/api/collection", &json!({"name": "Eng"}))
            .await
            .unwrap();
        let err = assert_err!(MetabaseClient::decode::<CollectionDto>(response, "create").await);
        assert!(matches!(err, ProviderError::Decode { .. }));
        assert_eq!(err.message(), "failed to decode create response");
    }
}
