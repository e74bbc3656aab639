//! End-to-end provider tests against a mocked Metabase
//!
//! Each test drives `MetabaseProvider` through `ProviderTester` the way the
//! host would and checks the requests that reach the server.

use metabase_provider::testing::{
    assert_error_contains, assert_plan_creates, assert_plan_no_changes, assert_plan_replaces,
    assert_plan_updates_in_place, ProviderTester, TestError,
};
use metabase_provider::{MetabaseProvider, ProviderConfig, ProviderError, ProviderService};
use serde_json::{json, Value};
use tokio_test::assert_err;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "metabase_collection";
const GROUP: &str = "metabase_permission_group";
const USER: &str = "metabase_user";
const MEMBERSHIP: &str = "metabase_user_permission_group_membership";

async fn configured(server: &MockServer) -> ProviderTester<MetabaseProvider> {
    let tester = ProviderTester::new(MetabaseProvider::new());
    tester
        .configure(json!({"host": server.uri(), "api_key": "mb_test_key"}))
        .await
        .unwrap();
    tester
}

/// Fails the test if any request reaches the server.
async fn expect_no_requests(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Method and path of every request the server saw, in arrival order.
async fn request_log(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

mod provider_tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_before_configure_fail() {
        let tester = ProviderTester::new(MetabaseProvider::new());
        let err = assert_err!(tester.create(GROUP, json!({"id": null, "name": "x"})).await);
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains("provider has not been configured"));

        let err = assert_err!(tester.read(GROUP, json!({"id": "1", "name": null})).await);
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_configure_requires_both_fields() {
        let tester = ProviderTester::new(MetabaseProvider::new());
        match tester.configure(json!({"api_key": "k"})).await {
            Err(TestError::Diagnostics(diagnostics)) => {
                assert_error_contains(&diagnostics, "Missing required attribute 'host'")
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_configured_at_startup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/permissions/group/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Data"})))
            .mount(&server)
            .await;

        let config = ProviderConfig::new(server.uri(), "k").unwrap();
        let provider = MetabaseProvider::configured(config).await.unwrap();
        let state = provider
            .read(GROUP, json!({"id": "5", "name": null}))
            .await
            .unwrap();
        assert_eq!(state, Some(json!({"id": "5", "name": "Data"})));
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let tester = ProviderTester::new(MetabaseProvider::new());
        assert!(tester
            .validate_resource_config(USER, json!({"email": "a@b.c"}))
            .await
            .is_ok());
        assert!(tester
            .validate_resource_config(USER, json!({"email": "a@b.c", "role": "admin"}))
            .await
            .is_err());
    }
}

mod collection_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/collection"))
            .and(body_json(json!({"name": "Eng", "archived": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "name": "Eng", "parent_id": null, "archived": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let plan = tester
            .plan_create(COLLECTION, json!({"name": "Eng"}))
            .await
            .unwrap();
        assert_plan_creates(&plan);
        assert_eq!(plan.planned_state["archived"], false);

        let state = tester.create(COLLECTION, plan.planned_state).await.unwrap();
        assert_eq!(
            state,
            json!({"id": "1", "name": "Eng", "parent_id": null, "archived": false})
        );
    }

    #[tokio::test]
    async fn test_create_archived_is_rejected_locally() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;

        let tester = configured(&server).await;
        let err = assert_err!(
            tester
                .create(COLLECTION, json!({"id": null, "name": "Eng", "parent_id": null, "archived": true}))
                .await
        );
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_parent_is_rejected_locally() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;

        let tester = configured(&server).await;
        let err = assert_err!(
            tester
                .create(COLLECTION, json!({"id": null, "name": "Eng", "parent_id": "root", "archived": false}))
                .await
        );
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_clears_parent_and_returns_plan() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/collection/3"))
            .and(body_json(json!({"parent_id": null})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let prior = json!({"id": "3", "name": "Ops", "parent_id": "1", "archived": false});
        let plan = tester
            .plan_update(COLLECTION, prior.clone(), json!({"name": "Ops"}))
            .await
            .unwrap();
        assert_plan_updates_in_place(&plan);

        let state = tester
            .update(COLLECTION, prior, plan.planned_state.clone())
            .await
            .unwrap();
        assert_eq!(state, plan.planned_state);
        assert_eq!(state["parent_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_archives() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/collection/3"))
            .and(body_json(json!({"archived": true})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        tester
            .lifecycle_delete(
                COLLECTION,
                json!({"id": "3", "name": "Ops", "parent_id": null, "archived": false}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_collection_is_removed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collection/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found."))
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let state = tester
            .read(COLLECTION, json!({"id": "99", "name": "Gone"}))
            .await
            .unwrap();
        assert_eq!(state, None);
    }

    #[tokio::test]
    async fn test_import_then_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collection/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7, "name": "Finance", "parent_id": 2, "archived": false
            })))
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let imported = tester.import_resource(COLLECTION, "7").await.unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(
            imported[0].state,
            json!({"id": "7", "name": null, "parent_id": null, "archived": null})
        );

        let state = tester.import_and_read(COLLECTION, "7").await.unwrap();
        assert_eq!(
            state,
            Some(json!({"id": "7", "name": "Finance", "parent_id": "2", "archived": false}))
        );
    }
}

mod permission_group_tests {
    use super::*;

    #[tokio::test]
    async fn test_group_lifecycle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/permissions/group"))
            .and(body_json(json!({"name": "Analysts"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Analysts"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/permissions/group/5"))
            .and(body_json(json!({"name": "Data"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/permissions/group/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let plan = tester
            .plan_create(GROUP, json!({"name": "Analysts"}))
            .await
            .unwrap();
        let created = tester.create(GROUP, plan.planned_state).await.unwrap();
        assert_eq!(created, json!({"id": "5", "name": "Analysts"}));

        let plan = tester
            .plan_update(GROUP, created.clone(), json!({"name": "Data"}))
            .await
            .unwrap();
        let updated = tester
            .update(GROUP, created, plan.planned_state)
            .await
            .unwrap();
        assert_eq!(updated, json!({"id": "5", "name": "Data"}));

        tester.delete(GROUP, updated).await.unwrap();
    }

    #[tokio::test]
    async fn test_unchanged_group_plans_nothing() {
        let tester = ProviderTester::new(MetabaseProvider::new());
        let state = json!({"id": "5", "name": "Data"});
        let plan = tester
            .plan_update(GROUP, state, json!({"name": "Data"}))
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }
}

mod user_tests {
    use super::*;

    fn user_state(is_active: bool) -> Value {
        json!({
            "id": "11", "email": "ada@example.com", "first_name": null, "last_name": null,
            "is_active": is_active
        })
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/user"))
            .and(body_json(json!({"email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 11,
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "is_active": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let plan = tester
            .plan_create(
                USER,
                json!({"email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"}),
            )
            .await
            .unwrap();
        assert_eq!(plan.planned_state["is_active"], true);

        let state = tester.create(USER, plan.planned_state).await.unwrap();
        assert_eq!(state["id"], "11");
        assert_eq!(state["is_active"], true);
    }

    #[tokio::test]
    async fn test_create_inactive_is_rejected_locally() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;

        let tester = configured(&server).await;
        let plan = tester
            .plan_create(USER, json!({"email": "ada@example.com", "is_active": false}))
            .await
            .unwrap();
        let err = assert_err!(tester.create(USER, plan.planned_state).await);
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_email_change_replaces() {
        let tester = ProviderTester::new(MetabaseProvider::new());
        let prior = json!({
            "id": "11", "email": "ada@example.com", "first_name": null, "last_name": null, "is_active": true
        });
        let plan = tester
            .plan_update(USER, prior, json!({"email": "grace@example.com"}))
            .await
            .unwrap();
        assert_plan_replaces(&plan);
        assert_eq!(plan.planned_state["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_rename_leaves_activation_alone() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11"))
            .and(body_json(json!({"first_name": "Ada", "last_name": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11/reactivate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let prior = user_state(true);
        let plan = tester
            .plan_update(USER, prior.clone(), json!({"email": "ada@example.com", "first_name": "Ada"}))
            .await
            .unwrap();
        assert_plan_updates_in_place(&plan);
        let state = tester.update(USER, prior, plan.planned_state).await.unwrap();
        assert_eq!(state["is_active"], true);
    }

    #[tokio::test]
    async fn test_deactivate_through_update() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11"))
            .and(body_json(json!({"first_name": null, "last_name": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11/reactivate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let prior = user_state(true);
        let plan = tester
            .plan_update(USER, prior.clone(), json!({"email": "ada@example.com", "is_active": false}))
            .await
            .unwrap();
        let state = tester.update(USER, prior, plan.planned_state).await.unwrap();
        assert_eq!(state["is_active"], false);
        assert_eq!(
            request_log(&server).await,
            ["PUT /api/user/11", "DELETE /api/user/11"]
        );
    }

    #[tokio::test]
    async fn test_reactivate_before_editing_names() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11/reactivate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/user/11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let prior = user_state(false);
        let plan = tester
            .plan_update(USER, prior.clone(), json!({"email": "ada@example.com", "is_active": true}))
            .await
            .unwrap();
        let state = tester.update(USER, prior, plan.planned_state).await.unwrap();
        assert_eq!(state["is_active"], true);
        assert_eq!(
            request_log(&server).await,
            ["PUT /api/user/11/reactivate", "PUT /api/user/11"]
        );
    }

    #[tokio::test]
    async fn test_delete_deactivates() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        tester
            .delete(USER, json!({"id": "11", "email": "ada@example.com"}))
            .await
            .unwrap();
    }
}

mod membership_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_read_membership() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/permissions/membership"))
            .and(body_json(json!({"user_id": 4, "group_id": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"membership_id": 8, "user_id": 3, "group_id": 2},
                {"membership_id": 9, "user_id": 4, "group_id": 2}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/permissions/membership"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "2": [{"membership_id": 9, "user_id": 4, "group_id": 2}]
            })))
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let state = tester
            .lifecycle_create(MEMBERSHIP, json!({"user_id": "4", "permission_group_id": "2"}))
            .await
            .unwrap();
        assert_eq!(
            state,
            json!({"id": "9", "user_id": "4", "permission_group_id": "2"})
        );
    }

    #[tokio::test]
    async fn test_read_missing_membership_is_removed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/permissions/membership"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"2": []})))
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        let state = tester
            .read(MEMBERSHIP, json!({"id": "9", "user_id": "4", "permission_group_id": "2"}))
            .await
            .unwrap();
        assert_eq!(state, None);
    }

    #[tokio::test]
    async fn test_update_is_unimplemented() {
        let server = MockServer::start().await;
        expect_no_requests(&server).await;

        let tester = configured(&server).await;
        let state = json!({"id": "9", "user_id": "4", "permission_group_id": "2"});
        let err = assert_err!(tester.update(MEMBERSHIP, state.clone(), state).await);
        assert!(matches!(err, ProviderError::Unimplemented(_)));
    }

    #[tokio::test]
    async fn test_delete_membership() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/permissions/membership/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let tester = configured(&server).await;
        tester
            .delete(MEMBERSHIP, json!({"id": "9", "user_id": "4", "permission_group_id": "2"}))
            .await
            .unwrap();
    }
}
