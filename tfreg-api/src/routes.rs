//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Contracts by uri
        .route(
            "/api/v1/contracts",
            get(handlers::get_contracts).post(handlers::register_contract),
        )
        .route("/api/v1/contracts/:network_id", get(handlers::get_contract))

        // Contracts by resource hash
        .route("/api/v1/hashes/:hash/contracts", get(handlers::get_contracts_by_hash))
        .route(
            "/api/v1/hashes/:hash/contracts/:network_id",
            get(handlers::get_contract_by_hash),
        )

        // Roles
        .route("/api/v1/roles/grant", post(handlers::grant_role))
        .route("/api/v1/roles/revoke", post(handlers::revoke_role))
        .route("/api/v1/roles/:role/:account", get(handlers::has_role))

        // Event log and stats
        .route("/api/v1/events", get(handlers::list_events))
        .route("/api/v1/stats", get(handlers::get_registry_stats))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use tfreg_core::types::Address;
    use tfreg_registry::MemoryRegistry;

    use crate::handlers::CALLER_HEADER;
    use crate::state::ApiConfig;

    const DEPLOYER: &str = "0x36fFe38DEfDcfd48a4016cFE79F3AFcDAfFe123D";
    const REGISTRAR: &str = "0x1ABe0Cd4b606098a2C687c0B4367f60688E76d60";
    const FACTORY: &str = "0xbd3Afb0bB76683eCb4225F9DBc91f998713C3b01";
    const FRANK_URI: &str = "contract://factory/frank";
    const FRANK_HASH: &str = "0x5ba4c015666448ad07dde7c5d3047e267f17fa6d62c5deeb125b228c9594855a";
    const ZERO: &str = "0x0000000000000000000000000000000000000000";

    fn test_app() -> Router {
        let deployer: Address = DEPLOYER.parse().unwrap();
        let registry = Arc::new(MemoryRegistry::new(deployer));
        let state = Arc::new(AppState::new(ApiConfig::default(), registry));
        create_router(state)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, caller: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(caller) = caller {
            builder = builder.header(CALLER_HEADER, caller);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn register_body(network_id: u64, address: &str) -> Value {
        json!({ "uri": FRANK_URI, "networkId": network_id, "contractAddress": address })
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let (status, body) = send(&app, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["persistent"], false);
    }

    #[tokio::test]
    async fn test_register_then_read_back() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_request("/api/v1/contracts", Some(DEPLOYER), register_body(43114, FACTORY)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resourceHash"], FRANK_HASH);
        assert_eq!(body["contractAddress"], FACTORY);

        let uri = format!("/api/v1/contracts/43114?uri={}", "contract%3A%2F%2Ffactory%2Ffrank");
        let (status, body) = send(&app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contractAddress"], FACTORY);

        let uri = format!("/api/v1/hashes/{}/contracts", FRANK_HASH);
        let (status, body) = send(&app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"][0]["networkId"], 43114);
        assert_eq!(body["entries"][0]["contractAddress"], FACTORY);

        // Unknown network reads as the zero address
        let uri = format!("/api/v1/hashes/{}/contracts/137", FRANK_HASH);
        let (_, body) = send(&app, get_request(&uri)).await;
        assert_eq!(body["contractAddress"], ZERO);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_empty() {
        let app = test_app();

        let (status, body) = send(&app, get_request("/api/v1/contracts?uri=nothing")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"], json!([]));
    }

    #[tokio::test]
    async fn test_register_requires_caller_header() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_request("/api/v1/contracts", None, register_body(1, FACTORY)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_register_by_stranger_is_forbidden() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_request("/api/v1/contracts", Some(REGISTRAR), register_body(1, FACTORY)),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (_, stats) = send(&app, get_request("/api/v1/stats")).await;
        assert_eq!(stats["entryCount"], 0);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_address() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_request("/api/v1/contracts", Some(DEPLOYER), register_body(1, "0x1234")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_grant_enables_registrar() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_request(
                "/api/v1/roles/grant",
                Some(DEPLOYER),
                json!({ "role": "registrar", "account": REGISTRAR }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasRole"], true);

        let uri = format!("/api/v1/roles/REGISTRAR_ROLE/{}", REGISTRAR);
        let (_, body) = send(&app, get_request(&uri)).await;
        assert_eq!(body["hasRole"], true);
        assert_eq!(
            body["roleId"],
            "0xedcc084d3dcd65a1f7f23c65c46722faca6953d28e43150a467cf43e5c309238"
        );

        let (status, _) = send(
            &app,
            post_request("/api/v1/contracts", Some(REGISTRAR), register_body(137, FACTORY)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get_request("/api/v1/events?from=2")).await;
        assert_eq!(body["events"][0]["event"], "RoleGranted");
        assert_eq!(body["events"][1]["event"], "ContractRegistered");
        assert_eq!(body["events"][1]["registrar"], REGISTRAR);
        assert_eq!(body["next"], 4);
    }

    #[tokio::test]
    async fn test_revoke_by_non_admin_is_forbidden() {
        let app = test_app();

        let (status, _) = send(
            &app,
            post_request(
                "/api/v1/roles/revoke",
                Some(REGISTRAR),
                json!({ "role": "admin", "account": DEPLOYER }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let uri = format!("/api/v1/roles/admin/{}", DEPLOYER);
        let (_, body) = send(&app, get_request(&uri)).await;
        assert_eq!(body["hasRole"], true);
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let app = test_app();

        let uri = format!("/api/v1/roles/governor/{}", DEPLOYER);
        let (status, _) = send(&app, get_request(&uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_hash_rejected() {
        let app = test_app();

        let (status, _) = send(&app, get_request("/api/v1/hashes/0x1234/contracts")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_snake_case_body_rejected() {
        let app = test_app();

        let body = json!({ "uri": FRANK_URI, "network_id": 1, "contract_address": FACTORY });
        let (status, body) = send(
            &app,
            post_request("/api/v1/contracts", Some(DEPLOYER), body),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_body() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/contracts")
            .header("content-type", "application/json")
            .header(CALLER_HEADER, DEPLOYER)
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_bad_path_and_query_use_error_body() {
        let app = test_app();

        // Non-numeric network id
        let (status, body) = send(&app, get_request("/api/v1/contracts/abc?uri=x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");

        // Missing uri
        let (status, body) = send(&app, get_request("/api/v1/contracts/1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");

        let (status, body) = send(&app, get_request("/api/v1/events?from=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }
}
