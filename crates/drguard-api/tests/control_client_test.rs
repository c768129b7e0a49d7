// Wire-level coverage for `ControlClient` against a wiremock gateway.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drguard_api::types::{AssociationResponse, DetectorStateResponse};
use drguard_api::{ControlClient, Error};

async fn mock_gateway() -> (MockServer, ControlClient) {
    let server = MockServer::start().await;
    let client = ControlClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

/// Error body in the gateway's envelope shape.
fn envelope(status: u16, message: &str, code: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message, "code": code }))
}

#[tokio::test]
async fn test_enable_patches_the_detector() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/detectors/D1"))
        .and(method("PATCH"))
        .and(body_json(json!({ "enable": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.update_detector("D1", true).await.unwrap();
}

#[tokio::test]
async fn test_feature_put_carries_enabled_status() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/detectors/D1/features/EKS_RUNTIME_MONITORING"))
        .and(method("PUT"))
        .and(body_json(json!({ "status": "ENABLED" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_feature("D1", "EKS_RUNTIME_MONITORING", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_feature_put_carries_disabled_status() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/detectors/D1/features/RDS_LOGIN_EVENTS"))
        .and(method("PUT"))
        .and(body_json(json!({ "status": "DISABLED" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .update_feature("D1", "RDS_LOGIN_EVENTS", false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_associate_puts_the_web_acl_id() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L1"))
        .and(method("PUT"))
        .and(body_json(json!({ "webAclId": "W1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.associate("L1", "W1").await.unwrap();
}

#[tokio::test]
async fn test_disassociate_issues_a_delete() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L1"))
        .and(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.disassociate("L1").await.unwrap();
}

#[tokio::test]
async fn test_detector_state_round_trips() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/detectors/D1"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detectorId": "D1",
            "enabled": true,
            "features": [
                { "name": "EKS_RUNTIME_MONITORING", "status": "ENABLED" },
                { "name": "RDS_LOGIN_EVENTS", "status": "DISABLED" },
            ],
            "updatedAt": "2024-06-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let detector: DetectorStateResponse = client.get_detector("D1").await.unwrap();

    assert_eq!(detector.detector_id, "D1");
    assert!(detector.enabled);
    assert_eq!(detector.features.len(), 2);
    assert_eq!(detector.features[0].name, "EKS_RUNTIME_MONITORING");
    assert_eq!(detector.features[1].status, "DISABLED");
}

#[tokio::test]
async fn test_association_lookup() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L1"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceId": "L1",
            "webAclId": "W1",
            "associatedAt": "2024-06-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let assoc: AssociationResponse = client.get_association("L1").await.unwrap();

    assert_eq!(assoc.resource_id, "L1");
    assert_eq!(assoc.web_acl_id, "W1");
}

// Repeating the posture a target is already in must not surface an error.

#[tokio::test]
async fn test_repeat_enable_is_quietly_accepted() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/detectors/D1"))
        .and(method("PATCH"))
        .respond_with(envelope(
            409,
            "Detector D1 is already enabled",
            "ALREADY_IN_REQUESTED_STATE",
        ))
        .mount(&server)
        .await;

    client.update_detector("D1", true).await.unwrap();
}

#[tokio::test]
async fn test_disassociate_with_nothing_bound_is_quietly_accepted() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L1"))
        .and(method("DELETE"))
        .respond_with(envelope(
            409,
            "No policy is associated with L1",
            "ALREADY_IN_REQUESTED_STATE",
        ))
        .mount(&server)
        .await;

    client.disassociate("L1").await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_token() {
    let (server, client) = mock_gateway().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.update_detector("D1", true).await.unwrap_err();
    assert!(matches!(err, Error::InvalidToken), "got {err:?}");
}

#[tokio::test]
async fn test_missing_resource_reports_not_found() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L9"))
        .and(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "No such resource" })),
        )
        .mount(&server)
        .await;

    let err = client.get_association("L9").await.unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn test_gateway_envelope_surfaces_message_and_code() {
    let (server, client) = mock_gateway().await;

    Mock::given(path("/v1/associations/L1"))
        .and(method("PUT"))
        .respond_with(envelope(422, "Web ACL W9 does not exist", "POLICY_NOT_FOUND"))
        .mount(&server)
        .await;

    let Err(Error::Gateway {
        status,
        message,
        code,
    }) = client.associate("L1", "W9").await
    else {
        panic!("expected a gateway rejection");
    };

    assert_eq!(status, 422);
    assert_eq!(message, "Web ACL W9 does not exist");
    assert_eq!(code.as_deref(), Some("POLICY_NOT_FOUND"));
}

#[tokio::test]
async fn test_bodyless_500_still_becomes_a_gateway_error() {
    let (server, client) = mock_gateway().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let Err(Error::Gateway { status, code, .. }) = client.update_detector("D1", false).await
    else {
        panic!("expected a gateway rejection");
    };

    assert_eq!(status, 500);
    assert!(code.is_none());
}

#[tokio::test]
async fn test_503_counts_as_transient() {
    let (server, client) = mock_gateway().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.update_detector("D1", true).await.unwrap_err();
    assert!(err.is_transient());
}
