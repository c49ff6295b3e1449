use httpmock::prelude::*;
use subway_lines::domain::model::LineRequest;
use subway_lines::{AcceptanceSuite, Scenario, SubwayClient, SubwayError};

#[tokio::test]
async fn test_create_line_reports_status_and_location() {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/lines")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "name": "신분당선",
                "color": "bg-red-600",
                "upStationId": 1,
                "downStationId": 2,
                "distance": 10
            }));
        then.status(201)
            .header("Location", "/lines/7")
            .header("Content-Type", "application/json")
            .body("{}");
    });

    let client = SubwayClient::new(&server.base_url()).unwrap();
    let response = client
        .create_line(&LineRequest::new("신분당선", "bg-red-600", 1, 2, 10))
        .await
        .unwrap();

    create_mock.assert();
    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(response.location_id(), Some(7));
}

#[tokio::test]
async fn test_error_statuses_are_returned_not_raised() {
    let server = MockServer::start();
    let missing_mock = server.mock(|when, then| {
        when.method(GET).path("/lines/3");
        then.status(404)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "error": "not_found",
                "message": "Line not found: 3"
            }));
    });

    let client = SubwayClient::new(&server.base_url()).unwrap();
    let response = client.get_line(3).await.unwrap();

    missing_mock.assert();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.error().unwrap().message, "Line not found: 3");

    let err = response.expect_status(200).unwrap_err();
    assert!(matches!(err, SubwayError::ValidationError { .. }));
}

#[tokio::test]
async fn test_lines_page_sends_extra_parameters() {
    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/lines/page")
            .query_param("id", "25")
            .query_param("page", "0")
            .query_param("size", "10");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{}");
    });

    let client = SubwayClient::new(&server.base_url()).unwrap();
    let response = client
        .lines_page(0, 10, &[("id", "25".to_string())])
        .await
        .unwrap();

    page_mock.assert();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // 連接埠 1 通常沒有服務在監聽
    let client = SubwayClient::new("http://127.0.0.1:1").unwrap();
    let err = client.list_lines().await.unwrap_err();

    assert!(matches!(err, SubwayError::HttpError(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_scenario_fails_when_server_misbehaves() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/stations");
        then.status(500).body("boom");
    });

    let client = SubwayClient::new(&server.base_url()).unwrap();
    let suite = AcceptanceSuite::with_run_id(client, "mock");
    let result = suite.run(Scenario::CreateLine).await;

    assert!(!result.passed());
    assert!(result.error.unwrap().contains("expected HTTP 201, got 500"));
}
