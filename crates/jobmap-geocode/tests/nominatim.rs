//! Integration tests for `NominatimClient` using wiremock HTTP mocks.

use jobmap_core::GeoResolver;
use jobmap_geocode::{GeocodeError, NominatimClient, NominatimConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NominatimClient {
    NominatimClient::new(&NominatimConfig {
        base_url: base_url.to_string(),
        user_agent: "jobmap-test/0.1".to_string(),
        timeout_secs: 5,
        min_interval_ms: 0,
        max_retries: 2,
        retry_backoff_base_ms: 0,
    })
    .expect("client construction should not fail")
}

#[tokio::test]
async fn search_returns_parsed_coordinate() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "place_id": 297_417_241,
            "lat": "39.9622601",
            "lon": "-83.0007065",
            "display_name": "Columbus, Franklin County, Ohio, United States",
            "type": "city"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Columbus, OH"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "jobmap-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client
        .resolve("Columbus, OH")
        .await
        .expect("lookup should succeed")
        .expect("should have a match");

    assert!((coordinate.lat - 39.962_260_1).abs() < 1e-9);
    assert!((coordinate.lng + 83.000_706_5).abs() < 1e-9);
}

#[tokio::test]
async fn empty_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("Nowhere In Particular").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn blank_place_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.search("   ").await.unwrap().is_none());
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "lat": "41.08", "lon": "-81.51" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client.search("Akron, OH").await.unwrap().unwrap();
    assert!((coordinate.lat - 41.08).abs() < 1e-9);
}

#[tokio::test]
async fn server_error_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Dayton, OH").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Dayton, OH").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 404, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn invalid_coordinate_text_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "lat": "abc", "lon": "-81.51" }])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Akron, OH").await.unwrap_err();
    assert!(matches!(err, GeocodeError::InvalidCoordinate { .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Akron, OH").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Deserialize { .. }), "got {err:?}");
}
