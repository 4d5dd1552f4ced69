//! End-to-end query switching against a mock provider.
//!
//! A slow response for an abandoned search must never replace the result
//! of the search selected after it.

use std::time::Duration;

use skycast_ui::{SearchRequest, WeatherApp};
use skycast_weather::{ClientConfig, Coordinates, RetryPolicy, WeatherClient, WeatherQueries};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn snapshot(name: &str, country: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "coord": { "lat": lat, "lon": lon },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 25.0, "feels_like": 26.0, "humidity": 60, "pressure": 1010 },
        "wind": { "speed": 2.0 },
        "sys": { "country": country, "sunrise": 1_700_000_000, "sunset": 1_700_040_000 },
        "timezone": 0
    })
}

fn app(server: &MockServer) -> WeatherApp {
    let client = WeatherClient::new(ClientConfig::with_base_url(&server.uri())).unwrap();
    WeatherApp::new(WeatherQueries::with_policies(
        client,
        Duration::from_secs(300),
        RetryPolicy::immediate(2),
        RetryPolicy::immediate(1),
    ))
}

async fn mount_city(server: &MockServer, city: &str, body: serde_json::Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })))
        .mount(server)
        .await;
}

async fn mount_air_quality(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [{ "main": { "aqi": 1 } }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_later_city_wins_over_slow_earlier_city() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Hanoi",
        snapshot("Hanoi", "VN", 21.02, 105.84),
        Duration::from_millis(500),
    )
    .await;
    mount_city(
        &server,
        "Tokyo",
        snapshot("Tokyo", "JP", 35.68, 139.69),
        Duration::ZERO,
    )
    .await;
    mount_air_quality(&server).await;
    let app = app(&server);

    app.select(SearchRequest::City("Hanoi".into()));
    let hanoi = {
        let app = app.clone();
        tokio::spawn(async move { app.refresh().await })
    };

    // Give the Hanoi request time to go out
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(app.view().loading);

    app.select(SearchRequest::City("Tokyo".into()));
    let view = app.refresh().await;
    assert_eq!(view.weather.as_ref().unwrap().name, "Tokyo");

    // Hanoi resolves after Tokyo; the screen still shows Tokyo
    let late = hanoi.await.unwrap();
    assert_eq!(late.weather.unwrap().name, "Tokyo");
    let view = app.view();
    assert_eq!(view.weather.unwrap().name, "Tokyo");
    assert!(!view.loading);

    // Hanoi's result is cached under its own key for a later switch back
    app.select(SearchRequest::City("Hanoi".into()));
    assert_eq!(app.view().weather.unwrap().name, "Hanoi");
}

#[tokio::test]
async fn test_location_after_city_search_shows_location() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Hanoi",
        snapshot("Hanoi", "VN", 21.02, 105.84),
        Duration::from_millis(300),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot("Paris", "FR", 48.85, 2.35)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })))
        .mount(&server)
        .await;
    mount_air_quality(&server).await;
    let app = app(&server);

    app.select(SearchRequest::City("Hanoi".into()));
    let hanoi = {
        let app = app.clone();
        tokio::spawn(async move { app.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    app.select(SearchRequest::Coords(Coordinates::new(48.85, 2.35)));
    app.refresh().await;
    hanoi.await.unwrap();

    let view = app.view();
    assert_eq!(view.weather.unwrap().name, "Paris");
    assert_eq!(view.aqi, Some(1));
    assert!(app.active().city().is_none());
}
