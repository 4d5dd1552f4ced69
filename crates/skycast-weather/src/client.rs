//! OpenWeatherMap REST client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use skycast_core::ProviderConfig;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{AirPollutionResponse, Coordinates, ForecastSeries, WeatherSnapshot};

const WEATHER_ENDPOINT: &str = "/weather";
const FORECAST_ENDPOINT: &str = "/forecast";
const AIR_POLLUTION_ENDPOINT: &str = "/air_pollution";

pub const CURRENT_BY_CITY_ERROR: &str = "Không thể lấy dữ liệu thời tiết hiện tại";
pub const CURRENT_BY_COORDS_ERROR: &str = "Không thể lấy dữ liệu thời tiết hiện tại theo tọa độ";
pub const FORECAST_BY_CITY_ERROR: &str = "Không thể lấy dự báo thời tiết";
pub const FORECAST_BY_COORDS_ERROR: &str = "Không thể lấy dự báo thời tiết theo tọa độ";
pub const AIR_QUALITY_ERROR: &str = "Không thể lấy dữ liệu chất lượng không khí";
pub const AIR_QUALITY_INVALID_ERROR: &str =
    "Dữ liệu chất lượng không khí không hợp lệ hoặc không tìm thấy.";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub units: String,
    pub language: String,
    pub timeout: Option<Duration>,
}

impl From<&ProviderConfig> for ClientConfig {
    fn from(provider: &ProviderConfig) -> Self {
        Self {
            base_url: provider.base_url.clone(),
            api_key: provider.api_key.clone(),
            units: provider.units.clone(),
            language: provider.language.clone(),
            timeout: provider.timeout(),
        }
    }
}

impl ClientConfig {
    /// Metric units and Vietnamese descriptions against `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::from(&ProviderConfig {
            base_url: base_url.to_string(),
            ..ProviderConfig::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    default_params: Vec<(&'static str, String)>,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| WeatherError::Api {
            status: None,
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        let mut default_params = Vec::with_capacity(3);
        if let Some(key) = config.api_key.filter(|k| !k.is_empty()) {
            default_params.push(("appid", key));
        }
        default_params.push(("units", config.units));
        default_params.push(("lang", config.language));

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_params,
        })
    }

    pub fn from_config(provider: &ProviderConfig) -> Result<Self, WeatherError> {
        Self::new(ClientConfig::from(provider))
    }

    /// Current conditions for a city name.
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.get_json(WEATHER_ENDPOINT, &city_params(city), CURRENT_BY_CITY_ERROR)
            .await
    }

    /// Current conditions at a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.get_json(WEATHER_ENDPOINT, &coord_params(coords), CURRENT_BY_COORDS_ERROR)
            .await
    }

    /// 5-day / 3-hour forecast for a city name.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_by_city(&self, city: &str) -> Result<ForecastSeries, WeatherError> {
        self.get_json(FORECAST_ENDPOINT, &city_params(city), FORECAST_BY_CITY_ERROR)
            .await
    }

    /// 5-day / 3-hour forecast at a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<ForecastSeries, WeatherError> {
        self.get_json(FORECAST_ENDPOINT, &coord_params(coords), FORECAST_BY_COORDS_ERROR)
            .await
    }

    /// Raw AQI (`list[0].main.aqi`) at a coordinate pair.
    ///
    /// A response without that field is `InvalidData`, never a guessed value.
    #[instrument(skip(self), level = "info")]
    pub async fn air_quality_by_coords(&self, coords: Coordinates) -> Result<i64, WeatherError> {
        let response: AirPollutionResponse = self
            .get_json(AIR_POLLUTION_ENDPOINT, &coord_params(coords), AIR_QUALITY_ERROR)
            .await?;

        response.first_aqi().ok_or_else(|| {
            tracing::warn!("Air pollution response missing list[0].main.aqi");
            WeatherError::InvalidData(AIR_QUALITY_INVALID_ERROR.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
        default_message: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&self.default_params)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Request to {} failed: {}", endpoint, e);
                WeatherError::Api {
                    status: None,
                    message: default_message.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_message(&body).unwrap_or_else(|| default_message.to_string());
            tracing::warn!("{} returned {}: {}", endpoint, status, message);
            return Err(WeatherError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to decode {} response: {}", endpoint, e);
            WeatherError::Api {
                status: Some(status.as_u16()),
                message: default_message.to_string(),
            }
        })
    }
}

fn city_params(city: &str) -> Vec<(&'static str, String)> {
    vec![("q", city.to_string())]
}

fn coord_params(coords: Coordinates) -> Vec<(&'static str, String)> {
    vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
}

/// The provider's `message` field from an error body, if any.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        let mut config = ClientConfig::with_base_url(&server.uri());
        config.api_key = Some("test-key".to_string());
        WeatherClient::new(config).unwrap()
    }

    fn snapshot_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": 105.84, "lat": 21.02},
            "weather": [{"id": 800, "main": "Clear", "description": "bầu trời quang đãng", "icon": "01d"}],
            "main": {"temp": 30.2, "feels_like": 33.0, "temp_min": 29.0, "temp_max": 31.0,
                     "pressure": 1008, "humidity": 70},
            "wind": {"speed": 2.5},
            "sys": {"country": "VN", "sunrise": 1_717_280_000, "sunset": 1_717_327_000},
            "timezone": 25200,
            "name": name
        })
    }

    #[tokio::test]
    async fn test_current_by_city_sends_default_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Hanoi"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "vi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("Hanoi")))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server).current_by_city("Hanoi").await.unwrap();
        assert_eq!(snapshot.name, "Hanoi");
        assert_eq!(snapshot.description(), "bầu trời quang đãng");
    }

    #[tokio::test]
    async fn test_current_by_coords() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "21.02"))
            .and(query_param("lon", "105.84"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("Hà Nội")))
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .current_by_coords(Coordinates::new(21.02, 105.84))
            .await
            .unwrap();
        assert_eq!(snapshot.name, "Hà Nội");
    }

    #[tokio::test]
    async fn test_provider_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).current_by_city("Atlantis").await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::Api {
                status: Some(404),
                message: "city not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_default_message_without_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let by_city = client.forecast_by_city("Hanoi").await.unwrap_err();
        assert_eq!(by_city.user_message(), FORECAST_BY_CITY_ERROR);

        let by_coords = client
            .forecast_by_coords(Coordinates::new(1.0, 2.0))
            .await
            .unwrap_err();
        assert_eq!(by_coords.user_message(), FORECAST_BY_COORDS_ERROR);
        assert_eq!(by_coords.status(), Some(502));
    }

    #[tokio::test]
    async fn test_transport_failure_uses_default_message() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = WeatherClient::new(ClientConfig::with_base_url(&uri)).unwrap();
        let err = client.current_by_city("Hanoi").await.unwrap_err();

        assert_eq!(
            err,
            WeatherError::Api {
                status: None,
                message: CURRENT_BY_CITY_ERROR.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_forecast_by_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Tokyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": "200",
                "cnt": 2,
                "list": [
                    {"dt": 1_717_300_800, "main": {"temp": 22.0, "temp_min": 21.0, "temp_max": 23.0},
                     "weather": [{"id": 500, "description": "light rain", "icon": "10d"}]},
                    {"dt": 1_717_311_600, "main": {"temp": 20.0, "temp_min": 19.5, "temp_max": 20.5},
                     "weather": [{"id": 804, "description": "overcast clouds", "icon": "04n"}]}
                ],
                "city": {"name": "Tokyo", "country": "JP", "timezone": 32400}
            })))
            .mount(&server)
            .await;

        let series = client_for(&server).forecast_by_city("Tokyo").await.unwrap();
        assert_eq!(series.list.len(), 2);
        assert_eq!(series.city.country, "JP");
        assert_eq!(series.list[1].description(), "overcast clouds");
    }

    #[tokio::test]
    async fn test_air_quality_value() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .and(query_param("lat", "35.68"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coord": {"lon": 139.69, "lat": 35.68},
                "list": [{"main": {"aqi": 3}, "components": {"pm2_5": 21.4}, "dt": 1_717_300_000}]
            })))
            .mount(&server)
            .await;

        let aqi = client_for(&server)
            .air_quality_by_coords(Coordinates::new(35.68, 139.69))
            .await
            .unwrap();
        assert_eq!(aqi, 3);
    }

    #[tokio::test]
    async fn test_air_quality_invalid_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .air_quality_by_coords(Coordinates::new(35.68, 139.69))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WeatherError::InvalidData(AIR_QUALITY_INVALID_ERROR.to_string())
        );
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).current_by_city("Hanoi").await.unwrap_err();
        assert_eq!(err.user_message(), CURRENT_BY_CITY_ERROR);
    }

    #[test]
    fn test_provider_message_parsing() {
        assert_eq!(
            provider_message(r#"{"cod":401,"message":"Invalid API key"}"#).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(provider_message(r#"{"message":"  "}"#), None);
        assert_eq!(provider_message("gateway timeout"), None);
    }
}
