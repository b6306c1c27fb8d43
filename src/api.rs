//! OpenWeatherMap current-weather client

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::state::{IconRef, WeatherResult};

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
pub const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Value of `cod` meaning no city matched the query
pub const NOT_FOUND_CODE: &str = "404";

#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected weather payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// What a single search produced
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found(WeatherResult),
    NotFound,
}

// ============================================================================
// Payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainReading,
    wind: Wind,
    name: String,
    sys: Sys,
    coord: Coord,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    #[serde(default)]
    icon: String,
}

fn is_not_found(cod: Option<&Value>) -> bool {
    match cod {
        Some(Value::String(code)) => code == NOT_FOUND_CODE,
        Some(Value::Number(code)) => code.as_u64() == Some(404),
        _ => false,
    }
}

/// Icon reference for a provider icon code, or the bundled icon if empty
pub fn icon_ref(code: &str) -> IconRef {
    if code.is_empty() {
        IconRef::Bundled
    } else {
        IconRef::Url(format!("{ICON_BASE}/{code}@2x.png"))
    }
}

/// Map a response body onto a [`SearchOutcome`].
///
/// The body is inspected for the not-found sentinel before its shape is
/// checked, so an error payload never reaches the field mapping.
pub fn parse_current_weather(body: &str) -> Result<SearchOutcome, WeatherError> {
    let value: Value = serde_json::from_str(body)?;
    if is_not_found(value.get("cod")) {
        return Ok(SearchOutcome::NotFound);
    }

    let data: CurrentWeatherResponse = serde_json::from_value(value)?;
    let condition = data.weather.into_iter().next().ok_or_else(|| {
        <serde_json::Error as serde::de::Error>::custom("empty weather condition list")
    })?;

    Ok(SearchOutcome::Found(WeatherResult {
        icon: icon_ref(&condition.icon),
        icon_code: condition.icon,
        description: condition.description,
        temperature: data.main.temp.floor() as i32,
        city: data.name,
        country: data.sys.country,
        lat: data.coord.lat,
        lon: data.coord.lon,
        humidity: data.main.humidity,
        wind_speed: data.wind.speed,
    }))
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Request URL for `query`. The query is escaped but otherwise untouched.
    pub fn current_weather_url(&self, query: &str) -> String {
        format!(
            "{}/data/2.5/weather?q={}&appid={}&units=Metric",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Fetch current conditions for `query`.
    ///
    /// The HTTP status is not consulted: the provider reports a missing city
    /// in the body, and any other non-weather body fails to parse.
    pub async fn current_weather(&self, query: &str) -> Result<SearchOutcome, WeatherError> {
        let url = self.current_weather_url(query);
        tracing::debug!(%query, "fetching current weather");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "weather response received");

        parse_current_weather(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chennai_payload() -> Value {
        json!({
            "cod": 200,
            "main": { "humidity": 80, "temp": 31.7 },
            "wind": { "speed": 3.1 },
            "name": "Chennai",
            "sys": { "country": "IN" },
            "coord": { "lat": 13.08, "lon": 80.27 },
            "weather": [{ "description": "clear sky", "icon": "01d" }]
        })
    }

    fn found(body: &Value) -> WeatherResult {
        match parse_current_weather(&body.to_string()).unwrap() {
            SearchOutcome::Found(result) => result,
            SearchOutcome::NotFound => panic!("expected a result"),
        }
    }

    #[test]
    fn test_parse_chennai() {
        let result = found(&chennai_payload());

        assert_eq!(result.temperature, 31);
        assert_eq!(result.humidity, 80);
        assert_eq!(result.wind_speed, 3.1);
        assert_eq!(result.city, "Chennai");
        assert_eq!(result.country, "IN");
        assert_eq!(result.lat, 13.08);
        assert_eq!(result.lon, 80.27);
        assert_eq!(result.description, "clear sky");
        assert_eq!(
            result.icon,
            IconRef::Url("https://openweathermap.org/img/wn/01d@2x.png".into())
        );
    }

    #[test]
    fn test_temperature_is_floored() {
        let mut body = chennai_payload();
        body["main"]["temp"] = json!(-2.3);
        assert_eq!(found(&body).temperature, -3);

        body["main"]["temp"] = json!(18.999);
        assert_eq!(found(&body).temperature, 18);
    }

    #[test]
    fn test_not_found_sentinel() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(parse_current_weather(body).unwrap(), SearchOutcome::NotFound);
    }

    #[test]
    fn test_numeric_not_found_sentinel() {
        let body = r#"{"cod":404,"message":"city not found"}"#;
        assert_eq!(parse_current_weather(body).unwrap(), SearchOutcome::NotFound);
    }

    #[test]
    fn test_other_error_code_is_payload_error() {
        let body = r#"{"cod":401,"message":"Invalid API key"}"#;
        assert!(matches!(
            parse_current_weather(body),
            Err(WeatherError::Payload(_))
        ));
    }

    #[test]
    fn test_missing_fields_is_payload_error() {
        let mut body = chennai_payload();
        body.as_object_mut().unwrap().remove("wind");
        assert!(parse_current_weather(&body.to_string()).is_err());
    }

    #[test]
    fn test_empty_condition_list_is_payload_error() {
        let mut body = chennai_payload();
        body["weather"] = json!([]);
        assert!(parse_current_weather(&body.to_string()).is_err());
    }

    #[test]
    fn test_malformed_json_is_payload_error() {
        assert!(matches!(
            parse_current_weather("<html>"),
            Err(WeatherError::Payload(_))
        ));
    }

    #[test]
    fn test_missing_icon_falls_back_to_bundled() {
        let mut body = chennai_payload();
        body["weather"][0].as_object_mut().unwrap().remove("icon");
        assert_eq!(found(&body).icon, IconRef::Bundled);
    }

    #[test]
    fn test_url_passes_query_verbatim_but_escaped() {
        let client = WeatherClient::new("key", "https://example.test/");
        assert_eq!(
            client.current_weather_url(" São Paulo"),
            "https://example.test/data/2.5/weather?q=%20S%C3%A3o%20Paulo&appid=key&units=Metric"
        );
    }

    #[tokio::test]
    async fn test_current_weather_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Chennai"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "Metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chennai_payload()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new("test_key", mock_server.uri());
        let outcome = client.current_weather("Chennai").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found(ref r) if r.temperature == 31));
    }

    #[tokio::test]
    async fn test_current_weather_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new("test_key", mock_server.uri());
        let outcome = client.current_weather("Atlantis").await.unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_current_weather_transport_failure() {
        // Nothing listens on the discard port
        let client = WeatherClient::new("test_key", "http://127.0.0.1:9");
        assert!(matches!(
            client.current_weather("Chennai").await,
            Err(WeatherError::Request(_))
        ));
    }
}
