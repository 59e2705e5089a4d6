//! JSON-over-HTTP client for the geocoding service.
//!
//! ```text
//! POST {api}/api/reverse-geocode  {"lat": .., "lng": ..}  -> GeocodingResult
//! POST {api}/api/geocode          {"address": ".."}       -> GeocodingResult
//! GET  {api}/api/autocomplete?query=..                    -> [AutocompleteResult]
//! ```

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{BackendError, GeocodingBackend};
use crate::config::ApiConfig;
use crate::core::{AutocompleteResult, BoxFuture, GeocodingResult, LatLng};

const USER_AGENT: &str = concat!("pinpoint/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ReverseRequest {
    lat: f64,
    lng: f64,
}

#[derive(Serialize)]
struct GeocodeRequest<'a> {
    address: &'a str,
}

/// Backend reached over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut base = Url::parse(&config.url)
            .with_context(|| format!("invalid api url `{}`", config.url))?;
        // endpoints are joined relative to the base, so keep its path as a directory
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Transport(format!("bad endpoint `{path}`: {e}")))
    }

    async fn reverse(&self, at: LatLng) -> Result<GeocodingResult, BackendError> {
        let url = self.endpoint("api/reverse-geocode")?;
        let body = ReverseRequest {
            lat: at.lat,
            lng: at.lng,
        };
        let result: GeocodingResult = send(self.http.post(url).json(&body)).await?;
        result.validate().map_err(BackendError::InvalidPayload)?;
        Ok(result)
    }

    async fn forward(&self, address: String) -> Result<GeocodingResult, BackendError> {
        let url = self.endpoint("api/geocode")?;
        let body = GeocodeRequest { address: &address };
        let result: GeocodingResult = send(self.http.post(url).json(&body)).await?;
        result.validate().map_err(BackendError::InvalidPayload)?;
        Ok(result)
    }

    async fn suggest(&self, query: String) -> Result<Vec<AutocompleteResult>, BackendError> {
        let url = self.endpoint("api/autocomplete")?;
        let results: Vec<AutocompleteResult> =
            send(self.http.get(url).query(&[("query", query.as_str())])).await?;
        Ok(results
            .into_iter()
            .filter(|r| !r.display_name.trim().is_empty())
            .collect())
    }
}

impl GeocodingBackend for HttpBackend {
    fn reverse_geocode(&self, at: LatLng) -> BoxFuture<'_, Result<GeocodingResult, BackendError>> {
        Box::pin(self.reverse(at))
    }

    fn geocode(&self, address: String) -> BoxFuture<'_, Result<GeocodingResult, BackendError>> {
        Box::pin(self.forward(address))
    }

    fn autocomplete(
        &self,
        query: String,
    ) -> BoxFuture<'_, Result<Vec<AutocompleteResult>, BackendError>> {
        Box::pin(self.suggest(query))
    }
}

/// Send a request and decode a 2xx JSON body.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Transport(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status(status.as_u16()));
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::new(&ApiConfig {
            url: url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base() {
        let backend = backend("http://localhost:4000");
        assert_eq!(
            backend.endpoint("api/geocode").unwrap().as_str(),
            "http://localhost:4000/api/geocode"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        for url in ["https://geo.example.com/v1", "https://geo.example.com/v1/"] {
            let backend = backend(url);
            assert_eq!(
                backend.endpoint("api/geocode").unwrap().as_str(),
                "https://geo.example.com/v1/api/geocode",
                "base {url}"
            );
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            url: "not a url".to_string(),
            timeout_secs: 5,
        };
        assert!(HttpBackend::new(&config).is_err());
    }

    #[test]
    fn test_request_bodies() {
        let reverse = serde_json::to_string(&ReverseRequest {
            lat: 18.5204,
            lng: 73.8567,
        })
        .unwrap();
        assert_eq!(reverse, r#"{"lat":18.5204,"lng":73.8567}"#);

        let forward = serde_json::to_string(&GeocodeRequest { address: "Pune" }).unwrap();
        assert_eq!(forward, r#"{"address":"Pune"}"#);
    }

    // ------------------------------------------------------------------------
    // Against a mock service
    // ------------------------------------------------------------------------

    fn pune() -> serde_json::Value {
        json!({
            "lat": 18.5204,
            "lng": 73.8567,
            "displayName": "Pune Railway Station, Pune, Maharashtra",
            "structured": { "city": "Pune" },
            "source": "cache"
        })
    }

    #[tokio::test]
    async fn test_geocode_under_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/api/geocode"))
            .and(body_json(json!({ "address": "Pune Railway Station" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(pune()))
            .mount(&server)
            .await;

        let backend = backend(&format!("{}/v1", server.uri()));
        let result = backend
            .geocode("Pune Railway Station".to_string())
            .await
            .unwrap();
        assert_eq!(result.display_name, "Pune Railway Station, Pune, Maharashtra");
        assert_eq!(result.source, crate::core::Source::Cache);
    }

    #[tokio::test]
    async fn test_geocode_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/geocode"))
            .and(body_json(json!({ "address": "nowhere" })))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/geocode"))
            .and(body_json(json!({ "address": "Pune" })))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = backend(&server.uri());
        let err = backend.geocode("nowhere".to_string()).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(404)), "{err:?}");
        let err = backend.geocode("Pune".to_string()).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(500)), "{err:?}");
    }

    #[tokio::test]
    async fn test_reverse_geocode_rejects_out_of_range() {
        let server = MockServer::start().await;
        let mut body = pune();
        body["lat"] = json!(91.0);
        Mock::given(method("POST"))
            .and(path("/api/reverse-geocode"))
            .and(body_json(json!({ "lat": 18.5204, "lng": 73.8567 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = backend(&server.uri())
            .reverse_geocode(LatLng::new(18.5204, 73.8567))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidPayload(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_geocode_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/geocode"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = backend(&server.uri())
            .geocode("Pune".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidPayload(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_autocomplete_drops_blank_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/autocomplete"))
            .and(query_param("query", "Pun"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "displayName": "Pune, Maharashtra", "address": { "city": "Pune" } },
                { "displayName": "  ", "address": {} },
                { "displayName": "Punjab" }
            ])))
            .mount(&server)
            .await;

        let results = backend(&server.uri())
            .autocomplete("Pun".to_string())
            .await
            .unwrap();
        let names: Vec<_> = results.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Pune, Maharashtra", "Punjab"]);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // nothing listens on the discard port
        let err = backend("http://127.0.0.1:9")
            .geocode("Pune".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)), "{err:?}");
    }
}
