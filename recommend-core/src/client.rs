use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::{
    Config,
    error::FormError,
    model::{
        ErrorBody, ProductRecommendation, Recommendation, RecommendRequest, TripRecommendation,
        Variant,
    },
};

const JSON: &str = "application/json";

#[async_trait]
pub trait RecommendClient: Send + Sync + Debug {
    /// Send one request and decode the response shape matching the request's variant.
    async fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, FormError>;
}

#[derive(Debug, Clone)]
pub struct HttpRecommendClient {
    endpoint: Url,
    http: Client,
}

impl HttpRecommendClient {
    /// `endpoint` is the full `/recommend` URL.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, request: &RecommendRequest) -> Result<String, FormError> {
        let variant = request.variant();
        let mut req = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, JSON);
        if variant == Variant::Trip {
            req = req.header(ACCEPT, JSON);
        }

        tracing::debug!(%variant, endpoint = %self.endpoint, "sending recommendation request");

        let res = req.json(request).send().await.map_err(|err| {
            tracing::error!(error = %err, "failed to send recommendation request");
            FormError::fallback()
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            tracing::error!(
                %status,
                error = %err,
                "failed to read recommendation response body"
            );
            FormError::fallback()
        })?;

        tracing::debug!(%status, bytes = body.len(), "recommendation response received");

        if !status.is_success() {
            let error = error_from_body(&body);
            tracing::error!(
                %status,
                body = %truncate_body(&body),
                "recommendation request rejected"
            );
            return Err(error);
        }

        Ok(body)
    }
}

#[async_trait]
impl RecommendClient for HttpRecommendClient {
    async fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, FormError> {
        let body = self.post(request).await?;

        match request.variant() {
            Variant::Products => {
                decode::<ProductRecommendation>(&body).map(Recommendation::Products)
            }
            Variant::Trip => decode::<TripRecommendation>(&body).map(Recommendation::Trip),
        }
    }
}

/// Construct the HTTP client from the configured endpoint and timeout.
pub fn client_from_config(config: &Config) -> anyhow::Result<Box<dyn RecommendClient>> {
    let client = HttpRecommendClient::new(config.endpoint_url()?, Some(config.timeout()))?;
    tracing::debug!(endpoint = %client.endpoint(), "recommendation client ready");
    Ok(Box::new(client))
}

/// Server-provided `detail`, or the fallback when the body carries no usable message.
fn error_from_body(body: &str) -> FormError {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
        .map_or_else(FormError::fallback, FormError::Request)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FormError> {
    serde_json::from_str(body).map_err(|err| {
        tracing::error!(
            error = %err,
            body = %truncate_body(body),
            "failed to parse recommendation JSON"
        );
        FormError::fallback()
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FALLBACK_MESSAGE;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpRecommendClient {
        let endpoint = Url::parse(&format!("{}/recommend", server.uri())).unwrap();
        HttpRecommendClient::new(endpoint, Some(Duration::from_secs(5)))
            .unwrap()
    }

    fn products_request() -> RecommendRequest {
        RecommendRequest::Products {
            user_prompt: "rain gear".into(),
        }
    }

    async fn error_for(template: ResponseTemplate) -> FormError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .recommend(&products_request())
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn products_request_posts_prompt_and_decodes_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .and(header("content-type", JSON))
            .and(body_json(json!({ "user_prompt": "rain gear" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text_recommendations": "Get an umbrella",
                "products": [{
                    "title": "Umbrella", "brand": "Acme", "price": 9.99, "stock": 12,
                    "rating": 4.6, "description": "Compact", "thumbnail": "https://x/u.png"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rec = client_for(&server)
            .await
            .recommend(&products_request())
            .await
            .unwrap();
        match rec {
            Recommendation::Products(p) => {
                assert_eq!(p.text_recommendations.as_deref(), Some("Get an umbrella"));
                assert_eq!(p.products.len(), 1);
                assert_eq!(p.products[0].title, "Umbrella");
            }
            other => panic!("unexpected recommendation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn trip_request_sends_accept_header_and_decodes_weather() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .and(header("accept", JSON))
            .and(body_json(json!({
                "user_prompt": "what to pack", "location": "Oslo", "date": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recommendations": "Bring a coat",
                "location": "Oslo",
                "season": "winter",
                "weather": {
                    "temperature": -3.0, "feels_like": -8.5, "conditions": "Snow",
                    "description": "Snow", "humidity": 80, "wind_speed": 14.4,
                    "uv_index": 0.0, "is_day": false, "precipitation": 1.2
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RecommendRequest::Trip {
            user_prompt: "what to pack".into(),
            location: "Oslo".into(),
            date: None,
        };
        let rec = client_for(&server)
            .await
            .recommend(&request)
            .await
            .unwrap();
        match rec {
            Recommendation::Trip(t) => {
                assert_eq!(t.season, "winter");
                assert!(t.weather.is_available());
                assert_eq!(t.weather.is_day, Some(false));
            }
            other => panic!("unexpected recommendation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_surfaces_server_detail() {
        let template = ResponseTemplate::new(500)
            .set_body_json(json!({ "detail": "model overloaded" }));
        let err = error_for(template).await;
        assert_eq!(err, FormError::Request("model overloaded".into()));
    }

    #[tokio::test]
    async fn error_status_with_unparseable_body_uses_fallback() {
        let template = ResponseTemplate::new(502)
            .set_body_string("<html>Bad Gateway</html>");
        let err = error_for(template).await;
        assert_eq!(err.message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn error_status_without_detail_uses_fallback() {
        let template = ResponseTemplate::new(422)
            .set_body_json(json!({ "message": "nope" }));
        let err = error_for(template).await;
        assert_eq!(err, FormError::fallback());
    }

    #[tokio::test]
    async fn error_status_with_blank_detail_uses_fallback() {
        for detail in ["", "   "] {
            let template = ResponseTemplate::new(500)
                .set_body_json(json!({ "detail": detail }));
            let err = error_for(template).await;
            assert_eq!(err, FormError::fallback());
            assert_eq!(err.message(), FALLBACK_MESSAGE);
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .recommend(&products_request())
            .await
            .unwrap_err();
        assert_eq!(err, FormError::fallback());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_request_error() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        drop(server);

        let err = client.recommend(&products_request()).await.unwrap_err();
        assert_eq!(err, FormError::fallback());
    }

    #[test]
    fn client_from_config_uses_endpoint() {
        let mut cfg = Config::default();
        cfg.set_base_url("http://127.0.0.1:9").unwrap();
        assert!(client_from_config(&cfg).is_ok());

        let client = HttpRecommendClient::new(cfg.endpoint_url().unwrap(), None)
            .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9/recommend");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
        assert_eq!(truncate_body("ok"), "ok");
    }
}
