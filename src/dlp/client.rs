//! REST transport for the DLP API.
//!
//! `RestClient` speaks the v2beta1 JSON surface asynchronously. `BlockingClient`
//! owns a Tokio runtime and drives one `RestClient` call at a time, which is
//! what the command layer (via `DlpService`) expects.

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::DlpService;
use super::error::{DlpError, Result};
use super::model::{
    DeidentifyContentRequest, DeidentifyContentResponse, InspectContentRequest,
    InspectContentResponse, ListInfoTypesRequest, ListInfoTypesResponse,
    ListRootCategoriesRequest, ListRootCategoriesResponse, RedactContentRequest,
    RedactContentResponse,
};

pub const DEFAULT_ENDPOINT: &str = "https://dlp.googleapis.com";
const API_VERSION: &str = "v2beta1";

/// Parse and validate a service endpoint (http/https, usable as a base URL).
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DlpError::InvalidEndpoint(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        other => Err(DlpError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme '{other}' (expected http or https)"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl RestClient {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("dlp-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn inspect_content(
        &self,
        req: &InspectContentRequest,
    ) -> Result<InspectContentResponse> {
        self.call(Method::POST, &["content:inspect"], None, Some(req))
            .await
    }

    pub async fn redact_content(&self, req: &RedactContentRequest) -> Result<RedactContentResponse> {
        self.call(Method::POST, &["content:redact"], None, Some(req))
            .await
    }

    pub async fn deidentify_content(
        &self,
        req: &DeidentifyContentRequest,
    ) -> Result<DeidentifyContentResponse> {
        self.call(Method::POST, &["content:deidentify"], None, Some(req))
            .await
    }

    pub async fn list_info_types(&self, req: &ListInfoTypesRequest) -> Result<ListInfoTypesResponse> {
        self.call::<(), _>(
            Method::GET,
            &["rootCategories", req.category.as_str(), "infoTypes"],
            req.language_code.as_deref(),
            None,
        )
        .await
    }

    pub async fn list_root_categories(
        &self,
        req: &ListRootCategoriesRequest,
    ) -> Result<ListRootCategoriesResponse> {
        self.call::<(), _>(
            Method::GET,
            &["rootCategories"],
            req.language_code.as_deref(),
            None,
        )
        .await
    }

    /// `{endpoint}/v2beta1/<segments...>[?languageCode=..]`
    fn route(&self, segments: &[&str], language_code: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| DlpError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        if let Some(lc) = language_code {
            url.query_pairs_mut().append_pair("languageCode", lc);
        }
        Ok(url)
    }

    fn authorize(&self, rb: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        language_code: Option<&str>,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.route(segments, language_code)?;
        debug!(method = method.as_str(), url = url.as_str(), "dlp request");

        let mut rb = self.authorize(self.http.request(method, url));
        if let Some(body) = body {
            rb = rb.json(body);
        }
        decode(rb.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(status = status.as_u16(), bytes = body.len(), "dlp response");

    if !status.is_success() {
        return Err(DlpError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    // Some empty responses come back with no body at all.
    let body = if body.trim().is_empty() { "{}" } else { &body };
    Ok(serde_json::from_str(body)?)
}

/// Pull `error.message` out of a Google API error envelope, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/* ---- Blocking wrapper ---- */

/// Synchronous `DlpService` over a `RestClient`.
///
/// Built once per process; dropping it shuts the runtime down.
pub struct BlockingClient {
    rt: tokio::runtime::Runtime,
    inner: RestClient,
}

impl BlockingClient {
    pub fn new(inner: RestClient) -> Result<Self> {
        let rt = tokio::runtime::Runtime::new()?;
        debug!(endpoint = %inner.endpoint(), "dlp client ready");
        Ok(Self { rt, inner })
    }
}

impl Drop for BlockingClient {
    fn drop(&mut self) {
        debug!("dlp client closed");
    }
}

impl DlpService for BlockingClient {
    fn inspect_content(&self, req: &InspectContentRequest) -> Result<InspectContentResponse> {
        self.rt.block_on(self.inner.inspect_content(req))
    }

    fn redact_content(&self, req: &RedactContentRequest) -> Result<RedactContentResponse> {
        self.rt.block_on(self.inner.redact_content(req))
    }

    fn deidentify_content(
        &self,
        req: &DeidentifyContentRequest,
    ) -> Result<DeidentifyContentResponse> {
        self.rt.block_on(self.inner.deidentify_content(req))
    }

    fn list_info_types(&self, req: &ListInfoTypesRequest) -> Result<ListInfoTypesResponse> {
        self.rt.block_on(self.inner.list_info_types(req))
    }

    fn list_root_categories(
        &self,
        req: &ListRootCategoriesRequest,
    ) -> Result<ListRootCategoriesResponse> {
        self.rt.block_on(self.inner.list_root_categories(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlp::model::{ContentItem, InfoType, InspectConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn inspect_req() -> InspectContentRequest {
        InspectContentRequest {
            inspect_config: InspectConfig {
                info_types: vec![InfoType::named("US_SOCIAL_SECURITY_NUMBER")],
                ..Default::default()
            },
            items: vec![ContentItem::text_plain("123-45-6789")],
        }
    }

    #[test]
    fn endpoint_validation() {
        assert!(parse_endpoint("https://dlp.googleapis.com").is_ok());
        assert!(parse_endpoint("http://127.0.0.1:8080/proxy/").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://example.com"),
            Err(DlpError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(DlpError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn routes_keep_endpoint_prefix_and_colon_verbs() {
        let c = RestClient::new("https://example.com/proxy", None).unwrap();
        let url = c.route(&["content:inspect"], None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/proxy/v2beta1/content:inspect");

        let url = c
            .route(&["rootCategories", "PII", "infoTypes"], Some("en-US"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/proxy/v2beta1/rootCategories/PII/infoTypes?languageCode=en-US"
        );
    }

    #[test]
    fn error_message_prefers_envelope() {
        assert_eq!(
            error_message(r#"{"error":{"code":403,"message":"Permission denied"}}"#),
            "Permission denied"
        );
        assert_eq!(error_message(" boom \n"), "boom");
    }

    #[tokio::test]
    async fn inspect_posts_json_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2beta1/content:inspect"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(json!({
                "inspectConfig": {
                    "infoTypes": [{"name": "US_SOCIAL_SECURITY_NUMBER"}],
                    "minLikelihood": "LIKELIHOOD_UNSPECIFIED"
                },
                "items": [{"type": "text/plain", "data": "MTIzLTQ1LTY3ODk="}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"findings": [{
                    "infoType": {"name": "US_SOCIAL_SECURITY_NUMBER"},
                    "likelihood": "VERY_LIKELY"
                }]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RestClient::new(&server.uri(), Some("tok".into())).unwrap();
        let resp = client.inspect_content(&inspect_req()).await.unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(
            resp.results[0].findings[0].info_type.name,
            "US_SOCIAL_SECURITY_NUMBER"
        );
    }

    #[tokio::test]
    async fn list_info_types_uses_category_path_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2beta1/rootCategories/PII/infoTypes"))
            .and(query_param("languageCode", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "infoTypes": [
                    {"name": "EMAIL_ADDRESS", "displayName": "Email address"},
                    {"name": "PHONE_NUMBER", "displayName": "Phone number"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RestClient::new(&server.uri(), None).unwrap();
        let resp = client
            .list_info_types(&ListInfoTypesRequest {
                category: "PII".into(),
                language_code: Some("en-US".into()),
            })
            .await
            .unwrap();
        let names: Vec<_> = resp.info_types.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["EMAIL_ADDRESS", "PHONE_NUMBER"]);
    }

    #[tokio::test]
    async fn service_errors_map_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2beta1/rootCategories"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let client = RestClient::new(&server.uri(), None).unwrap();
        let err = client
            .list_root_categories(&ListRootCategoriesRequest::default())
            .await
            .unwrap_err();
        match err {
            DlpError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2beta1/content:redact"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = RestClient::new(&server.uri(), None).unwrap();
        let req = RedactContentRequest {
            inspect_config: InspectConfig::default(),
            replace_configs: vec![],
            items: vec![ContentItem::text_plain("x")],
        };
        let err = client.redact_content(&req).await.unwrap_err();
        assert!(matches!(err, DlpError::Decode(_)));
    }

    #[test]
    fn blocking_client_surfaces_transport_errors() {
        // Port 1 is reserved (tcpmux) and not listening in test environments.
        let inner = RestClient::new("http://127.0.0.1:1", None).unwrap();
        let client = BlockingClient::new(inner).unwrap();
        let err = client
            .list_root_categories(&ListRootCategoriesRequest::default())
            .unwrap_err();
        assert!(matches!(err, DlpError::Transport(_)));
    }
}
