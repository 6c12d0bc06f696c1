//! Dodo Payments Checkout Integration
//!
//! Hosted checkout: the provider returns a URL, the browser is redirected
//! there, and the provider sends the customer back to `return_url`.

use std::collections::BTreeMap;

use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::config::DodoConfig;
use crate::error::{PaymentError, Result};

/// Metadata attached to every checkout; caller keys win on conflict
const PLATFORM_METADATA: [(&str, &str); 2] = [("platform", "luceta-audio"), ("source", "web_app")];

/// Dodo Payments REST client
#[derive(Clone, Debug)]
pub struct DodoPaymentsClient {
    http: reqwest::Client,
    config: DodoConfig,
}

impl DodoPaymentsClient {
    /// Create a new client
    pub fn new(config: DodoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        DodoConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &DodoConfig {
        &self.config
    }

    /// Authenticated request against the configured API root
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url(), path);
        self.http
            .request(method, url)
            .bearer_auth(&self.config.bearer_token)
    }

    /// Create a cart-based checkout session
    ///
    /// Returns a URL to redirect the user to the provider's hosted checkout page.
    pub async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<PaymentResult> {
        self.send_checkout_session(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Dodo Payments checkout session error"))
    }

    async fn send_checkout_session(&self, mut request: CheckoutRequest) -> Result<PaymentResult> {
        request.metadata = with_platform_metadata(std::mem::take(&mut request.metadata));

        let response = self
            .request(Method::POST, "/checkouts")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = provider_message(response).await;
            return Err(PaymentError::Session { status, message });
        }

        let body = response.bytes().await?;
        let session: PaymentResult = serde_json::from_slice(&body)?;
        tracing::info!(session_id = %session.session_id, "Created checkout session");
        Ok(session)
    }

    /// Create a payment link for a single product
    pub async fn create_payment_link(&self, request: PaymentLinkRequest) -> Result<PaymentResult> {
        self.send_payment_link(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Dodo Payments payment link error"))
    }

    async fn send_payment_link(&self, request: PaymentLinkRequest) -> Result<PaymentResult> {
        let body = PaymentLinkBody {
            payment_link: true,
            billing: request.billing_address.as_ref().map(Billing::from),
            customer: &request.customer,
            product_cart: vec![CartItem {
                product_id: request.product_id.clone(),
                quantity: request.quantity.unwrap_or(1),
            }],
            return_url: &request.return_url,
            metadata: with_platform_metadata(request.metadata.clone()),
        };

        let response = self
            .request(Method::POST, "/payments")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = provider_message(response).await;
            return Err(PaymentError::Link { status, message });
        }

        let bytes = response.bytes().await?;
        let link: PaymentLinkResponse = serde_json::from_slice(&bytes)?;
        tracing::info!(payment_id = %link.payment_id, "Created payment link");

        Ok(PaymentResult {
            checkout_url: link.payment_link,
            session_id: link.payment_id.clone(),
            payment_id: Some(link.payment_id),
        })
    }
}

/// Best-effort extraction of the provider's error message
pub(crate) async fn provider_message(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("message")?.as_str().map(str::to_owned)
}

fn with_platform_metadata(extra: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut metadata: BTreeMap<String, String> = PLATFORM_METADATA
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    metadata.extend(extra);
    metadata
}

/// One line of a checkout cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Customer details forwarded to the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub product_cart: Vec<CartItem>,

    pub customer: Customer,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,

    /// URL to redirect after payment
    pub return_url: String,

    /// Extra metadata, merged over the platform defaults
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutRequest {
    /// Cart with a single product
    pub fn single(
        product_id: impl Into<String>,
        quantity: u32,
        customer: Customer,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            product_cart: vec![CartItem {
                product_id: product_id.into(),
                quantity,
            }],
            customer,
            billing_address: None,
            return_url: return_url.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Request to create a payment link for one product
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentLinkRequest {
    pub product_id: String,

    /// Defaults to 1
    #[serde(default)]
    pub quantity: Option<u32>,

    pub customer: Customer,

    #[serde(default)]
    pub billing_address: Option<BillingAddress>,

    pub return_url: String,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Normalized provider response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// URL to redirect user to
    pub checkout_url: String,

    pub session_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

#[derive(Serialize)]
struct PaymentLinkBody<'a> {
    payment_link: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    billing: Option<Billing<'a>>,
    customer: &'a Customer,
    product_cart: Vec<CartItem>,
    return_url: &'a str,
    metadata: BTreeMap<String, String>,
}

/// Billing block of `POST /payments`; the provider wants a numeric zipcode
#[derive(Serialize)]
struct Billing<'a> {
    city: &'a str,
    country: &'a str,
    state: &'a str,
    street: &'a str,
    zipcode: Option<u64>,
}

impl<'a> From<&'a BillingAddress> for Billing<'a> {
    fn from(address: &'a BillingAddress) -> Self {
        Self {
            city: &address.city,
            country: &address.country,
            state: &address.state,
            street: &address.street,
            zipcode: leading_integer(&address.zipcode),
        }
    }
}

/// Integer value of the leading digits, e.g. "94107-1234" -> 94107.
///
/// Signs are not accepted and a digit run that overflows `u64` yields
/// `None`; neither is a valid postal code, and the provider receives `null`.
fn leading_integer(s: &str) -> Option<u64> {
    let trimmed = s.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let value = trimmed[..end].parse().ok();
    if value.is_none() && !trimmed.is_empty() {
        tracing::debug!(zipcode = s, "Zipcode has no usable leading integer, sending null");
    }
    value
}

#[derive(Deserialize)]
struct PaymentLinkResponse {
    payment_link: String,
    payment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DodoPaymentsClient {
        DodoPaymentsClient::new(DodoConfig::new("test_key", Environment::TestMode).with_base_url(server.uri()))
    }

    fn customer() -> Customer {
        Customer {
            email: "customer@luceta.audio".into(),
            name: "Luceta Customer".into(),
            phone_number: None,
        }
    }

    fn link_request() -> PaymentLinkRequest {
        PaymentLinkRequest {
            product_id: "pdt_starter".into(),
            quantity: None,
            customer: customer(),
            billing_address: None,
            return_url: "https://luceta.audio/success".into(),
            metadata: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_checkout_session_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .and(header("authorization", "Bearer test_key"))
            .and(body_partial_json(json!({
                "product_cart": [{"product_id": "pdt_starter", "quantity": 1}],
                "return_url": "https://luceta.audio/success",
                "metadata": {"platform": "luceta-audio", "source": "web_app"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "checkout_url": "https://checkout.dodopayments.com/cs_1",
                "session_id": "cs_1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CheckoutRequest::single("pdt_starter", 1, customer(), "https://luceta.audio/success");
        let result = client(&server).create_checkout_session(request).await.unwrap();

        assert!(!result.checkout_url.is_empty());
        assert_eq!(result.session_id, "cs_1");
        assert_eq!(result.payment_id, None);
    }

    #[tokio::test]
    async fn test_checkout_session_caller_metadata_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .and(body_partial_json(json!({
                "metadata": {"platform": "luceta-audio", "source": "pricing", "plan_type": "yearly"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "checkout_url": "https://x",
                "session_id": "cs_2",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = CheckoutRequest::single("pdt_pro", 1, customer(), "https://luceta.audio/success");
        request.metadata.insert("source".into(), "pricing".into());
        request.metadata.insert("plan_type".into(), "yearly".into());

        client(&server).create_checkout_session(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_checkout_session_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "product not found"})))
            .mount(&server)
            .await;

        let request = CheckoutRequest::single("missing", 1, customer(), "https://luceta.audio/success");
        let err = client(&server).create_checkout_session(request).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.provider_message(), Some("product not found"));
        assert!(matches!(err, PaymentError::Session { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_checkout_session_unparseable_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let request = CheckoutRequest::single("pdt_starter", 1, customer(), "https://luceta.audio/success");
        let err = client(&server).create_checkout_session(request).await.unwrap_err();

        assert!(matches!(err, PaymentError::Session { status: 500, message: None }));
    }

    #[tokio::test]
    async fn test_payment_link_maps_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments"))
            .and(header("authorization", "Bearer test_key"))
            .and(body_partial_json(json!({
                "payment_link": true,
                "product_cart": [{"product_id": "pdt_starter", "quantity": 1}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_link": "https://x",
                "payment_id": "p1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).create_payment_link(link_request()).await.unwrap();

        assert_eq!(
            result,
            PaymentResult {
                checkout_url: "https://x".into(),
                session_id: "p1".into(),
                payment_id: Some("p1".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_payment_link_sends_numeric_zipcode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments"))
            .and(body_partial_json(json!({
                "billing": {"city": "San Francisco", "zipcode": 94107},
                "product_cart": [{"product_id": "pdt_starter", "quantity": 3}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_link": "https://x",
                "payment_id": "p2",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = link_request();
        request.quantity = Some(3);
        request.billing_address = Some(BillingAddress {
            street: "1 Market St".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            country: "US".into(),
            zipcode: "94107-1234".into(),
        });

        client(&server).create_payment_link(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_link_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad token"})))
            .mount(&server)
            .await;

        let err = client(&server).create_payment_link(link_request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Link { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_checkout_session_unreachable_host() {
        // Bind then drop so nothing listens on the port
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let client = DodoPaymentsClient::new(
            DodoConfig::new("test_key", Environment::TestMode).with_base_url(format!("http://{addr}")),
        );

        let request = CheckoutRequest::single("pdt_starter", 1, customer(), "https://luceta.audio/success");
        let err = client.create_checkout_session(request).await.unwrap_err();

        assert!(matches!(err, PaymentError::Http(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("02134"), Some(2134));
        assert_eq!(leading_integer("94107-1234"), Some(94107));
        assert_eq!(leading_integer("SW1A 1AA"), None);
        assert_eq!(leading_integer("-94107"), None);
        assert_eq!(leading_integer("123456789012345678901234"), None);
    }

    #[test]
    fn test_platform_metadata_defaults() {
        let metadata = with_platform_metadata(BTreeMap::new());
        assert_eq!(metadata["platform"], "luceta-audio");
        assert_eq!(metadata["source"], "web_app");
    }
}
