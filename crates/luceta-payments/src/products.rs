//! Remote Product Management
//!
//! Product definitions pushed to the provider and the list/create calls
//! used by provisioning.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::checkout::{provider_message, DodoPaymentsClient};
use crate::error::{PaymentError, Result};

/// Price block of a product definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSpec {
    pub currency: String,
    /// Amount in minor units (cents)
    pub price: u64,
    #[serde(rename = "type")]
    pub price_type: String,
    pub discount: u32,
    pub pay_what_you_want: bool,
    pub purchasing_power_parity: bool,
    pub tax_inclusive: bool,
}

impl PriceSpec {
    /// One-time USD price with no discounts
    pub fn one_time_usd(cents: u64) -> Self {
        Self {
            currency: "USD".into(),
            price: cents,
            price_type: "one_time_price".into(),
            discount: 0,
            pay_what_you_want: false,
            purchasing_power_parity: false,
            tax_inclusive: false,
        }
    }
}

/// A product the provisioning tool makes sure exists remotely
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDefinition {
    /// Local id, compared against remote ids to skip duplicates
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: PriceSpec,
    pub tax_category: String,
    pub metadata: BTreeMap<String, String>,
}

impl ProductDefinition {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        cents: u64,
        category: Category,
        features: &str,
    ) -> Self {
        let metadata = BTreeMap::from([
            ("category".to_string(), category.as_str().to_string()),
            ("platform".to_string(), "luceta-audio".to_string()),
            ("features".to_string(), features.to_string()),
        ]);

        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price: PriceSpec::one_time_usd(cents),
            tax_category: "digital_products".into(),
            metadata,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.metadata.get("category").and_then(|c| Category::parse(c))
    }
}

/// Products created by `create-products`
pub fn provisioning_catalog() -> Vec<ProductDefinition> {
    vec![
        ProductDefinition::new(
            "luceta_starter",
            "Starter",
            "Perfect for indie game developers getting started with audio cursor technology. \
             Build locally, sell globally with basic audio experiences.",
            2900,
            Category::Starter,
            "audio-cursor,basic-integration,community-support",
        ),
        ProductDefinition::new(
            "luceta_pro",
            "Pro",
            "Advanced features for professional game studios. Advanced gesture recognition \
             and multi-platform deployment for audio engineering.",
            9900,
            Category::Pro,
            "advanced-gestures,multi-platform,priority-support",
        ),
        ProductDefinition::new(
            "luceta_enterprise",
            "Enterprise",
            "Full-scale solution for large game development teams. Custom audio templates \
             with unlimited experiences and dedicated support.",
            29900,
            Category::Enterprise,
            "custom-templates,unlimited,dedicated-support",
        ),
    ]
}

/// Provider view of a product
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RemoteProduct {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Display only; either `{"price": cents, ...}` or bare cents
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

impl RemoteProduct {
    /// `product_id`, falling back to `id`
    pub fn identifier(&self) -> Option<&str> {
        self.product_id.as_deref().or(self.id.as_deref())
    }

    pub fn price_cents(&self) -> Option<u64> {
        let price = self.price.as_ref()?;
        price
            .get("price")
            .unwrap_or(price)
            .as_u64()
    }
}

/// Format minor units as dollars, e.g. 2900 -> "$29.00"
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Deserialize)]
struct ProductList {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct CreateProductBody<'a> {
    name: &'a str,
    description: &'a str,
    price: &'a PriceSpec,
    tax_category: &'a str,
    metadata: &'a BTreeMap<String, String>,
}

/// Remote product catalog operations
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch every product the provider knows about
    async fn list_products(&self) -> Result<Vec<RemoteProduct>>;

    /// Create one product
    async fn create_product(&self, definition: &ProductDefinition) -> Result<RemoteProduct>;
}

#[async_trait]
impl ProductApi for DodoPaymentsClient {
    async fn list_products(&self) -> Result<Vec<RemoteProduct>> {
        let response = self.request(Method::GET, "/products").send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = provider_message(response).await;
            return Err(PaymentError::Product { status, message });
        }

        let bytes = response.bytes().await?;
        let list: ProductList = serde_json::from_slice(&bytes)?;

        // One malformed entry must not hide the ids of the others
        Ok(list
            .data
            .into_iter()
            .filter_map(|item| {
                serde_json::from_value::<RemoteProduct>(item)
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping unreadable product entry"))
                    .ok()
            })
            .collect())
    }

    async fn create_product(&self, definition: &ProductDefinition) -> Result<RemoteProduct> {
        let body = CreateProductBody {
            name: &definition.name,
            description: &definition.description,
            price: &definition.price,
            tax_category: &definition.tax_category,
            metadata: &definition.metadata,
        };

        let response = self
            .request(Method::POST, "/products")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = provider_message(response).await;
            return Err(PaymentError::Product { status, message });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
