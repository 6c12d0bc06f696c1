//! # luceta-payments
//!
//! Dodo Payments integration for the Luceta audio platform.
//!
//! ## Hosted Checkout
//!
//! **Flow:** pricing page → provider-hosted checkout → back to `return_url`
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │   Luceta    │────▶│  Dodo Payments  │────▶│   Luceta    │
//! │  (pricing)  │     │  Checkout Page  │     │  (success)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! Two ways in:
//!
//! - [`DodoPaymentsClient::create_checkout_session`] for a cart of products
//! - [`DodoPaymentsClient::create_payment_link`] for a single product
//!
//! Both make exactly one request and never retry.
//!
//! ## Provisioning
//!
//! [`Provisioner`] makes sure the provider knows every product in
//! [`provisioning_catalog`], skipping ones that already exist. It is driven by
//! the `create-products` binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use luceta_payments::{CheckoutRequest, Customer, DodoConfig, DodoPaymentsClient};
//!
//! let client = DodoPaymentsClient::new(DodoConfig::from_env()?);
//!
//! let session = client.create_checkout_session(CheckoutRequest::single(
//!     "pdt_0NUtoiR120tOcI7kvVYM3",
//!     1,
//!     Customer { email: "user@example.com".into(), name: "User".into(), phone_number: None },
//!     "https://luceta.audio/success",
//! )).await?;
//!
//! // Redirect user to: session.checkout_url
//! ```

pub mod catalog;
mod checkout;
mod config;
mod error;
mod products;
mod provision;

pub use catalog::{AudioProduct, Category, PlanType, LUCETA_PRODUCTS};
pub use checkout::{
    BillingAddress, CartItem, CheckoutRequest, Customer, DodoPaymentsClient, PaymentLinkRequest,
    PaymentResult,
};
pub use config::{
    DodoConfig, Environment, API_KEY_VAR, BASE_URL_VAR, ENVIRONMENT_VAR, RETURN_URL_VAR,
};
pub use error::{PaymentError, Result};
pub use products::{
    format_cents, provisioning_catalog, PriceSpec, ProductApi, ProductDefinition, RemoteProduct,
};
pub use provision::{ProvisionSummary, Provisioner, DEFAULT_DELAY};
