//! Product Provisioning
//!
//! Creates the products the provider does not have yet. Sequential, one
//! request at a time, with a fixed pause after every creation attempt.

use std::collections::HashSet;
use std::time::Duration;

use crate::products::{format_cents, ProductApi, ProductDefinition};

/// Pause between creation requests
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Outcome counts of a provisioning run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProvisionSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for ProvisionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Product Creation Results:")?;
        writeln!(f, "   Created: {}", self.created)?;
        writeln!(f, "   Skipped: {}", self.skipped)?;
        write!(f, "   Failed: {}", self.failed)
    }
}

pub struct Provisioner<A: ProductApi> {
    api: A,
    delay: Duration,
}

impl<A: ProductApi> Provisioner<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Ids already present remotely. A failed listing counts as empty.
    async fn existing_ids(&self) -> HashSet<String> {
        match self.api.list_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Found existing products");
                for product in &products {
                    tracing::info!(
                        id = product.identifier().unwrap_or("?"),
                        product_name = product.name.as_deref().unwrap_or(""),
                        price = %product.price_cents().map_or_else(|| "N/A".into(), format_cents),
                        "Existing product"
                    );
                }
                products
                    .iter()
                    .filter_map(|p| p.identifier().map(str::to_owned))
                    .collect()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list products");
                HashSet::new()
            }
        }
    }

    /// Create every definition missing remotely
    pub async fn run(&self, catalog: &[ProductDefinition]) -> ProvisionSummary {
        let existing = self.existing_ids().await;
        let mut summary = ProvisionSummary::default();

        for definition in catalog {
            if existing.contains(&definition.id) {
                tracing::info!(id = %definition.id, product_name = %definition.name, "Product already exists, skipping");
                summary.skipped += 1;
                continue;
            }

            tracing::info!(product_name = %definition.name, "Creating product");
            match self.api.create_product(definition).await {
                Ok(product) => {
                    tracing::info!(
                        product_id = product.identifier().unwrap_or("?"),
                        product_name = product.name.as_deref().unwrap_or(&definition.name),
                        price = %format_cents(product.price_cents().unwrap_or(definition.price.price)),
                        "Product created"
                    );
                    summary.created += 1;
                }
                Err(e) => {
                    tracing::error!(id = %definition.id, status = ?e.status(), error = %e, "Failed to create product");
                    summary.failed += 1;
                }
            }

            tokio::time::sleep(self.delay).await;
        }

        summary
    }
}
