//! Product Catalog
//!
//! The three Luceta tiers as shown on the pricing page. Ids are the
//! provider-assigned product ids used at checkout.

use serde::{Deserialize, Serialize};

/// Subscription tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Starter,
    Pro,
    Enterprise,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Starter, Category::Pro, Category::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Starter => "starter",
            Category::Pro => "pro",
            Category::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "starter" => Some(Category::Starter),
            "pro" => Some(Category::Pro),
            "enterprise" => Some(Category::Enterprise),
            _ => None,
        }
    }

    /// Whether a plan at this tier includes a feature gated at `required`
    pub fn unlocks(self, required: Category) -> bool {
        self >= required
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing period selected on the pricing page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Monthly,
    Yearly,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Monthly => "monthly",
            PlanType::Yearly => "yearly",
        }
    }
}

/// Yearly plans are billed as ten months
const YEARLY_MONTHS: u32 = 10;

/// A catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AudioProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Monthly price in whole USD
    pub price: u32,
    pub category: Category,
    pub features: &'static [&'static str],
    pub popular: bool,
}

impl AudioProduct {
    pub fn yearly_price(&self) -> u32 {
        self.price * YEARLY_MONTHS
    }

    pub fn price_for(&self, plan: PlanType) -> u32 {
        match plan {
            PlanType::Monthly => self.price,
            PlanType::Yearly => self.yearly_price(),
        }
    }

    /// Monthly price in minor units
    pub fn price_cents(&self) -> u64 {
        u64::from(self.price) * 100
    }
}

pub const LUCETA_PRODUCTS: &[AudioProduct] = &[
    AudioProduct {
        id: "pdt_0NUtoiCotZwkQTWTxwEge",
        name: "Starter",
        description: "Perfect for indie game developers getting started with audio",
        price: 29,
        category: Category::Starter,
        features: &[
            "Audio cursor integration",
            "Up to 50 audio experiences/month",
            "Basic game engine support",
            "Community support",
            "One-click global deployment",
            "Game engine integration",
        ],
        popular: false,
    },
    AudioProduct {
        id: "pdt_0NUtoiR120tOcI7kvVYM3",
        name: "Pro",
        description: "Advanced features for professional game studios",
        price: 99,
        category: Category::Pro,
        features: &[
            "Advanced gesture recognition",
            "Up to 1,000 audio experiences/month",
            "Multi-platform deployment",
            "Priority support",
            "One-click global deployment",
            "Game engine integration",
        ],
        popular: true,
    },
    AudioProduct {
        id: "pdt_0NUtoieCPfDZnA2fSkpKE",
        name: "Enterprise",
        description: "Full-scale solution for large game development teams",
        price: 299,
        category: Category::Enterprise,
        features: &[
            "Custom audio templates",
            "Unlimited audio experiences",
            "Dedicated audio engineering support",
            "24/7 technical assistance",
            "One-click global deployment",
            "Game engine integration",
        ],
        popular: false,
    },
];

pub fn products() -> &'static [AudioProduct] {
    LUCETA_PRODUCTS
}

pub fn get_product_by_id(id: &str) -> Option<&'static AudioProduct> {
    LUCETA_PRODUCTS.iter().find(|p| p.id == id)
}

pub fn get_products_by_category(category: Category) -> Vec<&'static AudioProduct> {
    LUCETA_PRODUCTS
        .iter()
        .filter(|p| p.category == category)
        .collect()
}
