//! Mock product catalogue with simulated network latency.

use super::*;
use crate::resource::{AsyncResource, Outcome, ResultShape};
use storefront_async::time::cancellable_sleep;

/// A price in minor currency units (cents).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl core::ops::Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl core::ops::Mul<u32> for Price {
    type Output = Price;

    fn mul(self, quantity: u32) -> Price {
        Price(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::default(), |total, p| total + p)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
        }
    }
}

impl ResultShape for Product {}

fn mock_products() -> Vec<Product> {
    vec![
        Product::new("1", "Wireless Headphones", Price::from_cents(9999)),
        Product::new("2", "Mechanical Keyboard", Price::from_cents(14999)),
        Product::new("3", "Gaming Mouse", Price::from_cents(7999)),
    ]
}

pub struct Catalog {
    products: Vec<Product>,
    network_delay: time::Duration,
}

impl Catalog {
    /// The built-in mock catalogue, with the configured network delay.
    pub fn new(config: &config::Config) -> Self {
        Self::with_products(mock_products(), config.network_delay())
    }

    pub fn with_products(products: Vec<Product>, network_delay: time::Duration) -> Self {
        Self {
            products,
            network_delay,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find(&self, id: &str) -> Result<&Product> {
        self.product(id)
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))
    }

    /// Lists every product after the simulated network delay.
    pub async fn fetch_products(&self, cancel_token: CancellationToken) -> Outcome<Vec<Product>, Error> {
        if !cancellable_sleep(self.network_delay, &cancel_token).await {
            return Outcome::Cancelled;
        }
        trace!(count = self.products.len(), "Fetched products");
        Outcome::Value(self.products.clone())
    }

    /// Looks up one product after the simulated network delay.
    pub async fn fetch_product(&self, cancel_token: CancellationToken, id: &str) -> Outcome<Product, Error> {
        if !cancellable_sleep(self.network_delay, &cancel_token).await {
            return Outcome::Cancelled;
        }
        self.find(id).cloned().into()
    }

    /// A resource listing the whole catalogue.
    pub fn products_resource(self: &Arc<Self>) -> AsyncResource<Vec<Product>> {
        let catalog = self.clone();
        AsyncResource::new(move |cancel_token| {
            let catalog = catalog.clone();
            async move { catalog.fetch_products(cancel_token).await }
        })
    }

    /// A resource for a single product.
    pub fn product_resource(self: &Arc<Self>, id: impl Into<String>) -> AsyncResource<Product> {
        let catalog = self.clone();
        let id: Arc<str> = id.into().into();
        AsyncResource::new(move |cancel_token| {
            let catalog = catalog.clone();
            let id = id.clone();
            async move { catalog.fetch_product(cancel_token, &id).await }
        })
    }
}
