use serde::{Deserialize, Serialize};

/// A certificate product as offered by the API.
///
/// # Example JSON
///
/// ```json
/// {
///   "id": 90,
///   "brand": "Sectigo",
///   "name": "EssentialSSL",
///   "type": "SINGLE",
///   "validation": "DV",
///   "warranty": 10000,
///   "includedDomains": 1,
///   "prices": [
///     { "years": 1, "price": 19.0, "extraPrice": 0, "extraPriceWildcard": 0 },
///     { "years": 2, "price": 36.0, "extraPrice": 0, "extraPriceWildcard": 0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub brand: String,
    pub name: String,

    /// `SINGLE`, `MULTI` or `WILDCARD`.
    #[serde(rename = "type")]
    pub _type: String,

    /// `DV`, `OV` or `EV`.
    pub validation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<u64>,

    /// Number of domains covered without extra charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_domains: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_domains: Option<u32>,

    #[serde(default)]
    pub prices: Vec<ProductPrice>,
}

impl Product {
    /// Returns true if the product covers a wildcard name.
    pub fn is_wildcard(&self) -> bool {
        self._type == "WILDCARD"
    }

    /// Returns true if the product covers multiple domains.
    pub fn is_multi_domain(&self) -> bool {
        self._type == "MULTI"
    }

    /// Returns true for extended validation products.
    pub fn is_extended_validation(&self) -> bool {
        self.validation == "EV"
    }

    /// Price for a validity period, if the product is sold for that many years.
    pub fn price_for(&self, years: u32) -> Option<&ProductPrice> {
        self.prices.iter().find(|price| price.years == years)
    }
}

/// Price of a [`Product`] for one validity period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub years: u32,
    pub price: f64,

    /// Price per additional domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_price: Option<f64>,

    /// Price per additional wildcard domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_price_wildcard: Option<f64>,
}
