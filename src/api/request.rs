use serde::{Deserialize, Serialize};

use crate::api::Product;

// {
//   "id": 960000031,
//   "domainName": "example.com",
//   "company": "Xolphin B.V.",
//   "dateOrdered": "2024-03-01T10:00:00+01:00",
//   "validations": { "dcv": { "status": false } },
//   "_embedded": {
//     "product": { "id": 90, "brand": "Sectigo", "name": "EssentialSSL", ... }
//   }
// }
/// A certificate request, as created by ordering or renewing a certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Uses RFC 3339 format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_ordered: Option<String>,

    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub embedded: Option<RequestEmbedded>,
}

impl CertificateRequest {
    /// The ordered product, if the server embedded it.
    pub fn product(&self) -> Option<&Product> {
        self.embedded.as_ref()?.product.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEmbedded {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}
