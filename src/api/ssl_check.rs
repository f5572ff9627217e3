use serde::{Deserialize, Serialize};

/// Result of checking the certificate installed on a domain.
///
/// All fields other than the domain depend on what the server could find.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCheck {
    #[serde(default)]
    pub domain_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Uses RFC 3339 format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,

    /// Uses RFC 3339 format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_complete: Option<bool>,
}

impl SslCheck {
    /// Returns true if the server reported a complete chain.
    pub fn is_chain_complete(&self) -> bool {
        self.chain_complete.unwrap_or(false)
    }
}
