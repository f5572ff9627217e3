use crate::{
    api::{Product, SslCheck},
    envelope::{decode_record, ListEnvelope},
    error::Result,
    Client,
};

/// Product catalogue and domain lookups.
///
/// Obtained through [`Client::support()`].
#[derive(Debug, Clone, Copy)]
pub struct Support<'a> {
    client: &'a Client,
}

impl<'a> Support<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Support { client }
    }

    /// One page of the product catalogue. Pages start at 1.
    pub async fn products(&self, page: u32) -> Result<ListEnvelope<Product>> {
        let raw = self.client.get("support/products", &[("page", page)]).await?;
        ListEnvelope::decode(raw, "/_embedded/products")
    }

    pub async fn product(&self, id: u64) -> Result<Product> {
        let raw = self.client.get(&format!("support/product/{id}"), &()).await?;
        decode_record(raw)
    }

    /// Email addresses that may approve email validation for `domain`.
    pub async fn approver_email_addresses(&self, domain: &str) -> Result<Vec<String>> {
        let raw = self
            .client
            .get("support/approver-email-addresses", &[("domain", domain)])
            .await?;
        decode_record(raw)
    }

    /// Check the certificate currently served by `domain`.
    pub async fn ssl_check(&self, domain: &str) -> Result<SslCheck> {
        let raw = self.client.get("support/sslcheck", &[("domain", domain)]).await?;
        decode_record(raw)
    }
}
