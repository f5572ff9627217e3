//! Calls on issued certificates.

use crate::{
    api::CertificateRequest,
    client::Download,
    envelope::decode_record,
    error::Result,
    Client,
};

mod renew;

pub use self::renew::{DcvDomain, DcvType, RenewRequest};

/// File format for [`Certificate::download()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateFormat {
    /// The certificate alone, PEM encoded.
    #[default]
    Crt,

    /// The issuing CA certificates.
    Ca,

    /// Intermediate and root certificates in one file.
    CaBundle,

    /// The certificate and chain as PKCS#7.
    Pkcs7,
}

impl CertificateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateFormat::Crt => "CRT",
            CertificateFormat::Ca => "CA",
            CertificateFormat::CaBundle => "CA_BUNDLE",
            CertificateFormat::Pkcs7 => "PKCS7",
        }
    }
}

/// Obtained through [`Client::certificate()`].
#[derive(Debug, Clone, Copy)]
pub struct Certificate<'a> {
    client: &'a Client,
}

impl<'a> Certificate<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Certificate { client }
    }

    /// Renew certificate `id`, which creates a new certificate request.
    pub async fn renew(&self, id: u64, request: &RenewRequest) -> Result<CertificateRequest> {
        let raw = self
            .client
            .post(&format!("certificates/{id}/renew"), request.to_fields())
            .await?;
        decode_record(raw)
    }

    /// Download certificate `id` in the given format.
    pub async fn download(&self, id: u64, format: CertificateFormat) -> Result<Download> {
        self.client
            .download(
                &format!("certificates/{id}/download"),
                &[("format", format.as_str())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::with_api_server, RateState};

    #[tokio::test]
    async fn test_renew() {
        let server = with_api_server();
        let client = server.client();

        let csr = "-----BEGIN CERTIFICATE REQUEST-----";
        let request = RenewRequest::new(90, 1, csr, DcvType::Email).company("Xolphin B.V.");

        let renewed = client.certificate().renew(1, &request).await.unwrap();

        assert_eq!(renewed.id, 960000031);
        assert_eq!(renewed.domain_name.as_deref(), Some("example.com"));
        assert_eq!(renewed.product().map(|p| p.id), Some(90));
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 96 });
    }

    #[tokio::test]
    async fn test_renew_fields_reach_server_in_order() {
        let server = with_api_server();
        let client = server.client();

        let request = RenewRequest::new(90, 2, "CSR", DcvType::Dns)
            .add_subject_alternative_name("www.example.com")
            .city("Amsterdam")
            .company("Xolphin B.V.")
            .reference("ticket-7");

        let raw = client.post("support/echo", request.to_fields()).await.unwrap();

        assert_eq!(
            raw["fields"],
            serde_json::json!([
                "product",
                "years",
                "csr",
                "dcvType",
                "subjectAlternativeNames",
                "company",
                "city",
                "reference",
            ])
        );
        assert_eq!(raw["filenames"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_download() {
        let server = with_api_server();
        let client = server.client();

        let download = client
            .certificate()
            .download(1, CertificateFormat::Crt)
            .await
            .unwrap();

        let body = download.bytes().await.unwrap();
        assert!(body.starts_with(b"-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(CertificateFormat::default().as_str(), "CRT");
        assert_eq!(CertificateFormat::CaBundle.as_str(), "CA_BUNDLE");
    }
}
