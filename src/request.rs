//! Calls on certificate requests that are still being validated.

use crate::{
    api::ValidationCall,
    envelope::{check, ListEnvelope},
    error::Result,
    multipart::{PostFields, DOCUMENT_FIELD},
    Client,
};

/// Obtained through [`Client::request()`].
#[derive(Debug, Clone, Copy)]
pub struct Requests<'a> {
    client: &'a Client,
}

impl<'a> Requests<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Requests { client }
    }

    /// Calls placed by the validation team for request `id`.
    pub async fn validation_calls(&self, id: u64) -> Result<ListEnvelope<ValidationCall>> {
        let raw = self
            .client
            .get(&format!("requests/{id}/validation-calls"), &())
            .await?;
        ListEnvelope::decode(raw, "/list")
    }

    /// Attach a document (e.g. a signed PDF) to request `id`.
    pub async fn upload_document(
        &self,
        id: u64,
        description: &str,
        document: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let mut fields = PostFields::new();
        fields
            .push_opt("description", Some(description))
            .push(DOCUMENT_FIELD, document.into());

        let raw = self
            .client
            .post(&format!("requests/{id}/upload-document"), fields)
            .await?;
        check(raw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{test::with_api_server, Error};

    #[tokio::test]
    async fn test_validation_calls() {
        let server = with_api_server();
        let client = server.client();

        let calls = client.request().validation_calls(5).await.unwrap();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls.items[0].id, 11);
        assert_eq!(calls.items[1].id, 12);
        assert_eq!(calls.items[1].comments.as_deref(), Some("No answer"));
    }

    #[tokio::test]
    async fn test_validation_calls_missing_or_empty() {
        let server = with_api_server();
        let client = server.client();

        assert!(client.request().validation_calls(6).await.unwrap().is_empty());
        assert!(client.request().validation_calls(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_calls_wrong_shape() {
        let server = with_api_server();
        let client = server.client();

        let err = client.request().validation_calls(8).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_upload_document() {
        let server = with_api_server();
        let client = server.client();

        client
            .request()
            .upload_document(5, "Signed agreement", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_document_rejected() {
        let server = with_api_server();
        let client = server.client();

        let err = client
            .request()
            .upload_document(6, "Empty", Vec::<u8>::new())
            .await
            .unwrap_err();

        let api = err.api_error().unwrap();
        assert!(matches!(err, Error::Api(_)));
        assert_eq!(api.message, "Document is empty");
    }
}
