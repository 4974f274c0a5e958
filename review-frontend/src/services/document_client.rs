//! Document backend API.

use crate::error::ClientError;
use crate::models::{
    transform_sort_params, Document, DocumentPage, DocumentQuery, DocumentStatus, NewDocument,
};
use crate::services::api_client::BackendClient;
use async_trait::async_trait;
use reqwest::multipart;

/// Operations the review workflow performs against the document store.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, ClientError>;

    async fn get_document(&self, document_id: &str) -> Result<Document, ClientError>;

    async fn create_document(&self, document: NewDocument) -> Result<Document, ClientError>;

    async fn rename_document(&self, document_id: &str, name: &str) -> Result<(), ClientError>;

    async fn delete_document(&self, document_id: &str) -> Result<(), ClientError>;

    async fn change_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> Result<(), ClientError>;

    async fn revoke(&self, document_id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl DocumentApi for BackendClient {
    async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, ClientError> {
        let path = "/document";
        let params = transform_sort_params(query);
        self.send_json(self.get(path).query(&params), path).await
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, ClientError> {
        let path = format!("/document/{}", document_id);
        self.send_json(self.get(&path), &path).await
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, ClientError> {
        let path = "/document";
        let NewDocument { name, status, file } = document;

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;

        let form = multipart::Form::new()
            .text("name", name)
            .text("status", status.to_string())
            .part("file", part);

        let created: Document = self.send_json(self.post(path).multipart(form), path).await?;
        tracing::info!(document_id = %created.id, status = %created.status, "Document created");
        Ok(created)
    }

    async fn rename_document(&self, document_id: &str, name: &str) -> Result<(), ClientError> {
        let path = format!("/document/{}", document_id);
        let body = serde_json::json!({ "name": name });
        self.send_empty(self.patch(&path).json(&body), &path).await
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ClientError> {
        let path = format!("/document/{}", document_id);
        self.send_empty(self.delete(&path), &path).await
    }

    async fn change_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> Result<(), ClientError> {
        let path = format!("/document/{}/change-status", document_id);
        let body = serde_json::json!({ "status": status });
        self.send_empty(self.post(&path).json(&body), &path).await
    }

    async fn revoke(&self, document_id: &str) -> Result<(), ClientError> {
        let path = format!("/document/{}/revoke-review", document_id);
        self.send_empty(self.post(&path), &path).await
    }
}
