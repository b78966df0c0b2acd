use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::ServiceError;

/// Entity kinds that can carry an attached document. The variant name
/// doubles as the top-level directory inside the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PurchaseOrder,
    Invoice,
}

impl DocumentKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "ordenes_compra",
            DocumentKind::Invoice => "facturas",
        }
    }
}

/// Bucket path for an attached document:
/// `{entity-type}/{document-number}_{unix-millis}.{ext}`.
pub fn document_path(
    kind: DocumentKind,
    document_number: &str,
    extension: &str,
    at: DateTime<Utc>,
) -> String {
    format!(
        "{}/{}_{}.{}",
        kind.path_segment(),
        document_number,
        at.timestamp_millis(),
        extension
    )
}

/// Only PDFs and images may be attached to a record.
pub fn is_supported_attachment(content_type: &str) -> bool {
    content_type == "application/pdf" || content_type.starts_with("image/")
}

pub fn within_size_limit(size_bytes: u64, max_upload_mb: u64) -> bool {
    size_bytes <= max_upload_mb * 1024 * 1024
}

/// Narrow seam for the hosted object-storage collaborator. The services
/// only ever see the resulting public URL, stored opaquely on the record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError>;

    fn public_url(&self, path: &str) -> String;

    async fn remove(&self, path: &str) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn document_path_follows_the_bucket_convention() {
        let at = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let path = document_path(DocumentKind::Invoice, "FAC-202505-001", "pdf", at);
        assert_eq!(
            path,
            format!("facturas/FAC-202505-001_{}.pdf", at.timestamp_millis())
        );

        let path = document_path(DocumentKind::PurchaseOrder, "OC-202505-003", "png", at);
        assert!(path.starts_with("ordenes_compra/OC-202505-003_"));
        assert!(path.ends_with(".png"));
    }

    #[test]
    fn only_pdf_and_images_are_supported() {
        assert!(is_supported_attachment("application/pdf"));
        assert!(is_supported_attachment("image/png"));
        assert!(is_supported_attachment("image/jpeg"));
        assert!(!is_supported_attachment("text/plain"));
        assert!(!is_supported_attachment("application/zip"));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(within_size_limit(10 * 1024 * 1024, 10));
        assert!(!within_size_limit(10 * 1024 * 1024 + 1, 10));
    }

    #[tokio::test]
    async fn mocked_storage_round_trip() {
        let mut storage = MockDocumentStorage::new();
        storage
            .expect_upload()
            .withf(|path, _, content_type| {
                path.starts_with("facturas/") && content_type == "application/pdf"
            })
            .returning(|_, _, _| Ok(()));
        storage
            .expect_public_url()
            .returning(|path| format!("https://storage.example.com/documentos/{path}"));

        let path = document_path(
            DocumentKind::Invoice,
            "FAC-202505-001",
            "pdf",
            Utc::now(),
        );
        storage
            .upload(&path, b"%PDF-1.7", "application/pdf")
            .await
            .unwrap();
        let url = storage.public_url(&path);
        assert!(url.contains("facturas/FAC-202505-001_"));
    }
}
