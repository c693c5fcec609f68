//! External service port traits (asset upload).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bookforge_domain::{AssetId, BookId};

use super::error::AssetUploadError;

/// Stored asset as reported by the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub asset_id: AssetId,
    pub url: String,
}

/// Asset upload port. The host shows the file picker, stores the file and
/// yields the asset id and url once it is available.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetUploadPort: Send + Sync {
    /// * `entity_type` - owner kind, e.g. `"character"`
    /// * `role` - slot on the owner, e.g. `"portrait"`
    async fn upload(
        &self,
        entity_type: &str,
        entity_id: &str,
        book_id: &BookId,
        role: &str,
        accepted_mime_types: &[String],
    ) -> Result<UploadedAsset, AssetUploadError>;
}
