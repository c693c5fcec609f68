//! Asset upload use cases.

use std::sync::Arc;

use bookforge_domain::{BookId, CharacterId, VersionId};

use crate::infrastructure::ports::{AssetUploadError, AssetUploadPort, BookRepo, RepoError, UploadedAsset};

const PORTRAIT_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Container for asset use cases.
pub struct AssetUseCases {
    pub character_portrait: Arc<UploadCharacterPortrait>,
}

impl AssetUseCases {
    pub fn new(character_portrait: Arc<UploadCharacterPortrait>) -> Self {
        Self { character_portrait }
    }
}

/// Uploads a portrait image for a character card.
pub struct UploadCharacterPortrait {
    book_repo: Arc<dyn BookRepo>,
    uploads: Arc<dyn AssetUploadPort>,
}

impl UploadCharacterPortrait {
    pub fn new(book_repo: Arc<dyn BookRepo>, uploads: Arc<dyn AssetUploadPort>) -> Self {
        Self { book_repo, uploads }
    }

    pub async fn execute(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        character_id: &CharacterId,
    ) -> Result<UploadedAsset, AssetError> {
        if self
            .book_repo
            .get_character(book_id, version_id, character_id)
            .await?
            .is_none()
        {
            return Err(AssetError::CharacterNotFound(character_id.clone()));
        }

        let accepted: Vec<String> = PORTRAIT_MIME_TYPES.iter().map(|m| m.to_string()).collect();
        let asset = self
            .uploads
            .upload("character", character_id.as_str(), book_id, "portrait", &accepted)
            .await?;

        tracing::info!(
            book_id = %book_id,
            character_id = %character_id,
            asset_id = %asset.asset_id,
            "Uploaded character portrait"
        );
        Ok(asset)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Upload error: {0}")]
    Upload(#[from] AssetUploadError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockAssetUploadPort, MockBookRepo};
    use bookforge_domain::{AssetId, Character};

    #[tokio::test]
    async fn uploads_portrait_for_known_character() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_get_character()
            .returning(|_, _, id| Ok(Some(Character::new(id.clone(), "Hermione"))));

        let mut uploads = MockAssetUploadPort::new();
        uploads
            .expect_upload()
            .withf(|entity_type, entity_id, _, role, accepted| {
                entity_type == "character"
                    && entity_id == "hermione"
                    && role == "portrait"
                    && accepted.iter().any(|m| m == "image/png")
            })
            .times(1)
            .returning(|_, _, _, _, _| {
                Ok(UploadedAsset {
                    asset_id: AssetId::from("asset-1"),
                    url: "asset://asset-1".to_string(),
                })
            });

        let use_case = UploadCharacterPortrait::new(Arc::new(book_repo), Arc::new(uploads));
        let asset = use_case
            .execute(
                &BookId::from("b"),
                &VersionId::from("v"),
                &CharacterId::from("hermione"),
            )
            .await
            .unwrap();

        assert_eq!(asset.asset_id, AssetId::from("asset-1"));
    }

    #[tokio::test]
    async fn unknown_character_skips_upload() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_get_character()
            .returning(|_, _, _| Ok(None));
        let mut uploads = MockAssetUploadPort::new();
        uploads.expect_upload().never();

        let use_case = UploadCharacterPortrait::new(Arc::new(book_repo), Arc::new(uploads));
        let result = use_case
            .execute(
                &BookId::from("b"),
                &VersionId::from("v"),
                &CharacterId::from("nobody"),
            )
            .await;

        assert!(matches!(result, Err(AssetError::CharacterNotFound(_))));
    }

    #[tokio::test]
    async fn upload_failure_is_reported() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_get_character()
            .returning(|_, _, id| Ok(Some(Character::new(id.clone(), "Ron"))));
        let mut uploads = MockAssetUploadPort::new();
        uploads
            .expect_upload()
            .returning(|_, _, _, _, _| Err(AssetUploadError::Cancelled));

        let use_case = UploadCharacterPortrait::new(Arc::new(book_repo), Arc::new(uploads));
        let result = use_case
            .execute(&BookId::from("b"), &VersionId::from("v"), &CharacterId::from("ron"))
            .await;

        assert!(matches!(result, Err(AssetError::Upload(AssetUploadError::Cancelled))));
    }
}
