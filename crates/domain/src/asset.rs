use crate::CreateError;

id!(
    /// Reference to an uploaded file in the asset store, e.g. an exercise video.
    AssetID
);

#[allow(async_fn_in_trait)]
pub trait AssetRepository {
    async fn upload_asset(&self, file_name: &str, content: Vec<u8>)
    -> Result<AssetID, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait AssetService {
    async fn upload_asset(&self, file_name: &str, content: Vec<u8>)
    -> Result<AssetID, CreateError>;
}
