//! Upload stage: push a transcoded PNG to the blob store.

use crate::error::FragmentError;
use crate::providers::BlobStore;

/// Upload one PNG of fragment `index` into `folder` and return its URL.
pub async fn upload(
    store: &dyn BlobStore,
    index: usize,
    png: Vec<u8>,
    folder: &str,
) -> Result<String, FragmentError> {
    store
        .upload(png, folder)
        .await
        .map_err(|e| FragmentError::Storage {
            index,
            detail: e.to_string(),
        })
}
