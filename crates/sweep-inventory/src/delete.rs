//! Delete-by-guid via `DELETE /v1/computers/{connector_guid}`.

use crate::{InventoryClient, error::InventoryError, http::check_response};

#[derive(Debug, Default, serde::Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    data: DeleteData,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DeleteData {
    #[serde(default)]
    deleted: bool,
}

impl InventoryClient {
    /// Delete one device record. Returns `Ok(true)` only when the service
    /// answered 200 with an explicit `data.deleted == true`; a success status
    /// without that confirmation is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if the HTTP request fails, the service
    /// returns a non-success status, or the response cannot be parsed.
    pub async fn delete_computer(&self, guid: &str) -> Result<bool, InventoryError> {
        let url = format!(
            "{}/v1/computers/{}",
            self.base_url,
            urlencoding::encode(guid)
        );
        let resp = check_response(self.authed(self.http.delete(&url)).send().await?).await?;
        let status = resp.status();
        let body: DeleteResponse = resp.json().await?;
        Ok(status == reqwest::StatusCode::OK && body.data.deleted)
    }
}
