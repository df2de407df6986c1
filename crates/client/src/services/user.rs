use oakline_core::{NewGuestUser, Page, Pagination, User, UserId, UserUpdate};
use tracing::instrument;
use uuid::Uuid;

use super::window_query;
use crate::client::ApiClient;
use crate::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;

/// Shopper account endpoints under `/user`.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Register a guest shopper by client-generated UUID.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, guest), fields(guest_uuid = %guest.guest_uuid))]
    pub async fn create_guest(&self, guest: &NewGuestUser) -> Result<User, ApiError> {
        let response: ItemEnvelope<User> = self.client.post("/user/create", guest).await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<Page<User>, ApiError> {
        let response: ListEnvelope<User> = self
            .client
            .get("/user/get-all", &window_query(pagination))
            .await?;
        Ok(response.into_page(pagination))
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the user does not exist.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: UserId) -> Result<User, ApiError> {
        let response: ItemEnvelope<User> =
            self.client.get(&format!("/user/get/{id}"), &[]).await?;
        Ok(response.into_inner())
    }

    /// Look a guest up by the UUID stored on their device.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no user carries this UUID.
    #[instrument(skip(self))]
    pub async fn by_guest_uuid(&self, guest_uuid: Uuid) -> Result<User, ApiError> {
        let response: ItemEnvelope<User> = self
            .client
            .get(&format!("/user/get-by-uuid/{guest_uuid}"), &[])
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let response: ItemEnvelope<User> = self
            .client
            .patch(&format!("/user/update/{id}"), update)
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/user/delete/{id}"), &[])
            .await?;
        Ok(())
    }
}
