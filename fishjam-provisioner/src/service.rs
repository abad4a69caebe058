//! Room management interface
//!
//! The provisioning workflow is written against this trait rather than the
//! HTTP client directly.

use async_trait::async_trait;

use crate::client::FishjamClient;
use crate::error::FishjamError;
use crate::types::{Component, ComponentOptions, CreatedRoom, RoomOptions};

/// Room/component operations exposed by a Fishjam server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomInterface: Send + Sync {
    async fn create_room(&self, options: &RoomOptions) -> Result<CreatedRoom, FishjamError>;

    async fn add_component(
        &self,
        room_id: &str,
        options: &ComponentOptions,
    ) -> Result<Component, FishjamError>;
}

#[async_trait]
impl RoomInterface for FishjamClient {
    async fn create_room(&self, options: &RoomOptions) -> Result<CreatedRoom, FishjamError> {
        Self::create_room(self, options).await
    }

    async fn add_component(
        &self,
        room_id: &str,
        options: &ComponentOptions,
    ) -> Result<Component, FishjamError> {
        Self::add_component(self, room_id, options).await
    }
}
