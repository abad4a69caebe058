//! Room provisioning workflow
//!
//! Creates a room, attaches an HLS egress component and then an RTSP
//! ingress component pulling the given stream. Requests are sent one after
//! another and the first failure aborts the rest. Nothing created before the
//! failure is rolled back.

use std::fmt;

use tracing::{error, info};

use crate::config::RoomDefaults;
use crate::error::{FishjamError, ProvisionError};
use crate::service::RoomInterface;
use crate::types::{Component, ComponentOptions, HlsOptions, Room, RoomOptions, RtspOptions};

/// Remote call made by the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    CreateRoom,
    AttachHls,
    AttachRtsp,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateRoom => f.write_str("creating room"),
            Self::AttachHls => f.write_str("attaching HLS component"),
            Self::AttachRtsp => f.write_str("attaching RTSP component"),
        }
    }
}

/// Progress through the workflow. Stages only move forward; a failure is
/// reported as a `ProvisionError` carrying the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProvisionStage {
    NotStarted,
    RoomCreated,
    HlsAttached,
    FullyProvisioned,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::RoomCreated => f.write_str("room created"),
            Self::HlsAttached => f.write_str("HLS attached"),
            Self::FullyProvisioned => f.write_str("fully provisioned"),
        }
    }
}

/// Everything the server handed back for a fully provisioned room
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionReport {
    pub stage: ProvisionStage,
    pub server_address: String,
    pub room: Room,
    pub hls: Component,
    pub rtsp: Component,
}

impl ProvisionReport {
    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room.id
    }
}

/// Drives the create-room / attach-HLS / attach-RTSP sequence.
///
/// Every call to [`Provisioner::provision`] creates a new room; nothing is
/// deduplicated between calls.
pub struct Provisioner<A> {
    api: A,
    room: RoomOptions,
    hls: HlsOptions,
    rtsp: RtspOptions,
}

impl<A: RoomInterface> Provisioner<A> {
    /// H264 room, server-default HLS and RTSP settings
    pub fn new(api: A) -> Self {
        Self {
            api,
            room: RoomOptions::default(),
            hls: HlsOptions::default(),
            rtsp: RtspOptions::default(),
        }
    }

    pub fn from_defaults(api: A, defaults: &RoomDefaults) -> Self {
        Self::new(api).with_room_options(defaults.room_options())
    }

    #[must_use]
    pub fn with_room_options(mut self, room: RoomOptions) -> Self {
        self.room = room;
        self
    }

    #[must_use]
    pub fn with_hls_options(mut self, hls: HlsOptions) -> Self {
        self.hls = hls;
        self
    }

    /// RTSP settings applied to every ingress; `source_uri` is replaced by
    /// the stream passed to [`Provisioner::provision`].
    #[must_use]
    pub fn with_rtsp_options(mut self, rtsp: RtspOptions) -> Self {
        self.rtsp = rtsp;
        self
    }

    /// Provision a room that ingests `stream_uri` and serves it over HLS.
    pub async fn provision(&self, stream_uri: &str) -> Result<ProvisionReport, ProvisionError> {
        let stream_uri = stream_uri.trim();
        if stream_uri.is_empty() {
            return Err(ProvisionError::Configuration(
                "No stream URI specified".to_string(),
            ));
        }

        let mut stage = ProvisionStage::NotStarted;

        let created = self
            .api
            .create_room(&self.room)
            .await
            .map_err(|e| fail(ProvisionStep::CreateRoom, stage, None, e))?;
        stage = ProvisionStage::RoomCreated;
        let room_id = created.room.id.clone();
        info!(room_id = %room_id, server = %created.server_address, "Room created");

        let hls = self
            .api
            .add_component(&room_id, &ComponentOptions::Hls(self.hls.clone()))
            .await
            .map_err(|e| fail(ProvisionStep::AttachHls, stage, Some(&room_id), e))?;
        stage = ProvisionStage::HlsAttached;
        info!(room_id = %room_id, component_id = %hls.id, "HLS component attached");

        let rtsp_options = RtspOptions {
            source_uri: stream_uri.to_string(),
            ..self.rtsp.clone()
        };
        let rtsp = self
            .api
            .add_component(&room_id, &ComponentOptions::Rtsp(rtsp_options))
            .await
            .map_err(|e| fail(ProvisionStep::AttachRtsp, stage, Some(&room_id), e))?;
        stage = ProvisionStage::FullyProvisioned;
        info!(room_id = %room_id, component_id = %rtsp.id, stream_uri, "RTSP component attached");

        Ok(ProvisionReport {
            stage,
            server_address: created.server_address,
            room: created.room,
            hls,
            rtsp,
        })
    }
}

fn fail(
    step: ProvisionStep,
    reached: ProvisionStage,
    room_id: Option<&str>,
    source: FishjamError,
) -> ProvisionError {
    error!(%step, %reached, room_id, error = %source, "Provisioning failed");

    ProvisionError::ServerCommunication {
        step,
        reached,
        room_id: room_id.map(ToString::to_string),
        source,
    }
}
