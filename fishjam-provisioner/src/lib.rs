// Fishjam Room Provisioner
//
// HTTP client for the Fishjam room/component management API plus the
// provisioning workflow that turns an RTSP source into an HLS-served room.
//
// Architecture:
// - client:    pure HTTP client (FishjamClient), no workflow knowledge
// - service:   RoomInterface trait the workflow is written against
// - provision: create room -> attach HLS -> attach RTSP, abort on first error

// Shared error types
pub mod error;

// Ambient configuration and logging
pub mod config;
pub mod logging;

// HTTP client and wire types
pub mod client;
pub mod types;

// Workflow
pub mod provision;
pub mod service;

// Re-export client types for convenience
pub use client::FishjamClient;
pub use config::{Config, LoggingConfig, RoomDefaults, ServerConfig};
pub use error::{FishjamError, ProvisionError};
pub use provision::{ProvisionReport, ProvisionStage, ProvisionStep, Provisioner};
pub use service::RoomInterface;
pub use types::{
    Component, ComponentKind, ComponentOptions, CreatedRoom, HlsOptions, Room, RoomOptions,
    RtspOptions, SubscribeMode, VideoCodec,
};
