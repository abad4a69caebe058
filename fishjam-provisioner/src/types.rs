//! Fishjam HTTP API Types
//!
//! Request bodies sent to and response payloads returned by the room
//! management API. Optional request fields are omitted when unset so the
//! server applies its own defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generic Fishjam success envelope
#[derive(Debug, Deserialize)]
pub struct DataResp<T> {
    pub data: T,
}

/// Fishjam error envelope (`{"errors": ...}`)
#[derive(Debug, Deserialize)]
pub struct ErrorResp {
    pub errors: serde_json::Value,
}

/// Video codec negotiated for every peer in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum VideoCodec {
    #[default]
    H264,
    Vp8,
}

impl VideoCodec {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::Vp8 => "vp8",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h264" => Ok(Self::H264),
            "vp8" => Ok(Self::Vp8),
            other => Err(format!("unsupported video codec: {other} (expected h264 or vp8)")),
        }
    }
}

impl TryFrom<String> for VideoCodec {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Body of `POST /room`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOptions {
    pub video_codec: VideoCodec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_peers: Option<u32>,
}

impl RoomOptions {
    #[must_use]
    pub fn with_codec(video_codec: VideoCodec) -> Self {
        Self {
            video_codec,
            max_peers: None,
        }
    }
}

/// Room configuration echoed back by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    #[serde(default)]
    pub video_codec: Option<VideoCodec>,
    #[serde(default)]
    pub max_peers: Option<u32>,
}

/// Room as described by the server. The server owns this state; the client
/// only keeps the id around for follow-up calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub config: RoomConfig,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// `data` payload of a successful `POST /room`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedRoom {
    /// Address of the Fishjam instance that hosts the room
    #[serde(rename = "fishjam_address", alias = "jellyfish_address", default)]
    pub server_address: String,
    pub room: Room,
}

/// Component type reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Hls,
    Rtsp,
    #[serde(other)]
    Other,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hls => f.write_str("hls"),
            Self::Rtsp => f.write_str("rtsp"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Component attached to a room. Only meaningful together with the id of
/// the room it was attached to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Which peers' tracks the HLS component picks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscribeMode {
    Auto,
    Manual,
}

/// HLS egress options. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HlsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_latency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    /// Seconds of media kept in the playlist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_window_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe_mode: Option<SubscribeMode>,
}

/// RTSP ingress options. `source_uri` is required; the server is the one
/// that decides whether it is a usable RTSP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtspOptions {
    pub source_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtp_port: Option<u16>,
    /// Milliseconds between reconnect attempts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnect_delay: Option<u32>,
    /// Milliseconds between RTSP keep-alive messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pierce_nat: Option<bool>,
}

impl RtspOptions {
    pub fn new(source_uri: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /room/{room_id}/component`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum ComponentOptions {
    Hls(HlsOptions),
    Rtsp(RtspOptions),
}

impl ComponentOptions {
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Hls(_) => ComponentKind::Hls,
            Self::Rtsp(_) => ComponentKind::Rtsp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_codec_parse() {
        assert_eq!("h264".parse::<VideoCodec>().unwrap(), VideoCodec::H264);
        assert_eq!("VP8".parse::<VideoCodec>().unwrap(), VideoCodec::Vp8);
        assert!("av1".parse::<VideoCodec>().is_err());
        assert_eq!(VideoCodec::default().to_string(), "h264");
    }

    #[test]
    fn test_video_codec_deserialize_matches_parse() {
        for (raw, expected) in [
            ("h264", VideoCodec::H264),
            ("H264", VideoCodec::H264),
            ("vp8", VideoCodec::Vp8),
            ("VP8", VideoCodec::Vp8),
            ("Vp8", VideoCodec::Vp8),
            ("vP8", VideoCodec::Vp8),
        ] {
            let codec: VideoCodec = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(codec, expected);
            assert_eq!(raw.parse::<VideoCodec>().unwrap(), expected);
        }
        assert!(serde_json::from_value::<VideoCodec>(json!("av1")).is_err());
        assert_eq!(serde_json::to_value(VideoCodec::Vp8).unwrap(), json!("vp8"));
    }

    #[test]
    fn test_room_options_omit_unset_fields() {
        let body = serde_json::to_value(RoomOptions::default()).unwrap();
        assert_eq!(body, json!({ "videoCodec": "h264" }));

        let body = serde_json::to_value(RoomOptions {
            video_codec: VideoCodec::Vp8,
            max_peers: Some(4),
        })
        .unwrap();
        assert_eq!(body, json!({ "videoCodec": "vp8", "maxPeers": 4 }));
    }

    #[test]
    fn test_component_options_wire_format() {
        let hls = serde_json::to_value(ComponentOptions::Hls(HlsOptions::default())).unwrap();
        assert_eq!(hls, json!({ "type": "hls", "options": {} }));

        let rtsp = serde_json::to_value(ComponentOptions::Rtsp(RtspOptions {
            source_uri: "rtsp://camera.local/stream1".to_string(),
            keep_alive_interval: Some(15_000),
            pierce_nat: Some(true),
            ..RtspOptions::default()
        }))
        .unwrap();
        assert_eq!(
            rtsp,
            json!({
                "type": "rtsp",
                "options": {
                    "sourceUri": "rtsp://camera.local/stream1",
                    "keepAliveInterval": 15000,
                    "pierceNat": true
                }
            })
        );
    }

    #[test]
    fn test_created_room_accepts_legacy_address_key() {
        let payload = json!({
            "jellyfish_address": "localhost:5002",
            "room": {
                "id": "room-1",
                "config": { "videoCodec": "h264", "maxPeers": null },
                "components": [],
                "peers": []
            }
        });

        let created: CreatedRoom = serde_json::from_value(payload).unwrap();
        assert_eq!(created.server_address, "localhost:5002");
        assert_eq!(created.room.id, "room-1");
        assert_eq!(created.room.config.video_codec, Some(VideoCodec::H264));
        assert_eq!(created.room.config.max_peers, None);
    }

    #[test]
    fn test_component_unknown_type() {
        let component: Component =
            serde_json::from_value(json!({ "id": "c-1", "type": "sip" })).unwrap();
        assert_eq!(component.kind, ComponentKind::Other);
        assert!(component.properties.is_null());
    }
}
