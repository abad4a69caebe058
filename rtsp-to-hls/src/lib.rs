//! Command-line front end for the Fishjam room provisioner
//!
//! Parses arguments, layers them over the loaded configuration and runs the
//! provisioning workflow once.

use clap::Parser;
use fishjam_provisioner::{
    Config, FishjamClient, ProvisionError, ProvisionReport, Provisioner, VideoCodec,
};

#[derive(Parser, Debug)]
#[command(name = "rtsp-to-hls")]
#[command(about = "Create a Fishjam room that restreams an RTSP source over HLS", long_about = None)]
pub struct Args {
    /// RTSP source stream URI (e.g. rtsp://camera.local/stream1)
    pub stream_uri: Option<String>,

    /// Path to a configuration file (toml, yaml or json)
    #[arg(short, long, env = "FISHJAM_CONFIG")]
    pub config: Option<String>,

    /// Fishjam server host
    #[arg(long, env = "FISHJAM_HOST")]
    pub host: Option<String>,

    /// Fishjam server port
    #[arg(long, env = "FISHJAM_PORT")]
    pub port: Option<u16>,

    /// Fishjam server API token
    #[arg(long, env = "FISHJAM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Video codec for the room (h264, vp8)
    #[arg(long)]
    pub video_codec: Option<VideoCodec>,

    /// Maximum number of peers in the room
    #[arg(long)]
    pub max_peers: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FISHJAM_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Override configuration values with the ones given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(token) = &self.token {
            config.server.token.clone_from(token);
        }
        if let Some(codec) = self.video_codec {
            config.room.video_codec = codec;
        }
        if let Some(max_peers) = self.max_peers {
            config.room.max_peers = Some(max_peers);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

/// Load configuration layers and apply command-line overrides
pub fn load_config(args: &Args) -> Result<Config, ProvisionError> {
    let mut config = Config::load(args.config.as_deref())
        .map_err(|e| ProvisionError::Configuration(format!("Failed to load configuration: {e}")))?;
    args.apply(&mut config);
    Ok(config)
}

/// Run the provisioning workflow once
///
/// Input is validated before the HTTP client is built, so a missing stream
/// URI or a broken configuration never results in network traffic.
pub async fn run(args: &Args, config: &Config) -> Result<ProvisionReport, ProvisionError> {
    let stream_uri = args
        .stream_uri
        .as_deref()
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| {
            ProvisionError::Configuration(
                "No stream URI specified, pass it as the first argument".to_string(),
            )
        })?;

    config
        .validate()
        .map_err(|errors| ProvisionError::Configuration(errors.join("; ")))?;

    let client = FishjamClient::new(&config.server)
        .map_err(|e| ProvisionError::Configuration(e.to_string()))?;

    Provisioner::from_defaults(client, &config.room)
        .provision(stream_uri)
        .await
}

/// Line printed to stdout once the room is fully provisioned
#[must_use]
pub fn success_message(report: &ProvisionReport) -> String {
    format!(
        "Components added successfully (room: {}, hls: {}, rtsp: {})",
        report.room_id(),
        report.hls.id,
        report.rtsp.id
    )
}

/// Process exit status for a workflow result
#[must_use]
pub const fn exit_status(result: &Result<ProvisionReport, ProvisionError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
