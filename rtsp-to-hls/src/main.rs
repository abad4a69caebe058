use std::process::ExitCode;

use clap::Parser;
use fishjam_provisioner::logging;
use rtsp_to_hls::{exit_status, load_config, run, success_message, Args};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // 1. Load configuration (file -> env -> command line)
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    // 2. Initialize logging
    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    // 3. Provision
    info!("Provisioning room on {}", config.server.address());
    let result = run(&args, &config).await;
    match &result {
        Ok(report) => {
            info!(
                room_id = %report.room_id(),
                hls_component = %report.hls.id,
                rtsp_component = %report.rtsp.id,
                "Components added successfully"
            );
            println!("{}", success_message(report));
        }
        Err(e) if e.is_configuration() => {
            error!("{e}");
        }
        Err(e) => {
            error!("{e}");
            error!("Make sure the Fishjam server is running at {}", config.server.base_url());
        }
    }

    ExitCode::from(exit_status(&result))
}
