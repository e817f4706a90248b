use std::path::Path;

use tokio_util::sync::CancellationToken;

mod api;
mod config;
mod detect;
mod error;
mod media;
mod payload;
mod pose;
mod protocol;
mod session;
mod track;

fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() -> ! {
    init_logging();
    let config = config::config();

    if config.model_url().is_empty() {
        log::info!("model provisioning disabled");
    } else {
        // Blocking download, kept off the runtime workers.
        let provisioned = tokio::task::spawn_blocking(move || {
            detect::model::ensure_present(Path::new(config.model_path()), config.model_url())
        })
        .await
        .expect("model provisioning task panicked");
        if let Err(e) = provisioned {
            eprintln!("Error provisioning model asset: {}", e);
            std::process::exit(1);
        }
    }
    if config.engine() == "stub" {
        log::warn!("using stub landmark engine; every frame reports no face");
    }

    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    api::start_api_server(cancel_clone);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break;
            },
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
            },
        }
    }

    std::process::exit(0)
}
