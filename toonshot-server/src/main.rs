use anyhow::{Context, Result};
use bot::{APIConfig, GenerationClient};
use clap::Parser;
use gateway::{GatewayConfig, GatewayServer};
use std::{io::Write, sync::Arc};
use tokio::sync::Notify;

/// Stylization endpoint: relays `{image, style}` requests to an image model.
#[derive(Parser, Debug)]
#[command(name = "toonshot-server", version)]
#[command(about = "Serve the cartoon stylization endpoint")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:8787")]
    address: String,

    #[arg(long, default_value = "/cartoonize")]
    path: String,

    /// OpenAI compatible API base, `/chat/completions` is appended
    #[arg(long, env = "TOONSHOT_API_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    api_base_url: String,

    #[arg(long, env = "TOONSHOT_API_MODEL", default_value = "google/gemini-2.5-flash-image-preview")]
    api_model: String,

    #[arg(long, default_value_t = 20 * 1024 * 1024)]
    max_body_bytes: usize,
}

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = cutil::time::local_now("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let api_key = std::env::var("TOONSHOT_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("TOONSHOT_API_KEY is not set, every request will fail");
    }

    let generator = GenerationClient::new(APIConfig {
        api_base_url: args.api_base_url,
        api_model: args.api_model,
        api_key,
        temperature: None,
    });

    let config = GatewayConfig::default()
        .with_address(args.address)
        .with_path(args.path)
        .with_max_body_bytes(args.max_body_bytes);

    let exit_notify = Arc::new(Notify::new());
    let server = GatewayServer::bind(config, Arc::new(generator), exit_notify.clone())
        .await
        .context("start gateway failed")?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("receive ctrl-c, exit...");
            exit_notify.notify_one();
        }
    });

    server.run().await?;
    Ok(())
}
