#[tokio::main]
async fn main() -> anyhow::Result<()> {
    toonshot::desktop_main().await
}
