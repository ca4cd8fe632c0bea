use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gtm_bot::main_entry().await
}
