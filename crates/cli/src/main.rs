use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pantry_cli::main_entry().await
}
