use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    board_deploy::cli::run().await
}
