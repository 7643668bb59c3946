use smoke::runtime::boot;
use smoke::suite;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (client, config) = boot::boot().await?;
    suite::run_suite(&client, &config).await?;
    Ok(())
}
