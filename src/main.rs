// cargo run -- --resource-group rg-dev --vnet-name vnet-dev-01 --cidr 24

use azure_next_cidr::config::{init_logging, Config};
use clap::Parser;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::parse();
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    // reading the inventory and running az both block
    let response = tokio::task::spawn_blocking(move || config.propose()).await?;

    println!("{}", response.to_json()?);
    log::info!("#End main() status={}", response.status());
    if response.status() != 200 {
        std::process::exit(1);
    }
    Ok(())
}
