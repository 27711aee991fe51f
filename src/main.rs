use anyhow::Result;
use sumochat::{app, config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::load()?;
    config.validate()?;

    let mut app = app::App::new(config)?;
    app.run().await?;

    Ok(())
}
