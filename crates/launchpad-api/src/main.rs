use launchpad_api::setup;
use launchpad_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let (state, app) = setup::initialize_app(config).await?;

    setup::server::start_server(&state.config, app).await?;

    Ok(())
}
