use clap::{CommandFactory, Parser};
use live_nft::config::{Cli, CreateSettings, CronSettings, TestImageSettings, UpdateSettings};
use live_nft::core::bootstrap;
use live_nft::domain::model::TokenRef;
use live_nft::domain::ports::DataSource;
use live_nft::utils::{logger, validation::Validate};
use live_nft::{
    ChainRestClient, FixedScheduler, HttpDataSource, IpfsUploader, LocalStorage, Result,
    RunEngine, TokenImageRenderer, UpdatePipeline,
};
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting live-nft");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ Run failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &Cli) -> Result<()> {
    if cli.test_image {
        test_image().await
    } else if cli.create_collection {
        create_collection().await
    } else if cli.update {
        update_once().await
    } else if cli.cron {
        run_on_cron().await
    } else {
        Cli::command().print_help()?;
        println!();
        Ok(())
    }
}

async fn test_image() -> Result<()> {
    let settings = TestImageSettings::from_env()?;
    settings.validate()?;

    let source = HttpDataSource::new(settings.api);
    let renderer = TokenImageRenderer::new(
        LocalStorage::new(settings.render.assets_dir.clone()),
        LocalStorage::new(settings.render.output_dir.clone()),
    );

    let reading = source.fetch().await?;
    tracing::info!("New data from the API: param = {}", reading.param);

    renderer.generate(&reading).await?;

    println!("✅ Image generated in {}", settings.render.output_dir);
    Ok(())
}

async fn create_collection() -> Result<()> {
    let settings = CreateSettings::from_env()?;
    settings.validate()?;

    let chain =
        ChainRestClient::connect(&settings.chain.sdk_rest_url, &settings.chain.mnemonic).await?;
    let ids = bootstrap::create_collection_and_token(&chain, &settings.owner_address).await?;

    println!("✅ Collection created and empty token has been minted.");
    println!("Please add these env vars to the .env file or env vault:\n");
    println!("COLLECTION_ID={}", ids.collection_id);
    println!("TOKEN_ID={}", ids.token_id);
    Ok(())
}

async fn update_once() -> Result<()> {
    let settings = UpdateSettings::from_env()?;
    settings.validate()?;

    let engine = build_update_engine(settings).await?;
    let outcome = engine.run().await?;

    println!(
        "✅ Token {}/{} updated, cid {}, fee {:.3} {}",
        outcome.token.collection_id, outcome.token.token_id, outcome.cid, outcome.fee, outcome.unit
    );
    Ok(())
}

async fn run_on_cron() -> Result<()> {
    let settings = CronSettings::from_env()?;
    settings.validate()?;

    let interval = Duration::from_secs(settings.interval_secs);
    let engine = build_update_engine(settings.update).await?;

    FixedScheduler::new(interval).run(&engine).await
}

async fn build_update_engine(
    settings: UpdateSettings,
) -> Result<RunEngine<UpdatePipeline<HttpDataSource, LocalStorage, IpfsUploader, ChainRestClient>>>
{
    let source = HttpDataSource::new(settings.api);
    let renderer = TokenImageRenderer::new(
        LocalStorage::new(settings.render.assets_dir),
        LocalStorage::new(settings.render.output_dir),
    );
    let blobs = IpfsUploader::new(&settings.chain.ipfs_rest_url);
    let chain =
        ChainRestClient::connect(&settings.chain.sdk_rest_url, &settings.chain.mnemonic).await?;

    let pipeline = UpdatePipeline::new(
        source,
        renderer,
        blobs,
        chain,
        TokenRef {
            collection_id: settings.collection_id,
            token_id: settings.token_id,
        },
    );
    Ok(RunEngine::new(pipeline))
}
