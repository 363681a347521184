use anyhow::Context;
use clap::Parser;
use lead_etl::utils::logger;
use lead_etl::{CleaningPipeline, CliConfig, CrmMapper};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("starting lead-etl");

    let app_config = cli
        .resolve_app_config()
        .context("configuration is invalid")?;

    let pipeline = CleaningPipeline::new();
    let (unified, stats) = pipeline
        .process(&cli.files)
        .context("cleaning pipeline failed")?;

    let mapper = CrmMapper::new(app_config.managers.clone(), app_config.crm_config());
    let records = mapper.map(&unified);

    let output_path = cli.output_path();
    lead_etl::write_crm_csv(&output_path, &records)
        .with_context(|| format!("could not write {}", output_path.display()))?;

    println!(
        "Done: {} rows read, {} dropped without phones, {} duplicates removed, {} exported to {}",
        stats.total_rows,
        stats.removed_empty_phones,
        stats.removed_duplicates,
        stats.final_rows,
        output_path.display()
    );

    Ok(())
}
