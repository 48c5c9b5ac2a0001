use file_crush::engine::codec::CodecRegistry;
use file_crush::engine::job::CrushJob;
use file_crush::logging;
use file_crush::shared::config::CONFIG;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(&CONFIG.logging)?;
    info!("FileCrush is starting...");

    let job = CrushJob::from_settings(&CONFIG, &CodecRegistry::with_defaults())?;
    let report = job.run().await?;

    info!(
        directories = report.directories,
        buckets = report.buckets,
        files = report.counters.files_merged,
        records = report.counters.records_merged,
        "FileCrush finished"
    );
    Ok(())
}
