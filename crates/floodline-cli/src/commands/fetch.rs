use crate::cli::FetchArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use floodline_core::config::PipelineConfig;
use floodline_pipeline::fetch::fetch_footprints;

pub async fn execute(args: FetchArgs, config: &PipelineConfig, output: &OutputWriter) -> Result<()> {
    output.info("Downloading OSM buildings from Overpass...");
    let report = fetch_footprints(&args.aoi, &args.out, config).await?;

    if report.skipped > 0 {
        output.warning(format!(
            "Skipped {} Overpass element(s) with malformed geometry",
            report.skipped
        ));
    }
    output.success(format!(
        "Saved {} buildings to {}",
        report.written,
        args.out.display()
    ));
    Ok(())
}
