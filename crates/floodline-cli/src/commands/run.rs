use crate::cli::RunArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use floodline_core::config::PipelineConfig;
use floodline_pipeline::{fetch, proximity, tiers};
use std::fs;

/// Run all three stages back to back, handing files forward through
/// `out_dir` exactly like the standalone subcommands would.
pub async fn execute(args: RunArgs, config: &PipelineConfig, output: &OutputWriter) -> Result<()> {
    fs::create_dir_all(&args.out_dir)?;

    let houses = args.out_dir.join("houses.geojson");
    let near_river = args.out_dir.join("houses_within_1mile.geojson");
    let buffers = args.out_dir.join("house_tiered_buffers.geojson");

    output.info("Stage 1/3: fetching OSM buildings...");
    let report = fetch::fetch_footprints(&args.aoi, &houses, config).await?;
    if report.skipped > 0 {
        output.warning(format!(
            "Skipped {} Overpass element(s) with malformed geometry",
            report.skipped
        ));
    }
    output.success(format!("Saved {} buildings to {}", report.written, houses.display()));

    output.info("Stage 2/3: filtering by river proximity...");
    let kept = proximity::filter_by_river_proximity(&args.rivers, &houses, &near_river, config)?;
    output.success(format!("Saved {} footprints to {}", kept, near_river.display()));

    output.info("Stage 3/3: generating tiered buffers...");
    let tier_count = tiers::generate_tiered_buffers(&near_river, &buffers, config)?;
    output.success(format!("Saved {} tiered buffers to {}", tier_count, buffers.display()));

    Ok(())
}
