use crate::cli::TiersArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use floodline_core::config::PipelineConfig;
use floodline_pipeline::tiers::generate_tiered_buffers;

pub fn execute(args: TiersArgs, config: &PipelineConfig, output: &OutputWriter) -> Result<()> {
    output.info(format!("Generating {} buffer tier(s)...", config.tiers.len()));
    let count = generate_tiered_buffers(&args.footprints, &args.out, config)?;

    output.success(format!(
        "Saved {} tiered buffers to {}",
        count,
        args.out.display()
    ));
    Ok(())
}
