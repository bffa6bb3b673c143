use crate::cli::FilterArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use floodline_core::config::PipelineConfig;
use floodline_pipeline::proximity::filter_by_river_proximity;

pub fn execute(args: FilterArgs, config: &PipelineConfig, output: &OutputWriter) -> Result<()> {
    output.info(format!(
        "Filtering footprints to within {} mile(s) of rivers...",
        config.proximity.buffer_miles
    ));
    let count = filter_by_river_proximity(&args.rivers, &args.footprints, &args.out, config)?;

    output.success(format!(
        "Saved {} footprints within {} mile(s) of rivers to {}",
        count,
        config.proximity.buffer_miles,
        args.out.display()
    ));
    Ok(())
}
