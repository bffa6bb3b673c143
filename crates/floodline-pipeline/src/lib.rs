//! Floodline pipeline - the three batch stages
//!
//! Stages run independently and hand data forward through GeoJSON files:
//! fetch writes the building footprints, the proximity filter narrows them to
//! a river buffer, and the tier generator produces concentric hazard buffers.
//! No stage keeps state beyond its output file.

pub mod fetch;
pub mod proximity;
pub mod tiers;
