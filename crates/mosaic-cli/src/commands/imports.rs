//! `mosaic imports`: show the merged services of a platform combination.

use super::print_services;
use crate::output::StyledOutput;
use mosaic_engine::{CompositeServiceSet, TargetPlatform};

pub fn execute(out: &mut StyledOutput, platform: &str) -> anyhow::Result<bool> {
    let platform = TargetPlatform::parse(platform)?;
    let services = CompositeServiceSet::for_platform(&platform);

    out.bold(&platform.to_string());
    out.newline();
    print_services(out, &services);
    Ok(true)
}
