use tracing::debug;

use crate::core::params::EnhancementOptions;
use crate::core::processing::composite::{LogoOverlay, composite};
use crate::core::processing::enhance::enhance;
use crate::core::raster::RasterBuffer;
use crate::error::Result;

/// Run one image through the full transform: enhancement, then the logo if any.
pub fn process_raster(
    image: &RasterBuffer,
    enhancement: &EnhancementOptions,
    logo: Option<&LogoOverlay>,
) -> Result<RasterBuffer> {
    let enhanced = enhance(image, enhancement);
    match logo {
        Some(overlay) => composite(&enhanced, overlay),
        None => {
            debug!("No logo supplied, skipping composite");
            Ok(enhanced)
        }
    }
}
