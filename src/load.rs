use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    image::{CartridgeImage, FirmwareImage},
    Error,
};

/// Read a firmware dump. Short files are zero-padded and long ones cut to
/// 1 KiB, with a warning either way.
pub fn firmware(path: &Path) -> Result<FirmwareImage> {
    let bytes = read(path)?;
    match FirmwareImage::new(&bytes) {
        Ok(fw) => Ok(fw),
        Err(e @ (Error::TruncatedFirmware { .. } | Error::OversizedFirmware { .. })) => {
            warn!("{}: {e}; using the first KiB, zero-padded", path.display());
            Ok(FirmwareImage::padded(&bytes))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cartridge(path: &Path) -> Result<CartridgeImage> {
    let bytes = read(path)?;
    let cart = CartridgeImage::new(bytes).with_context(|| path.display().to_string())?;
    info!(
        "{}: cartridge is {} KiB ({} banks)",
        path.display(),
        cart.len() / 1024,
        cart.bank_count()
    );
    Ok(cart)
}

/// Any file, as-is. For images that get annotated rather than remapped.
pub fn raw(path: &Path) -> Result<Vec<u8>> {
    let bytes = read(path)?;
    info!("{}: {} bytes", path.display(), bytes.len());
    Ok(bytes)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
