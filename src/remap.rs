use tracing::debug;

use crate::{
    image::{
        CartridgeImage, FirmwareImage, OutputImage, CART_BANK_LEN, CART_OFFSET, FIRMWARE_LEN,
        MIRROR_OFFSET, OUTPUT_BANK_LEN,
    },
    Error,
};

/// How cartridge banks are spread over the output image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// One output bank per cartridge bank; output is twice the cartridge size.
    #[default]
    Proportional,
    /// Always two output banks (8 KiB). A 2 KiB cartridge fills both; 8 KiB
    /// cartridges don't fit.
    #[value(name = "fixed8k")]
    Fixed8k,
}

impl Layout {
    /// Which cartridge bank feeds each output bank.
    fn bank_sources(self, cart: &CartridgeImage) -> Result<Vec<usize>, Error> {
        let n = cart.bank_count();
        match (self, n) {
            (Self::Proportional, _) => Ok((0..n).collect()),
            (Self::Fixed8k, 1) => Ok(vec![0, 0]),
            (Self::Fixed8k, 2) => Ok(vec![0, 1]),
            (Self::Fixed8k, _) => Err(Error::UnsupportedCartridgeSize { len: cart.len() }),
        }
    }
}

/// Interleave the firmware with each cartridge bank, mirroring the upper half
/// of every bank for the missing A10 line.
///
/// Bank layout (4 KiB per cartridge bank):
/// * `$000..$400`: firmware
/// * `$400..$c00`: cartridge bank
/// * `$c00..$1000`: second KiB of the cartridge bank, again
pub fn remap(firmware: &FirmwareImage, cartridge: &CartridgeImage) -> OutputImage {
    let sources: Vec<usize> = (0..cartridge.bank_count()).collect();
    build(firmware, cartridge, &sources)
}

pub fn remap_with(
    layout: Layout,
    firmware: &FirmwareImage,
    cartridge: &CartridgeImage,
) -> Result<OutputImage, Error> {
    let sources = layout.bank_sources(cartridge)?;
    Ok(build(firmware, cartridge, &sources))
}

fn build(firmware: &FirmwareImage, cartridge: &CartridgeImage, sources: &[usize]) -> OutputImage {
    let cart_banks: Vec<&[u8]> = cartridge.banks().collect();

    let mut bytes = vec![0; sources.len() * OUTPUT_BANK_LEN];
    for (out_bank, (i, &src)) in bytes
        .chunks_exact_mut(OUTPUT_BANK_LEN)
        .zip(sources.iter().enumerate())
    {
        debug!("output bank {} <- cartridge bank {}", i + 1, src + 1);
        fill_bank(out_bank, firmware.as_bytes(), cart_banks[src]);
    }

    debug!(
        "remapped {} KiB as {} KiB",
        cartridge.len() / 1024,
        bytes.len() / 1024
    );
    OutputImage::from_banks(bytes)
}

fn fill_bank(out: &mut [u8], firmware: &[u8], cart_bank: &[u8]) {
    debug_assert_eq!(out.len(), OUTPUT_BANK_LEN);
    debug_assert_eq!(cart_bank.len(), CART_BANK_LEN);

    out[..FIRMWARE_LEN].copy_from_slice(firmware);
    out[CART_OFFSET..MIRROR_OFFSET].copy_from_slice(cart_bank);
    out.copy_within(MIRROR_OFFSET - FIRMWARE_LEN..MIRROR_OFFSET, MIRROR_OFFSET);
}
