use std::fmt;

use crate::Error;

pub const FIRMWARE_LEN: usize = 0x400;
pub const CART_BANK_LEN: usize = 0x800;
pub const OUTPUT_BANK_LEN: usize = 0x1000;

/// Unit of the human-readable page numbers in listings.
pub const PAGE_LEN: usize = 0x100;

/// Cartridge sizes the console can address: 2, 4 or 8 KiB.
pub const CART_SIZES: [usize; 3] = [0x800, 0x1000, 0x2000];

/// Where each piece of an output bank lives, relative to the bank start.
pub const CART_OFFSET: usize = FIRMWARE_LEN;
pub const MIRROR_OFFSET: usize = CART_OFFSET + CART_BANK_LEN;

/// The console's 1 KiB boot ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    bytes: [u8; FIRMWARE_LEN],
}

impl FirmwareImage {
    /// Exactly [`FIRMWARE_LEN`] bytes, or an error saying which way it's off.
    pub fn new(bytes: &[u8]) -> Result<Self, Error> {
        let len = bytes.len();
        if len < FIRMWARE_LEN {
            return Err(Error::TruncatedFirmware { len });
        }
        if len > FIRMWARE_LEN {
            return Err(Error::OversizedFirmware { len });
        }
        Ok(Self::padded(bytes))
    }

    /// Zero-pad short input, drop anything past the first KiB.
    pub fn padded(bytes: &[u8]) -> Self {
        let mut out = [0; FIRMWARE_LEN];
        let n = bytes.len().min(FIRMWARE_LEN);
        out[..n].copy_from_slice(&bytes[..n]);
        Self { bytes: out }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeImage {
    bytes: Vec<u8>,
}

impl CartridgeImage {
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        let len = bytes.len();
        if !CART_SIZES.contains(&len) {
            return Err(Error::UnsupportedCartridgeSize { len });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 2 KiB banks, in order.
    pub fn banks(&self) -> impl Iterator<Item = &[u8]> + Clone + '_ {
        self.bytes.chunks_exact(CART_BANK_LEN)
    }

    pub fn bank_count(&self) -> usize {
        self.bytes.len() / CART_BANK_LEN
    }
}

/// Flattened firmware + cartridge image, one 4 KiB bank per cartridge bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    bytes: Vec<u8>,
}

impl OutputImage {
    pub(crate) fn from_banks(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len() % OUTPUT_BANK_LEN, 0);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn banks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.bytes.chunks_exact(OUTPUT_BANK_LEN)
    }

    pub fn bank_count(&self) -> usize {
        self.bytes.len() / OUTPUT_BANK_LEN
    }

    /// Which part of which bank `offset` falls in. Panics if out of bounds.
    pub fn locate(&self, offset: usize) -> Location {
        assert!(
            offset < self.bytes.len(),
            "offset out of bounds for output image: ${offset:04x}"
        );
        Location::of(offset)
    }
}

/// Human-readable coordinates of an output offset. Banks and pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Firmware { bank: usize, page: usize },
    Cartridge { bank: usize, page: usize },
    /// The A10 shadow of cartridge pages 5..=8.
    Mirror { bank: usize, page: usize },
}

impl Location {
    fn of(offset: usize) -> Self {
        let bank = offset / OUTPUT_BANK_LEN + 1;
        let within = offset % OUTPUT_BANK_LEN;
        match within {
            0..CART_OFFSET => Self::Firmware {
                bank,
                page: within / PAGE_LEN + 1,
            },
            CART_OFFSET..MIRROR_OFFSET => Self::Cartridge {
                bank,
                page: (within - CART_OFFSET) / PAGE_LEN + 1,
            },
            // Numbered like the cartridge pages it shadows.
            _ => Self::Mirror {
                bank,
                page: (within - CART_BANK_LEN) / PAGE_LEN + 1,
            },
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Firmware { bank, page } => write!(f, "bios, bank {bank}, page {page}"),
            Self::Cartridge { bank, page } => write!(f, "cart, bank {bank}, page {page}"),
            Self::Mirror { bank, page } => write!(f, "mirror, bank {bank}, page {page}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0x800)]
    #[test_case(0x1000)]
    #[test_case(0x2000)]
    fn supported_cartridge(len: usize) {
        let cart = CartridgeImage::new(vec![0; len]).unwrap();
        assert_eq!(cart.bank_count(), len / CART_BANK_LEN);
        assert_eq!(cart.banks().count(), cart.bank_count());
    }

    #[test_case(0)]
    #[test_case(0x400; "1 KiB")]
    #[test_case(0x7ff)]
    #[test_case(0x801)]
    #[test_case(0x1800; "6 KiB")]
    #[test_case(0x4000; "16 KiB")]
    fn unsupported_cartridge(len: usize) {
        let result = CartridgeImage::new(vec![0; len]);
        assert_eq!(result, Err(Error::UnsupportedCartridgeSize { len }));
    }

    #[test]
    fn firmware_exact() {
        let bytes: Vec<u8> = (0..FIRMWARE_LEN).map(|i| i as u8).collect();
        let fw = FirmwareImage::new(&bytes).unwrap();
        assert_eq!(fw.as_bytes(), &bytes[..]);
    }

    #[test]
    fn firmware_wrong_size() {
        assert_eq!(
            FirmwareImage::new(&[1, 2, 3]),
            Err(Error::TruncatedFirmware { len: 3 })
        );
        assert_eq!(
            FirmwareImage::new(&[0; 0x401]),
            Err(Error::OversizedFirmware { len: 0x401 })
        );
    }

    #[test]
    fn firmware_padded() {
        let fw = FirmwareImage::padded(&[0xaa, 0xbb]);
        assert_eq!(fw.as_bytes()[..3], [0xaa, 0xbb, 0]);
        assert!(fw.as_bytes()[2..].iter().all(|&b| b == 0));

        let long: Vec<u8> = vec![0x11; 0x400].into_iter().chain([0x22; 10]).collect();
        let fw = FirmwareImage::padded(&long);
        assert!(fw.as_bytes().iter().all(|&b| b == 0x11));
    }

    #[test_case(0x0000, Location::Firmware { bank: 1, page: 1 })]
    #[test_case(0x03ff, Location::Firmware { bank: 1, page: 4 })]
    #[test_case(0x0400, Location::Cartridge { bank: 1, page: 1 })]
    #[test_case(0x0bff, Location::Cartridge { bank: 1, page: 8 })]
    #[test_case(0x0c00, Location::Mirror { bank: 1, page: 5 })]
    #[test_case(0x0fff, Location::Mirror { bank: 1, page: 8 })]
    #[test_case(0x1000, Location::Firmware { bank: 2, page: 1 })]
    #[test_case(0x3500, Location::Cartridge { bank: 4, page: 2 })]
    fn locate(offset: usize, expected: Location) {
        let out = OutputImage::from_banks(vec![0; 0x4000]);
        assert_eq!(out.locate(offset), expected);
    }

    #[test]
    fn location_display() {
        let loc = Location::Mirror { bank: 2, page: 6 };
        assert_eq!(loc.to_string(), "mirror, bank 2, page 6");
    }
}
