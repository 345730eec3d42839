//! Tools for Odyssey² ROM images: flatten firmware and cartridge dumps into a
//! single image that tolerates the console's missing A10 line, and annotate
//! images byte by byte.

pub mod annotate;
pub mod emit;
mod error;
pub mod hex;
pub mod image;
pub mod load;
pub mod remap;

pub use annotate::{annotate, AnnotatedByte, Class};
pub use error::{Error, OperandOutOfRange};
pub use image::{CartridgeImage, FirmwareImage, Location, OutputImage};
pub use remap::{remap, remap_with, Layout};
