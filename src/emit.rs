//! Text renderings of images: a C array for embedding, and a bit-by-bit
//! listing for eyeballing.

use std::{
    io::{self, Write},
    ops::RangeInclusive,
};

use itertools::Itertools;
use tracing::warn;

use crate::{
    annotate::{self, annotate, AnnotatedByte, Class},
    image::OutputImage,
    OperandOutOfRange,
};

const TOOL: &str = env!("CARGO_PKG_NAME");

const BYTES_PER_ROW: usize = 16;

/// Blank line between groups of this many records.
const RECORDS_PER_GROUP: usize = 8;

/// File names to mention in the generated source.
#[derive(Debug, Clone, Copy)]
pub struct Sources<'a> {
    pub firmware: &'a str,
    pub cartridge: &'a str,
}

/// `uint8_t rom[ROM_SIZE] = { ... };`, 16 bytes per line, each line tagged
/// with its byte range and where it sits in the bank layout.
pub fn c_source(out: &mut dyn Write, image: &OutputImage, sources: Sources) -> io::Result<()> {
    let Sources {
        firmware,
        cartridge,
    } = sources;
    let kib = image.len() / 1024;

    writeln!(out, "//")?;
    writeln!(
        out,
        "// {TOOL}: processing file {firmware} (BIOS) and {cartridge} (cartridge) mapped as {kib} kB"
    )?;
    writeln!(out, "//")?;
    writeln!(out)?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out)?;
    writeln!(out, "#define BIOS_NAME \"{firmware}\"")?;
    writeln!(out, "#define ROM_NAME \"{cartridge}\"")?;
    writeln!(out, "#define ROM_SIZE {}", image.len())?;
    writeln!(out)?;
    writeln!(out, "uint8_t rom[ROM_SIZE] = {{")?;

    let rows = image.as_bytes().chunks(BYTES_PER_ROW);
    let last = rows.len().saturating_sub(1);
    for (i, row) in rows.enumerate() {
        let start = i * BYTES_PER_ROW;
        let end = start + row.len() - 1;
        let bytes = row.iter().map(|b| format!("0x{b:02X}")).join(",");
        let comma = if i == last { "" } else { "," };
        writeln!(
            out,
            "\t{bytes}{comma}\t// bytes 0x{start:04X} <-> 0x{end:04X}\t({})",
            image.locate(start)
        )?;
    }

    writeln!(out, "}};")?;
    writeln!(
        out,
        "// {TOOL}: end of processing files {firmware} and {cartridge}"
    )?;
    Ok(())
}

/// One line per byte: page, offsets, value, its bits drawn LSB first, and
/// whatever the annotator recognized.
///
/// `range` restricts the listing; operands are still read from the whole image.
pub fn bitmap(
    out: &mut dyn Write,
    image: &[u8],
    name: &str,
    range: Option<RangeInclusive<usize>>,
) -> io::Result<()> {
    let (start, end) = match range {
        Some(r) => (*r.start(), r.end().saturating_add(1).min(image.len())),
        None => (0, image.len()),
    };

    writeln!(out, "//")?;
    writeln!(
        out,
        "// {TOOL}: processing file {name} (cartridge ROM), size {} kB",
        image.len() / 1024
    )?;
    writeln!(out, "//")?;

    for record in annotate(image)
        .skip(start)
        .take(end.saturating_sub(start))
    {
        match record {
            Ok(record) => {
                if record.offset % RECORDS_PER_GROUP == 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{}", BitmapLine(&record))?;
            }
            Err(e @ OperandOutOfRange { offset, opcode }) => {
                warn!("{name}: {e}");
                if offset % RECORDS_PER_GROUP == 0 {
                    writeln!(out)?;
                }
                write_prefix(out, offset, opcode)?;
                writeln!(out, "\t?? (operand past end of image)")?;
            }
        }
    }

    writeln!(out, "//")?;
    writeln!(out, "// {TOOL}: end of file {name}")?;
    writeln!(out, "//")?;
    Ok(())
}

struct BitmapLine<'a>(&'a AnnotatedByte);

impl std::fmt::Display for BitmapLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.0;
        write!(
            f,
            "Page {}\t0x{:02x} (0x{:04X})\t0x{:02X}\t{}",
            record.page(),
            record.page_offset(),
            record.offset,
            record.value,
            cells(record.bits)
        )?;
        // Illegal opcodes are classified, not printed.
        if record.class == Class::Jump {
            write!(f, "\tJmp op-code")?;
        }
        if let Some(m) = record.mnemonic {
            write!(f, "\t{m}")?;
        }
        Ok(())
    }
}

fn write_prefix(out: &mut dyn Write, offset: usize, value: u8) -> io::Result<()> {
    write!(
        out,
        "Page {}\t0x{:02x} (0x{offset:04X})\t0x{value:02X}\t{}",
        annotate::page(offset),
        offset % 0x100,
        cells(annotate::bits(value))
    )
}

fn cells(bits: [bool; 8]) -> String {
    bits.iter().map(|&on| if on { "OO" } else { "  " }).collect()
}
