//! Per-byte classification of a ROM image, for eyeballing its contents.
//!
//! This is not a disassembler: it only knows a handful of opcodes, and every
//! byte is annotated on its own regardless of instruction boundaries.

mod opcode;

use std::{fmt, iter::FusedIterator};

pub use opcode::{ILLEGAL_OPS, JUMP_OPS};

use crate::{image::PAGE_LEN, OperandOutOfRange};
use opcode::Operand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Normal,
    Jump,
    Illegal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mnemonic {
    pub name: &'static str,
    pub operand: Option<u8>,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(arg) = self.operand {
            write!(f, " = 0x{arg:02X}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedByte {
    pub offset: usize,
    pub value: u8,
    /// Least-significant bit first.
    pub bits: [bool; 8],
    pub class: Class,
    pub mnemonic: Option<Mnemonic>,
}

impl AnnotatedByte {
    /// 1-based page number, cycling through 1..=8 every 2 KiB.
    pub fn page(&self) -> usize {
        page(self.offset)
    }

    /// Offset within the page.
    pub fn page_offset(&self) -> u8 {
        (self.offset % PAGE_LEN) as u8
    }
}

pub fn page(offset: usize) -> usize {
    offset / PAGE_LEN % 8 + 1
}

pub fn bits(value: u8) -> [bool; 8] {
    std::array::from_fn(|i| value & 1 << i != 0)
}

/// Annotate every byte of `image`, in offset order.
///
/// A byte whose operand would lie past the end of the image yields
/// [`OperandOutOfRange`] in place of its record; iteration carries on.
pub fn annotate(image: &[u8]) -> Annotations<'_> {
    Annotations { image, offset: 0 }
}

#[derive(Debug, Clone)]
pub struct Annotations<'a> {
    image: &'a [u8],
    offset: usize,
}

impl Annotations<'_> {
    fn annotate_at(&self, offset: usize) -> Result<AnnotatedByte, OperandOutOfRange> {
        let value = self.image[offset];
        let entry = opcode::lookup(value);

        let mnemonic = match entry.instr {
            None => None,
            Some(instr) => {
                let operand = match instr.operand {
                    Operand::None => None,
                    Operand::Direct => {
                        let arg = self.image.get(offset + 1).copied().ok_or(
                            OperandOutOfRange {
                                offset,
                                opcode: value,
                            },
                        )?;
                        Some(arg)
                    }
                };
                Some(Mnemonic {
                    name: instr.name,
                    operand,
                })
            }
        };

        Ok(AnnotatedByte {
            offset,
            value,
            bits: bits(value),
            class: entry.class,
            mnemonic,
        })
    }
}

impl Iterator for Annotations<'_> {
    type Item = Result<AnnotatedByte, OperandOutOfRange>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.image.len() {
            return None;
        }
        let item = self.annotate_at(self.offset);
        self.offset += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.image.len() - self.offset;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Annotations<'_> {}

impl FusedIterator for Annotations<'_> {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use test_case::test_case;

    use super::*;

    fn one(value: u8) -> AnnotatedByte {
        annotate(&[value, 0x5a]).next().unwrap().unwrap()
    }

    #[test]
    fn one_record_per_byte() {
        let image: Vec<u8> = (0..=u8::MAX).cycle().take(0x900).collect();
        let records: Vec<_> = annotate(&image).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), image.len());
        assert!(records.iter().tuple_windows().all(|(a, b)| a.offset + 1 == b.offset));
        assert!(records.iter().all(|r| r.value == image[r.offset]));
    }

    #[test]
    fn restartable() {
        let image = [0x23, 0x10, 0x04, 0x00, 0x3b, 0x81];
        let first = annotate(&image).collect_vec();
        let second = annotate(&image).collect_vec();
        assert_eq!(first, second);

        let it = annotate(&image);
        assert_eq!(it.clone().collect_vec(), it.collect_vec());
    }

    #[test]
    fn empty_image() {
        assert_eq!(annotate(&[]).count(), 0);
    }

    #[test_case(0x00, [false; 8])]
    #[test_case(0x01, [true, false, false, false, false, false, false, false])]
    #[test_case(0x80, [false, false, false, false, false, false, false, true])]
    #[test_case(0xa5, [true, false, true, false, false, true, false, true])]
    #[test_case(0xff, [true; 8])]
    fn bit_pattern(value: u8, expected: [bool; 8]) {
        assert_eq!(bits(value), expected);
    }

    #[test_case(0x0000, 1, 0x00)]
    #[test_case(0x00ff, 1, 0xff)]
    #[test_case(0x0100, 2, 0x00)]
    #[test_case(0x07ff, 8, 0xff)]
    #[test_case(0x0800, 1, 0x00; "wraps every 2 KiB")]
    #[test_case(0x0a42, 3, 0x42)]
    fn page_coordinates(offset: usize, page: usize, page_offset: u8) {
        let image = vec![0; offset + 1];
        let record = annotate(&image).nth(offset).unwrap().unwrap();
        assert_eq!(record.page(), page);
        assert_eq!(record.page_offset(), page_offset);
    }

    #[test_case(0x04, Class::Jump)]
    #[test_case(0xe4, Class::Jump)]
    #[test_case(0x3b, Class::Illegal)]
    #[test_case(0xf3, Class::Illegal)]
    #[test_case(0x00, Class::Normal)]
    #[test_case(0x05, Class::Normal)]
    #[test_case(0x23, Class::Normal)]
    fn classification(value: u8, expected: Class) {
        assert_eq!(one(value).class, expected);
    }

    #[test_case(0x00, "Nop")]
    #[test_case(0xa3, "MOVP A, @A")]
    #[test_case(0xe3, "MOVP3 A, @A")]
    #[test_case(0x83, "RET")]
    #[test_case(0x93, "RETR")]
    #[test_case(0x80, "MOVX A, @R0")]
    #[test_case(0x81, "MOVX A, @R0"; "81 reads like 80")]
    #[test_case(0x90, "MOVX @R0, A")]
    #[test_case(0x91, "MOVX @R1, A")]
    fn mnemonic(value: u8, expected: &str) {
        let m = one(value).mnemonic.unwrap();
        assert_eq!(m.to_string(), expected);
        assert_eq!(m.operand, None);
    }

    #[test_case(0x01)]
    #[test_case(0x04)]
    #[test_case(0x42)]
    #[test_case(0xff)]
    fn no_mnemonic(value: u8) {
        assert_eq!(one(value).mnemonic, None);
    }

    #[test]
    fn mov_direct_reads_next_byte() {
        let image = [0x23, 0x7f, 0x00];
        let records = annotate(&image).collect_vec();
        let mov = records[0].as_ref().unwrap().mnemonic.unwrap();
        assert_eq!(mov.operand, Some(0x7f));
        assert_eq!(mov.to_string(), "MOV A, direct = 0x7F");

        // The operand byte still gets its own record.
        assert_eq!(records[1].as_ref().unwrap().value, 0x7f);
    }

    #[test]
    fn mov_direct_at_end() {
        let records = annotate(&[0x23]).collect_vec();
        assert_eq!(
            records,
            [Err(OperandOutOfRange {
                offset: 0,
                opcode: 0x23
            })]
        );
    }

    #[test]
    fn out_of_range_into_crate_error() {
        let err = annotate(&[0x23]).next().unwrap().unwrap_err();
        let crate_err = crate::Error::from(err);
        assert_eq!(crate_err, crate::Error::OperandOutOfRange(err));
        assert_eq!(
            crate_err.to_string(),
            "operand of opcode $23 at offset $0000 is past the end of the image"
        );
    }

    #[test]
    fn out_of_range_does_not_stop_iteration() {
        let image = [0x00, 0x23, 0x23];
        let records = annotate(&image).collect_vec();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert_eq!(records[1].as_ref().unwrap().mnemonic.unwrap().operand, Some(0x23));
        assert_eq!(
            records[2],
            Err(OperandOutOfRange {
                offset: 2,
                opcode: 0x23
            })
        );
    }
}
