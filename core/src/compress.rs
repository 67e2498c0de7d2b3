use crate::dictionary::Posting;
use anyhow::{bail, Result};
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

pub const NO_COMPRESSOR_ID: u32 = 0;
pub const VBYTE_COMPRESSOR_ID: u32 = 1;

/// Posting-list encoding strategy seam.
///
/// Every encoding must be self-delimiting: a reader positioned at the start
/// of a block must be able to consume exactly that block, since posting lists
/// are written back-to-back with no separator.
pub trait Compressor {
    /// Tag written into the file header so a reader can select the matching
    /// decoder without external configuration.
    fn id(&self) -> u32;

    /// Serialize `postings` as one self-delimiting block.
    fn compress(&self, out: &mut dyn Write, postings: &[Posting]) -> Result<()>;

    /// Inverse of `compress`; reads exactly one block.
    fn decompress(&self, input: &mut dyn Read) -> Result<Vec<Posting>>;
}

/// Baseline strategy: an entry count followed by fixed-width records, copied
/// verbatim. Used when no compressor is configured.
pub struct NoCompressor;

impl Compressor for NoCompressor {
    fn id(&self) -> u32 {
        NO_COMPRESSOR_ID
    }

    fn compress(&self, out: &mut dyn Write, postings: &[Posting]) -> Result<()> {
        out.write_u32::<NativeEndian>(postings.len() as u32)?;
        for posting in postings {
            out.write_u32::<NativeEndian>(posting.doc_id)?;
            out.write_u32::<NativeEndian>(posting.term_freq)?;
        }
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read) -> Result<Vec<Posting>> {
        let len = input.read_u32::<NativeEndian>()? as usize;
        let mut postings = Vec::with_capacity(len);
        for _ in 0..len {
            postings.push(Posting {
                doc_id: input.read_u32::<NativeEndian>()?,
                term_freq: input.read_u32::<NativeEndian>()?,
            });
        }
        Ok(postings)
    }
}

/// Delta-encodes document ids (gaps from the previous id; the first entry is
/// the raw id) and variable-byte encodes everything, entry count included.
pub struct VByteCompressor;

impl Compressor for VByteCompressor {
    fn id(&self) -> u32 {
        VBYTE_COMPRESSOR_ID
    }

    fn compress(&self, out: &mut dyn Write, postings: &[Posting]) -> Result<()> {
        let mut buf = Vec::new();
        write_vbyte(&mut buf, postings.len() as u32);
        let mut prev = 0u32;
        for (i, posting) in postings.iter().enumerate() {
            let gap = if i == 0 { posting.doc_id } else { posting.doc_id - prev };
            write_vbyte(&mut buf, gap);
            write_vbyte(&mut buf, posting.term_freq);
            prev = posting.doc_id;
        }
        out.write_all(&buf)?;
        Ok(())
    }

    fn decompress(&self, input: &mut dyn Read) -> Result<Vec<Posting>> {
        let len = read_vbyte(input)? as usize;
        let mut postings = Vec::with_capacity(len);
        let mut prev = 0u32;
        for i in 0..len {
            let gap = read_vbyte(input)?;
            let term_freq = read_vbyte(input)?;
            let doc_id = if i == 0 { gap } else { prev + gap };
            postings.push(Posting { doc_id, term_freq });
            prev = doc_id;
        }
        Ok(postings)
    }
}

// Low seven bits per byte, high bit marks continuation.
fn write_vbyte(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn read_vbyte(input: &mut dyn Read) -> Result<u32> {
    let mut value = 0u32;
    let mut shift = 0u32;
    loop {
        let byte = input.read_u8()?;
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 35 {
            bail!("malformed vbyte value");
        }
    }
}

/// Select the decoder matching a header's compressor id.
pub fn compressor_for_id(id: u32) -> Result<Box<dyn Compressor>> {
    match id {
        NO_COMPRESSOR_ID => Ok(Box::new(NoCompressor)),
        VBYTE_COMPRESSOR_ID => Ok(Box::new(VByteCompressor)),
        other => bail!("unknown compressor id {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Vec<Posting> {
        vec![
            Posting { doc_id: 0, term_freq: 2 },
            Posting { doc_id: 1, term_freq: 1 },
            Posting { doc_id: 300, term_freq: 7 },
            Posting { doc_id: 70_000, term_freq: 1 },
        ]
    }

    fn round_trip(compressor: &dyn Compressor, postings: &[Posting]) -> Vec<Posting> {
        let mut buf = Vec::new();
        compressor.compress(&mut buf, postings).unwrap();
        compressor.decompress(&mut Cursor::new(buf)).unwrap()
    }

    #[test]
    fn vbyte_values_round_trip() {
        for value in [0u32, 1, 127, 128, 300, 16_383, 16_384, u32::MAX] {
            let mut buf = Vec::new();
            write_vbyte(&mut buf, value);
            assert_eq!(read_vbyte(&mut Cursor::new(&buf)).unwrap(), value);
        }
    }

    #[test]
    fn no_compressor_round_trips() {
        assert_eq!(round_trip(&NoCompressor, &sample()), sample());
        assert!(round_trip(&NoCompressor, &[]).is_empty());
    }

    #[test]
    fn vbyte_compressor_round_trips() {
        assert_eq!(round_trip(&VByteCompressor, &sample()), sample());
        assert!(round_trip(&VByteCompressor, &[]).is_empty());
    }

    #[test]
    fn blocks_are_self_delimiting() {
        // Two blocks back-to-back must decode independently.
        let first = sample();
        let second = vec![Posting { doc_id: 9, term_freq: 4 }];
        let mut buf = Vec::new();
        VByteCompressor.compress(&mut buf, &first).unwrap();
        VByteCompressor.compress(&mut buf, &second).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(VByteCompressor.decompress(&mut cursor).unwrap(), first);
        assert_eq!(VByteCompressor.decompress(&mut cursor).unwrap(), second);
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(compressor_for_id(NO_COMPRESSOR_ID).is_ok());
        assert!(compressor_for_id(VBYTE_COMPRESSOR_ID).is_ok());
        assert!(compressor_for_id(99).is_err());
    }
}
