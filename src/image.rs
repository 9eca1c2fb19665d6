//! # Object Image
//!
//! The on-disk and in-memory representation of an assembled program: the
//! origin address followed by the program words (§6.1). In memory this is
//! just `ObjectImage { origin, words }`; on disk it is packed as a stream of
//! little-endian `u16`s with the origin as the first word, so the simulator
//! (or any other LC-3 tool) can load it back without depending on this
//! crate's other internals.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// An assembled program: origin address plus the words that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectImage {
    pub origin: u16,
    pub words: Vec<u16>,
}

impl ObjectImage {
    pub fn new(origin: u16, words: Vec<u16>) -> Self {
        Self { origin, words }
    }

    /// Write this image as a packed little-endian `.obj` word stream:
    /// origin, then one word per program word, matching §6.1's
    /// `objectImage[0] = origin, objectImage[1..] = program`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.origin)?;
        for word in &self.words {
            writer.write_u16::<LittleEndian>(*word)?;
        }
        Ok(())
    }

    /// Read a `.obj` word stream previously produced by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        let origin = reader.read_u16::<LittleEndian>()?;
        let mut words = Vec::new();
        loop {
            match reader.read_u16::<LittleEndian>() {
                Ok(word) => words.push(word),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }
        Ok(Self { origin, words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let image = ObjectImage::new(0x3000, vec![0x5020, 0x1025, 0xF025]);
        let mut buf = Vec::new();
        image.write_to(&mut buf).unwrap();
        let read_back = ObjectImage::read_from(&buf[..]).unwrap();
        assert_eq!(image, read_back);
    }

    #[test]
    fn empty_program() {
        let image = ObjectImage::new(0x3000, vec![]);
        let mut buf = Vec::new();
        image.write_to(&mut buf).unwrap();
        let read_back = ObjectImage::read_from(&buf[..]).unwrap();
        assert_eq!(image, read_back);
    }
}
