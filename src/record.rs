use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::graph::*;

pub type Result<T> = std::io::Result<T>;

/// A value with a fixed-size little-endian on-disk layout.
pub trait Record: Copy + Sized {
    const SIZE: usize;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;
}

impl Record for Node {
    const SIZE: usize = 8;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(*self)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        reader.read_u64::<LittleEndian>()
    }
}

impl Record for Edge {
    const SIZE: usize = 2 * Node::SIZE;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.0)?;
        writer.write_u64::<LittleEndian>(self.1)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let first = reader.read_u64::<LittleEndian>()?;
        let second = reader.read_u64::<LittleEndian>()?;
        Ok(Edge(first, second))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_layout() {
        let mut buffer = Vec::new();
        Edge(1, 0x0203).write_to(&mut buffer).unwrap();

        assert_eq!(buffer.len(), Edge::SIZE);
        assert_eq!(
            buffer,
            vec![1, 0, 0, 0, 0, 0, 0, 0, 3, 2, 0, 0, 0, 0, 0, 0]
        );

        let edge = Edge::read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(edge, Edge(1, 0x0203));
    }

    #[test]
    fn truncated_record() {
        let buffer = [0u8; 12];
        let err = Edge::read_from(&mut &buffer[..]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
