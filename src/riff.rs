//! Splitting a RIFF container into its top-level chunks.
//!
//! The splitter validates the `RIFF`/`WAVE` headers, then scans the chunk
//! list sequentially. Payloads of descriptive chunks (`fmt `, `fact`,
//! `LIST`, ...) are buffered; the raw-audio `data` chunk is skipped over
//! and only its position recorded, so arbitrarily large audio payloads
//! are never held in memory.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

/// A four-character chunk identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// The format-description chunk.
    pub const FMT: ChunkId = ChunkId(*b"fmt ");
    /// The raw-audio chunk.
    pub const DATA: ChunkId = ChunkId(*b"data");
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// Error splitting a stream into RIFF chunks.
#[derive(Debug, thiserror::Error)]
pub enum RiffError {
    #[error("stream does not start with a RIFF header")]
    NotRiff,
    #[error("RIFF stream does not carry a WAVE form")]
    NotWave,
    #[error("could not read from the underlying stream")]
    Io(#[from] io::Error),
}

/// One top-level chunk of the container.
#[derive(Debug)]
pub struct Chunk {
    id: ChunkId,
    size: u32,
    offset: u64,
    payload: Option<Vec<u8>>,
}

impl Chunk {
    /// The chunk's four-character identifier.
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Payload length declared in the chunk header. The stream may hold
    /// fewer bytes if the container is truncated.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Byte offset of the payload's first byte in the source stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The buffered payload, or `None` for the deferred `data` chunk.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

/// The parsed top-level chunk list of a WAVE form.
#[derive(Debug)]
pub struct ChunkList {
    chunks: Vec<Chunk>,
}

impl ChunkList {
    /// Reads the container header and scans every top-level chunk.
    ///
    /// The scan is tolerant of a truncated final chunk: it stops where the
    /// stream ends and returns the chunks seen so far.
    pub fn parse<R>(source: &mut R) -> Result<ChunkList, RiffError>
    where
        R: Read + Seek,
    {
        let mut header = [0u8; 12];
        source.read_exact(&mut header)?;
        if &header[0..4] != b"RIFF" {
            return Err(RiffError::NotRiff);
        }
        let declared = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;
        if &header[8..12] != b"WAVE" {
            return Err(RiffError::NotWave);
        }

        let mut chunks = Vec::new();
        // The WAVE form tag counts toward the declared RIFF length.
        let mut consumed = 4u64;
        while consumed + 8 <= declared {
            let mut head = [0u8; 8];
            match source.read_exact(&mut head) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
            let id = ChunkId([head[0], head[1], head[2], head[3]]);
            let size = u32::from_le_bytes([head[4], head[5], head[6], head[7]]);
            let offset = source.stream_position()?;

            let payload = if id == ChunkId::DATA {
                source.seek(SeekFrom::Current(size as i64))?;
                None
            } else {
                let mut buf = Vec::new();
                source.by_ref().take(size as u64).read_to_end(&mut buf)?;
                Some(buf)
            };
            chunks.push(Chunk {
                id,
                size,
                offset,
                payload,
            });

            consumed += 8 + size as u64;
            if size % 2 == 1 {
                // chunk payloads are padded to even byte boundaries
                source.seek(SeekFrom::Current(1))?;
                consumed += 1;
            }
        }

        Ok(ChunkList { chunks })
    }

    /// Returns the first chunk carrying `id`, scanning in stream order.
    pub fn find(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.id == id)
    }

    /// All top-level chunks in stream order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn container(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (id, payload) in chunks {
            body.extend_from_slice(*id);
            body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            body.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                body.push(0);
            }
        }
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(&body);
        bytes
    }

    #[test]
    fn splits_chunks_in_order() {
        let bytes = container(&[(b"fmt ", &[1; 16]), (b"data", &[2; 8])]);
        let chunks = ChunkList::parse(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(chunks.chunks().len(), 2);
        assert_eq!(chunks.chunks()[0].id(), ChunkId::FMT);
        assert_eq!(chunks.chunks()[0].size(), 16);
        assert_eq!(chunks.chunks()[0].payload(), Some(&[1u8; 16][..]));
        assert_eq!(chunks.chunks()[1].id(), ChunkId::DATA);
        assert_eq!(chunks.chunks()[1].size(), 8);
        assert_eq!(chunks.chunks()[1].payload(), None);
        assert_eq!(chunks.chunks()[1].offset(), 12 + 8 + 16 + 8);
    }

    #[test]
    fn odd_sized_chunks_are_padded() {
        let bytes = container(&[(b"fact", &[9; 5]), (b"data", &[0; 2])]);
        let chunks = ChunkList::parse(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(chunks.chunks().len(), 2);
        assert_eq!(chunks.find(ChunkId::DATA).unwrap().size(), 2);
    }

    #[test]
    fn find_returns_first_match() {
        let bytes = container(&[(b"data", &[1; 4]), (b"data", &[2; 4])]);
        let chunks = ChunkList::parse(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(chunks.find(ChunkId::DATA).unwrap().offset(), 12 + 8);
        assert!(chunks.find(ChunkId::FMT).is_none());
    }

    #[test]
    fn rejects_foreign_headers() {
        let err = ChunkList::parse(&mut Cursor::new(b"OggS\0\0\0\0\0\0\0\0".to_vec()));
        assert!(matches!(err, Err(RiffError::NotRiff)));

        let mut bytes = container(&[]);
        bytes[8..12].copy_from_slice(b"AVI ");
        let err = ChunkList::parse(&mut Cursor::new(bytes));
        assert!(matches!(err, Err(RiffError::NotWave)));
    }

    #[test]
    fn tolerates_truncated_final_chunk() {
        let mut bytes = container(&[(b"fmt ", &[0; 16]), (b"data", &[7; 100])]);
        bytes.truncate(bytes.len() - 90);
        let chunks = ChunkList::parse(&mut Cursor::new(bytes)).unwrap();

        // the data chunk header was intact, so the chunk is still listed
        assert_eq!(chunks.chunks().len(), 2);
        assert_eq!(chunks.find(ChunkId::DATA).unwrap().size(), 100);
    }

    #[test]
    fn chunk_id_display() {
        assert_eq!(ChunkId::FMT.to_string(), "fmt ");
        assert_eq!(ChunkId([0x64, 0x61, 0x74, 0x01]).to_string(), "dat\\x01");
    }
}
