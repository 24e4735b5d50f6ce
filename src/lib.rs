//! Decoding audio samples out of WAV (RIFF) containers.
//!
//! `wavread` splits a WAV stream into its top-level chunks, interprets the
//! `fmt ` chunk into a [`WavFormat`] descriptor, and progressively decodes
//! the `data` chunk into one signed integer value per channel. Linear PCM
//! (8/16/32-bit plus a generic path for other widths), 32-bit IEEE float,
//! A-law and µ-law encodings are supported.
//!
//! Chunk resolution is lazy: the container is split on the first format,
//! duration or sample request, and the format descriptor and data-chunk
//! position are each resolved once and cached. Format and duration
//! queries therefore never advance the audio read position.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use wavread::{WavError, WavReader};
//!
//! # fn main() -> Result<(), WavError> {
//! // An 8 kHz mono 8-bit PCM stream with two samples.
//! let mut bytes = Vec::new();
//! bytes.extend(b"RIFF");
//! bytes.extend(38u32.to_le_bytes());
//! bytes.extend(b"WAVE");
//! bytes.extend(b"fmt ");
//! bytes.extend(16u32.to_le_bytes());
//! bytes.extend(1u16.to_le_bytes()); // PCM
//! bytes.extend(1u16.to_le_bytes()); // mono
//! bytes.extend(8000u32.to_le_bytes());
//! bytes.extend(8000u32.to_le_bytes());
//! bytes.extend(1u16.to_le_bytes());
//! bytes.extend(8u16.to_le_bytes());
//! bytes.extend(b"data");
//! bytes.extend(2u32.to_le_bytes());
//! bytes.extend([0x80, 0x7F]);
//!
//! let mut reader = WavReader::new(Cursor::new(bytes));
//! assert_eq!(reader.format()?.sample_rate, 8000);
//!
//! let samples = reader.read_samples()?;
//! assert_eq!(samples.len(), 2);
//! assert_eq!(samples[0].value(0), -128);
//! assert_eq!(samples[1].value(0), 127);
//! # Ok(())
//! # }
//! ```

mod common;
mod format;
mod math;
mod reader;
pub mod riff;
mod stream;

pub use common::{BitDepth, ChannelCount, SampleRate};
pub use format::{AudioFormat, FormatError, WavFormat};
pub use math::to_signed;
pub use reader::{Sample, WavError, WavReader, DEFAULT_FRAME_COUNT};
pub use riff::{ChunkId, RiffError};
pub use stream::DataStream;
