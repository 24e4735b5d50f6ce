//! Lazy chunk resolution and progressive sample decoding.

use std::io::{self, Read, Seek, SeekFrom};
use std::time::Duration;

use audio_codec_algorithms::{decode_alaw, decode_ulaw};

use crate::format::{AudioFormat, FormatError, WavFormat};
use crate::math::to_signed;
use crate::riff::{Chunk, ChunkId, ChunkList, RiffError};
use crate::stream::DataStream;

/// Frames decoded per [`WavReader::read_samples`] call.
pub const DEFAULT_FRAME_COUNT: u32 = 2048;

/// Error decoding a WAV stream.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// A required chunk is missing from the container.
    #[error("chunk \"{0}\" is not found")]
    ChunkNotFound(ChunkId),
    #[error(transparent)]
    Riff(#[from] RiffError),
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The audio payload is exhausted, or a sample access would have read
    /// past the bytes actually delivered. This is the normal termination
    /// condition for iterative decoding, not a corruption signal.
    #[error("end of audio stream")]
    EndOfStream,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One decoded frame: one signed value per channel, in channel order.
///
/// Values are kept in the integer domain for every encoding; see
/// [`WavReader::float_value`] for the normalized floating-point view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    values: Vec<i64>,
}

impl Sample {
    /// Decoded value of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not below the stream's channel count.
    pub fn value(&self, channel: usize) -> i64 {
        self.values[channel]
    }

    /// All channel values of this frame.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// Progressive decoder for one WAV stream.
///
/// Construction performs no I/O. The chunk list, the format descriptor and
/// the data-chunk position are each resolved on first use and cached for
/// the rest of the session, so format and duration queries never advance
/// the audio read position. The reader drives the source sequentially and
/// is not meant to be shared across threads without external locking.
pub struct WavReader<R> {
    source: R,
    chunks: Option<ChunkList>,
    format: Option<WavFormat>,
    data: Option<DataStream>,
}

impl<R> WavReader<R>
where
    R: Read + Seek,
{
    /// Wraps a byte source carrying a RIFF/WAVE stream.
    pub fn new(source: R) -> WavReader<R> {
        WavReader {
            source,
            chunks: None,
            format: None,
            data: None,
        }
    }

    /// The stream's format descriptor, parsed from the `fmt ` chunk on the
    /// first call and served from cache afterwards.
    pub fn format(&mut self) -> Result<WavFormat, WavError> {
        if let Some(format) = self.format {
            return Ok(format);
        }

        self.ensure_chunks()?;
        let chunk = self.find_chunk(ChunkId::FMT)?;
        let format = WavFormat::parse(chunk.payload().unwrap_or(&[]))?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            tag = format.audio_format.tag(),
            channels = format.channel_count,
            sample_rate = format.sample_rate,
            bits = format.bits_per_sample,
            "parsed format chunk"
        );
        self.format = Some(format);
        Ok(format)
    }

    /// Total duration of the audio, derived from the data chunk's declared
    /// size, the block alignment and the sample rate.
    ///
    /// The result is independent of how much audio has been decoded so
    /// far, and repeated calls do not advance the read position.
    pub fn duration(&mut self) -> Result<Duration, WavError> {
        let format = self.format()?;
        let data = self.ensure_data()?;
        if format.block_align == 0 || format.sample_rate == 0 {
            return Ok(Duration::ZERO);
        }

        let frames = data.declared_size() as f64 / format.block_align as f64;
        Ok(Duration::from_secs_f64(frames / format.sample_rate as f64))
    }

    /// Reads raw audio bytes into `buf`, resolving the data chunk on first
    /// use.
    ///
    /// Returns the bytes actually delivered; `Ok(0)` on a non-empty buffer
    /// means the audio payload is exhausted.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, WavError> {
        self.ensure_data()?;
        match &mut self.data {
            Some(data) => Ok(data.read_from(&mut self.source, buf)?),
            None => Err(WavError::ChunkNotFound(ChunkId::DATA)),
        }
    }

    /// Bytes delivered from the data chunk so far, or `None` before the
    /// first sample or raw-byte read.
    pub fn position(&self) -> Option<u32> {
        self.data.as_ref().map(DataStream::position)
    }

    /// Decodes up to [`DEFAULT_FRAME_COUNT`] frames.
    pub fn read_samples(&mut self) -> Result<Vec<Sample>, WavError> {
        self.read_samples_max(DEFAULT_FRAME_COUNT)
    }

    /// Decodes up to `max_frames` frames, one [`Sample`] per frame.
    ///
    /// Issues a single read against the audio payload, then decodes whole
    /// frames out of the bytes obtained. A short final call returns fewer
    /// frames than requested; once no bytes remain the call fails with
    /// [`WavError::EndOfStream`]. Should any single channel access land
    /// past the bytes actually delivered, the whole call fails with
    /// [`WavError::EndOfStream`] and the partially decoded frames of that
    /// call are discarded.
    pub fn read_samples_max(&mut self, max_frames: u32) -> Result<Vec<Sample>, WavError> {
        let format = self.format()?;
        let channel_count = format.channel_count as usize;
        let block_align = format.block_align as usize;
        let bytes_per_sample = format.bytes_per_sample();

        let bytes_to_read = max_frames as usize * block_align;
        if bytes_to_read == 0 {
            return Ok(Vec::new());
        }
        let mut bytes = vec![0u8; bytes_to_read];
        let n = self.read(&mut bytes)?;
        if n == 0 {
            return Err(WavError::EndOfStream);
        }

        let mut samples = Vec::new();
        let mut offset = 0;
        for _ in 0..max_frames {
            if offset == n {
                // the read ended exactly on a frame boundary
                break;
            }
            let mut values = Vec::with_capacity(channel_count);
            for channel in 0..channel_count {
                let soffset = offset + channel * bytes_per_sample;
                let value = match format.audio_format {
                    AudioFormat::IeeeFloat => {
                        if soffset + 4 > n {
                            return Err(WavError::EndOfStream);
                        }
                        let bits = u32::from_le_bytes([
                            bytes[soffset],
                            bytes[soffset + 1],
                            bytes[soffset + 2],
                            bytes[soffset + 3],
                        ]);
                        (f32::from_bits(bits) as f64 * i32::MAX as f64) as i64
                    }
                    AudioFormat::ALaw => {
                        if soffset >= n {
                            return Err(WavError::EndOfStream);
                        }
                        decode_alaw(bytes[soffset]) as i64
                    }
                    AudioFormat::MuLaw => {
                        if soffset >= n {
                            return Err(WavError::EndOfStream);
                        }
                        decode_ulaw(bytes[soffset]) as i64
                    }
                    // linear PCM, and unrecognized tags as declared-width PCM
                    _ => {
                        if soffset + bytes_per_sample > n {
                            return Err(WavError::EndOfStream);
                        }
                        let mut value = 0u64;
                        for (i, &byte) in bytes[soffset..soffset + bytes_per_sample]
                            .iter()
                            .enumerate()
                        {
                            value |= (byte as u64) << (8 * i);
                        }
                        to_signed(value, format.bits_per_sample)
                    }
                };
                values.push(value);
            }
            samples.push(Sample { values });
            offset += block_align;
        }

        Ok(samples)
    }

    /// Raw integer value of `sample` at `channel`.
    pub fn int_value(&self, sample: &Sample, channel: usize) -> i64 {
        sample.value(channel)
    }

    /// Value of `sample` at `channel`, normalized by the stream's bit
    /// depth: the integer value divided by `2^(bits_per_sample - 1)`.
    ///
    /// Returns `0.0` when no format has been resolved yet.
    pub fn float_value(&self, sample: &Sample, channel: usize) -> f64 {
        match self.format {
            Some(format) if format.bits_per_sample != 0 => {
                self.int_value(sample, channel) as f64
                    / 2f64.powi(format.bits_per_sample as i32 - 1)
            }
            _ => 0.0,
        }
    }

    fn ensure_chunks(&mut self) -> Result<(), WavError> {
        if self.chunks.is_none() {
            let chunks = ChunkList::parse(&mut self.source)?;
            #[cfg(feature = "tracing")]
            tracing::trace!(chunks = chunks.chunks().len(), "split RIFF container");
            self.chunks = Some(chunks);
        }
        Ok(())
    }

    fn find_chunk(&self, id: ChunkId) -> Result<&Chunk, WavError> {
        self.chunks
            .as_ref()
            .and_then(|chunks| chunks.find(id))
            .ok_or(WavError::ChunkNotFound(id))
    }

    fn ensure_data(&mut self) -> Result<&DataStream, WavError> {
        if self.data.is_none() {
            self.ensure_chunks()?;
            let chunk = self.find_chunk(ChunkId::DATA)?;
            let (offset, size) = (chunk.offset(), chunk.size());
            self.source.seek(SeekFrom::Start(offset))?;
            #[cfg(feature = "tracing")]
            tracing::trace!(size, offset, "located data chunk");
            self.data = Some(DataStream::new(size));
        }
        match &self.data {
            Some(data) => Ok(data),
            None => Err(WavError::ChunkNotFound(ChunkId::DATA)),
        }
    }
}
