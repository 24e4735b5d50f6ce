//! The format descriptor parsed from the `fmt ` chunk.

use crate::common::{BitDepth, ChannelCount, SampleRate};

/// Sample encoding declared by the format chunk.
///
/// Tags other than the four known ones are preserved as [`Unknown`];
/// sample decoding treats them like linear PCM.
///
/// [`Unknown`]: AudioFormat::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Linear PCM (tag 1).
    Pcm,
    /// IEEE-754 single-precision float (tag 3).
    IeeeFloat,
    /// G.711 A-law companding (tag 6).
    ALaw,
    /// G.711 µ-law companding (tag 7).
    MuLaw,
    /// Any other format tag.
    Unknown(u16),
}

impl AudioFormat {
    pub fn from_tag(tag: u16) -> AudioFormat {
        match tag {
            1 => AudioFormat::Pcm,
            3 => AudioFormat::IeeeFloat,
            6 => AudioFormat::ALaw,
            7 => AudioFormat::MuLaw,
            other => AudioFormat::Unknown(other),
        }
    }

    /// The numeric WAV format tag.
    pub fn tag(self) -> u16 {
        match self {
            AudioFormat::Pcm => 1,
            AudioFormat::IeeeFloat => 3,
            AudioFormat::ALaw => 6,
            AudioFormat::MuLaw => 7,
            AudioFormat::Unknown(tag) => tag,
        }
    }
}

/// Error interpreting the `fmt ` chunk payload.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("format chunk payload is shorter than the 16-byte layout")]
    MalformedFormatChunk,
    #[error("bits per sample is zero")]
    InvalidBitDepth,
}

/// The six fixed fields of the format chunk.
///
/// Parsed once per stream and cached for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub audio_format: AudioFormat,
    pub channel_count: ChannelCount,
    pub sample_rate: SampleRate,
    /// Average bytes per second (`sample_rate * block_align`).
    pub byte_rate: u32,
    /// Byte size of one full frame across all channels.
    pub block_align: u16,
    pub bits_per_sample: BitDepth,
}

impl WavFormat {
    /// Deserializes the fixed little-endian layout of the format chunk.
    ///
    /// A zero bit depth is rejected here: it would poison every later
    /// duration and sign-extension computation.
    pub fn parse(payload: &[u8]) -> Result<WavFormat, FormatError> {
        if payload.len() < 16 {
            return Err(FormatError::MalformedFormatChunk);
        }

        let u16_at = |at: usize| u16::from_le_bytes([payload[at], payload[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([payload[at], payload[at + 1], payload[at + 2], payload[at + 3]])
        };

        let format = WavFormat {
            audio_format: AudioFormat::from_tag(u16_at(0)),
            channel_count: u16_at(2),
            sample_rate: u32_at(4),
            byte_rate: u32_at(8),
            block_align: u16_at(12),
            bits_per_sample: u16_at(14),
        };
        if format.bits_per_sample == 0 {
            return Err(FormatError::InvalidBitDepth);
        }

        Ok(format)
    }

    /// Bytes occupied by one sample of one channel.
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn payload(tag: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let byte_rate = rate * block_align as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&bits.to_le_bytes());
        bytes
    }

    #[test]
    fn parses_all_six_fields() {
        let format = WavFormat::parse(&payload(1, 2, 44100, 16)).unwrap();
        assert_eq!(
            format,
            WavFormat {
                audio_format: AudioFormat::Pcm,
                channel_count: 2,
                sample_rate: 44100,
                byte_rate: 176_400,
                block_align: 4,
                bits_per_sample: 16,
            }
        );
    }

    #[rstest]
    #[case(1, AudioFormat::Pcm)]
    #[case(3, AudioFormat::IeeeFloat)]
    #[case(6, AudioFormat::ALaw)]
    #[case(7, AudioFormat::MuLaw)]
    #[case(0xFFFE, AudioFormat::Unknown(0xFFFE))]
    fn maps_format_tags(#[case] tag: u16, #[case] expected: AudioFormat) {
        let format = WavFormat::parse(&payload(tag, 1, 8000, 8)).unwrap();
        assert_eq!(format.audio_format, expected);
        assert_eq!(format.audio_format.tag(), tag);
    }

    #[test]
    fn rejects_short_payload() {
        let bytes = payload(1, 2, 44100, 16);
        assert_eq!(
            WavFormat::parse(&bytes[..15]),
            Err(FormatError::MalformedFormatChunk)
        );
        assert_eq!(WavFormat::parse(&[]), Err(FormatError::MalformedFormatChunk));
    }

    #[test]
    fn rejects_zero_bit_depth() {
        assert_eq!(
            WavFormat::parse(&payload(1, 2, 44100, 0)),
            Err(FormatError::InvalidBitDepth)
        );
    }

    #[test]
    fn trailing_extension_bytes_are_ignored() {
        let mut bytes = payload(1, 1, 22050, 16);
        bytes.extend_from_slice(&[0xAA; 8]);
        let format = WavFormat::parse(&bytes).unwrap();
        assert_eq!(format.bits_per_sample, 16);
    }
}
