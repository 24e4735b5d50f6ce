/// Stream sample rate (samples per second per channel).
pub type SampleRate = u32;

/// Number of channels in a stream.
pub type ChannelCount = u16;

/// Width of a single encoded sample, in bits.
pub type BitDepth = u16;
