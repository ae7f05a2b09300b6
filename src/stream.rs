//! Stream chunking.
//!
//! Splits an unbounded PCM sample stream into codec-legal frames, drives an
//! encoder across them in order, and keeps the per-frame ledger needed to
//! re-split the concatenated byte stream and replay it through a decoder.

use tracing::trace;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::frame::Frame;

/// Per-frame ledger entry: the encoded byte length and the per-channel
/// sample count submitted for the frame. The ordered record sequence is
/// the only information needed to re-split a concatenated encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    /// Encoded packet length in bytes.
    pub encoded_len: usize,
    /// Per-channel sample count submitted to the encoder.
    pub samples_per_channel: i32,
}

/// Splits PCM input into frames of a configured per-channel size.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    samples_per_channel: i32,
}

impl Chunker {
    /// Creates a chunker producing frames of `samples_per_channel` samples
    /// per channel. Fails with a `BadArgument` error when the size is not
    /// positive.
    pub fn new(samples_per_channel: i32) -> Result<Self> {
        if samples_per_channel <= 0 {
            return Err(Error::from_code(-1));
        }
        Ok(Self { samples_per_channel })
    }

    /// Returns the configured per-channel frame size.
    pub fn samples_per_channel(&self) -> i32 {
        self.samples_per_channel
    }

    /// Splits interleaved PCM into frames paired with their per-channel
    /// sample counts.
    ///
    /// Every chunk is full-sized except possibly the last, which carries
    /// its true (smaller) per-channel count; nothing is padded or dropped.
    /// Whether the engine accepts a short tail as a frame duration is the
    /// engine's decision, not the chunker's.
    ///
    /// `channels` comes from a session and is 1 or 2; counts below one are
    /// treated as mono rather than dividing by zero.
    pub fn split<'a>(
        &self,
        pcm: &'a [i16],
        channels: i32,
    ) -> impl Iterator<Item = (&'a [i16], i32)> {
        let channels = channels.max(1);
        let step = (self.samples_per_channel * channels) as usize;
        pcm.chunks(step)
            .map(move |chunk| (chunk, (chunk.len() / channels as usize) as i32))
    }

    /// Drives `encoder` across the whole of `pcm` in order, returning the
    /// concatenated packets plus the replay ledger.
    pub fn encode_stream(&self, encoder: &mut Encoder, pcm: &[i16]) -> Result<EncodedStream> {
        let channels = encoder.channels();
        let mut stream = EncodedStream::default();
        for (chunk, samples_per_channel) in self.split(pcm, channels) {
            let frame = encoder.encode(chunk, samples_per_channel)?;
            stream.records.push(FrameRecord {
                encoded_len: frame.len(),
                samples_per_channel,
            });
            stream.bytes.extend_from_slice(frame.as_bytes());
        }

        trace!(
            frames = stream.records.len(),
            bytes = stream.bytes.len(),
            "encoded stream"
        );
        Ok(stream)
    }
}

/// A concatenated encoded stream and the ordered records to re-split it.
///
/// The byte stream and the record sequence are kept consistent by
/// construction: only [`Chunker::encode_stream`] appends to them, so the
/// re-split offsets in [`EncodedStream::decode`] always stay in bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedStream {
    bytes: Vec<u8>,
    records: Vec<FrameRecord>,
}

impl EncodedStream {
    /// Returns the concatenated packet bytes in production order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns one record per packet, in production order.
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Replays the record sequence against `decoder` in order,
    /// concatenating the decoded samples to reconstruct the PCM stream
    /// (lossy-compression fidelity, not bit-exactness).
    pub fn decode(&self, decoder: &mut Decoder) -> Result<Vec<i16>> {
        let mut pcm = Vec::new();
        let mut offset = 0;
        for record in &self.records {
            let packet = Frame::from_slice(&self.bytes[offset..offset + record.encoded_len]);
            offset += record.encoded_len;
            pcm.extend(decoder.decode(Some(&packet), record.samples_per_channel, false)?);
        }
        Ok(pcm)
    }

    /// Returns the total samples per channel across all records.
    pub fn total_samples_per_channel(&self) -> i64 {
        self.records
            .iter()
            .map(|r| r.samples_per_channel as i64)
            .sum()
    }
}
