//! Opus decoder session.

use tracing::trace;

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::scratch::Scratch;
use crate::session::{DecoderState, SessionParams};

/// Opus decoder session: one owned native state plus a dedicated PCM
/// scratch buffer sized at creation.
#[derive(Debug)]
pub struct Decoder {
    params: SessionParams,
    state: DecoderState,
    scratch: Scratch<i16>,
}

impl Decoder {
    /// Creates a new decoder.
    ///
    /// `max_frame_samples` is the largest per-channel frame the session
    /// will ever decode; the scratch buffer holds that many samples per
    /// channel, interleaved. [`crate::MAX_FRAME_SAMPLES`] covers the
    /// longest legal packet (120 ms at 48 kHz).
    pub fn new(params: SessionParams, max_frame_samples: usize) -> Result<Self> {
        let state = DecoderState::create(params)?;
        // Creation succeeded, so channels is 1 or 2.
        let capacity = max_frame_samples * params.channels() as usize;
        Ok(Self {
            params,
            state,
            scratch: Scratch::with_capacity(capacity),
        })
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> i32 {
        self.params.sample_rate()
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.params.channels()
    }

    /// Decodes one packet to interleaved PCM.
    ///
    /// `None` requests loss concealment: the engine synthesizes
    /// `samples_per_channel` samples per channel from prior state; the
    /// count must be a multiple of 2.5 ms. With `decode_fec` set, in-band
    /// forward-error-correction data in the packet is preferred, and the
    /// frame is decoded as if lost when none is present.
    ///
    /// On success the returned length is the engine's reported sample
    /// count times the channel count; the samples are copied out before
    /// the scratch buffer is released, so the result outlives later calls.
    pub fn decode(
        &mut self,
        packet: Option<&Frame>,
        samples_per_channel: i32,
        decode_fec: bool,
    ) -> Result<Vec<i16>> {
        let channels = self.params.channels() as usize;
        let mut out = self.scratch.acquire();

        // A request larger than the scratch buffer would let the engine
        // write past capacity; reject it here. Negative requests fall
        // through for the engine to reject as bad arguments.
        let needed = samples_per_channel.max(0) as usize * channels;
        if needed > out.capacity() {
            return Err(Error::from_code(-2));
        }

        let status = self.state.decode_raw(
            packet.map(|p| p.as_bytes()),
            out.as_mut_slice(),
            samples_per_channel,
            decode_fec,
        );
        if status < 0 {
            return Err(Error::from_code(status));
        }

        trace!(
            samples_per_channel = status,
            concealed = packet.is_none(),
            "decoded frame"
        );
        Ok(out.copy_out(status as usize * channels))
    }

    /// Conceals one lost packet, synthesizing `samples_per_channel`
    /// samples per channel from prior state.
    pub fn decode_plc(&mut self, samples_per_channel: i32) -> Result<Vec<i16>> {
        self.decode(None, samples_per_channel, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::error::ErrorKind;
    use crate::session::Application;

    #[test]
    fn test_decoder_create() {
        let dec = Decoder::new(SessionParams::new(16000, 1), crate::MAX_FRAME_SAMPLES).unwrap();
        assert_eq!(dec.sample_rate(), 16000);
        assert_eq!(dec.channels(), 1);
    }

    #[test]
    fn test_decoder_create_invalid_rate() {
        let err = Decoder::new(SessionParams::new(11025, 1), crate::MAX_FRAME_SAMPLES).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }

    #[test]
    fn test_roundtrip_mono() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let mut dec = Decoder::new(SessionParams::new(16000, 1), crate::MAX_FRAME_SAMPLES).unwrap();

        let pcm: Vec<i16> = (0..320).map(|i| ((i * 73) % 20000 - 10000) as i16).collect();
        let frame = enc.encode(&pcm, 320).unwrap();
        let decoded = dec.decode(Some(&frame), 320, false).unwrap();
        assert_eq!(decoded.len(), 320);
    }

    #[test]
    fn test_roundtrip_stereo_short_frame() {
        // The 24 kHz / 2 channel / 60-sample voice scenario.
        let params = SessionParams::new(24000, 2);
        let mut enc = Encoder::new(params, Application::Voip, crate::MAX_PACKET_BYTES).unwrap();
        let mut dec = Decoder::new(params, crate::MAX_FRAME_SAMPLES).unwrap();

        let pcm = vec![0i16; 60 * 2];
        let frame = enc.encode(&pcm, 60).unwrap();
        assert!(frame.len() <= crate::MAX_PACKET_BYTES);

        let decoded = dec.decode(Some(&frame), 60, false).unwrap();
        assert_eq!(decoded.len(), 60 * 2);
    }

    #[test]
    fn test_decode_plc() {
        let params = SessionParams::new(24000, 1);
        let mut enc = Encoder::new(params, Application::Voip, crate::MAX_PACKET_BYTES).unwrap();
        let mut dec = Decoder::new(params, crate::MAX_FRAME_SAMPLES).unwrap();

        // Prime the decoder with one real frame, then conceal a lost one.
        let frame = enc.encode(&vec![0i16; 60], 60).unwrap();
        dec.decode(Some(&frame), 60, false).unwrap();

        let concealed = dec.decode_plc(60).unwrap();
        assert_eq!(concealed.len(), 60);
    }

    #[test]
    fn test_decode_fec_without_fec_data() {
        let params = SessionParams::new(24000, 1);
        let mut enc = Encoder::new(params, Application::Voip, crate::MAX_PACKET_BYTES).unwrap();
        let mut dec = Decoder::new(params, crate::MAX_FRAME_SAMPLES).unwrap();

        let frame = enc.encode(&vec![0i16; 60], 60).unwrap();
        // No FEC payload present, so the frame decodes as if lost.
        let decoded = dec.decode(Some(&frame), 60, true).unwrap();
        assert_eq!(decoded.len(), 60);
    }

    #[test]
    fn test_decode_malformed_packet() {
        let params = SessionParams::new(16000, 1);
        let mut dec = Decoder::new(params, crate::MAX_FRAME_SAMPLES).unwrap();

        // Code-3 packet claiming zero frames is invalid per RFC 6716.
        let bad = Frame::new(vec![0x03, 0x00]);
        let err = dec.decode(Some(&bad), 320, false).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidPacket | ErrorKind::BadArgument
        ));

        // The failure left the scratch buffer reset; a valid decode works.
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let frame = enc.encode(&vec![0i16; 320], 320).unwrap();
        let decoded = dec.decode(Some(&frame), 320, false).unwrap();
        assert_eq!(decoded.len(), 320);
    }

    #[test]
    fn test_decode_request_exceeding_scratch() {
        // Scratch sized for 120 samples per channel; asking for more must
        // fail locally with BufferTooSmall, before the engine runs.
        let params = SessionParams::new(48000, 1);
        let mut dec = Decoder::new(params, 120).unwrap();
        let err = dec.decode_plc(960).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_decode_twice_same_packet() {
        // Consecutive identical calls return equally sized results; the
        // scratch state is indistinguishable between calls.
        let params = SessionParams::new(16000, 1);
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let mut dec = Decoder::new(params, crate::MAX_FRAME_SAMPLES).unwrap();

        let frame = enc.encode(&vec![0i16; 320], 320).unwrap();
        let first = dec.decode(Some(&frame), 320, false).unwrap();
        let second = dec.decode(Some(&frame), 320, false).unwrap();
        assert_eq!(first.len(), second.len());
    }
}
