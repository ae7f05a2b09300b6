//! Opus encoder session.

use tracing::trace;

use crate::error::{Error, Result};
use crate::ffi;
use crate::frame::Frame;
use crate::scratch::Scratch;
use crate::session::{Application, EncoderState, SessionParams};

/// Opus encoder session: one owned native state plus a dedicated output
/// scratch buffer sized at creation.
#[derive(Debug)]
pub struct Encoder {
    params: SessionParams,
    application: Application,
    state: EncoderState,
    scratch: Scratch<u8>,
}

impl Encoder {
    /// Creates a new encoder.
    ///
    /// `max_packet_bytes` fixes the output scratch capacity and thereby the
    /// largest packet the session can produce; [`crate::MAX_PACKET_BYTES`]
    /// covers any single Opus packet.
    pub fn new(
        params: SessionParams,
        application: Application,
        max_packet_bytes: usize,
    ) -> Result<Self> {
        let state = EncoderState::create(params, application)?;
        Ok(Self {
            params,
            application,
            state,
            scratch: Scratch::with_capacity(max_packet_bytes),
        })
    }

    /// Creates a VoIP encoder with the default packet bound.
    pub fn new_voip(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(
            SessionParams::new(sample_rate, channels),
            Application::Voip,
            crate::MAX_PACKET_BYTES,
        )
    }

    /// Creates a general-audio encoder with the default packet bound.
    pub fn new_audio(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(
            SessionParams::new(sample_rate, channels),
            Application::Audio,
            crate::MAX_PACKET_BYTES,
        )
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> i32 {
        self.params.sample_rate()
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.params.channels()
    }

    /// Returns the application type.
    pub fn application(&self) -> Application {
        self.application
    }

    /// Encodes one frame of interleaved PCM to a packet.
    ///
    /// `pcm` must hold `samples_per_channel * channels` samples, and
    /// `samples_per_channel` must be a frame size the engine accepts for
    /// the session's sample rate (at 48 kHz: 120, 240, 480, 960, 1920 or
    /// 2880; other rates scale proportionally). Neither is pre-validated
    /// here: the engine is the source of truth and rejects violations with
    /// a `BadArgument` error. The scratch buffer is reset whether the call
    /// succeeds or fails.
    pub fn encode(&mut self, pcm: &[i16], samples_per_channel: i32) -> Result<Frame> {
        let mut out = self.scratch.acquire();
        let status = self
            .state
            .encode_raw(pcm, samples_per_channel, out.as_mut_slice());
        if status < 0 {
            return Err(Error::from_code(status));
        }

        trace!(samples_per_channel, bytes = status, "encoded frame");
        Ok(Frame::new(out.copy_out(status as usize)))
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<()> {
        let status = self.state.ctl_raw(ffi::OPUS_SET_BITRATE_REQUEST, bitrate);
        if status != ffi::OPUS_OK {
            return Err(Error::from_code(status));
        }
        Ok(())
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        let status = self
            .state
            .ctl_raw(ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity);
        if status != ffi::OPUS_OK {
            return Err(Error::from_code(status));
        }
        Ok(())
    }

    /// Returns the per-channel frame size for a duration in milliseconds.
    pub fn frame_size_for_millis(&self, millis: i32) -> i32 {
        self.params.sample_rate() * millis / 1000
    }

    /// Returns the frame size for 20 ms frames (recommended default).
    pub fn frame_size_20ms(&self) -> i32 {
        self.frame_size_for_millis(20)
    }
}
