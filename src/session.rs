//! Codec session handles: owned native encoder and decoder states.
//!
//! Each state is a move-only owner of one opaque native handle. `Drop` is
//! the single release point, so create/destroy pairing holds on every exit
//! path and double-destroy cannot be expressed. `&mut self` on the process
//! primitives serializes calls on a handle; the native state is not
//! reentrant.

use std::os::raw::c_int;
use std::ptr;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ffi;

/// Immutable session parameters shared by encoders and decoders.
///
/// Validation is delegated to the engine: a sample rate outside
/// {8000, 12000, 16000, 24000, 48000} or a channel count outside {1, 2}
/// surfaces as a `BadArgument` error at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParams {
    sample_rate: i32,
    channels: i32,
}

impl SessionParams {
    /// Creates session parameters.
    pub fn new(sample_rate: i32, channels: i32) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.channels
    }
}

/// Opus application type, fixed at encoder creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    /// Best quality for voice signals.
    Voip,
    /// Best quality for non-voice signals.
    Audio,
    /// Minimum possible coding delay.
    RestrictedLowDelay,
}

impl Application {
    pub(crate) fn to_ffi(self) -> c_int {
        match self {
            Self::Voip => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::RestrictedLowDelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

/// Owned native encoder state.
#[derive(Debug)]
pub(crate) struct EncoderState {
    handle: *mut ffi::OpusEncoder,
}

// Safety: the handle is never shared; all access goes through &mut self.
unsafe impl Send for EncoderState {}

impl Drop for EncoderState {
    fn drop(&mut self) {
        unsafe { ffi::opus_encoder_destroy(self.handle) };
        trace!("destroyed opus encoder");
    }
}

impl EncoderState {
    pub(crate) fn create(params: SessionParams, application: Application) -> Result<Self> {
        let version = ffi::engine_version();
        let mut error: c_int = 0;
        let handle = unsafe {
            ffi::opus_encoder_create(
                params.sample_rate(),
                params.channels(),
                application.to_ffi(),
                &mut error,
            )
        };

        if handle.is_null() || error != ffi::OPUS_OK {
            // A null handle with an OK status means the engine could not
            // allocate the state.
            let code = if error != ffi::OPUS_OK {
                error
            } else {
                ffi::OPUS_ALLOC_FAIL
            };
            return Err(Error::from_code(code));
        }

        debug!(
            version,
            sample_rate = params.sample_rate(),
            channels = params.channels(),
            ?application,
            "created opus encoder"
        );
        Ok(Self { handle })
    }

    /// Raw native encode. Returns the signed status untranslated: a
    /// non-negative value is the encoded byte length.
    pub(crate) fn encode_raw(&mut self, pcm: &[i16], frame_size: i32, out: &mut [u8]) -> i32 {
        unsafe {
            ffi::opus_encode(
                self.handle,
                pcm.as_ptr(),
                frame_size,
                out.as_mut_ptr(),
                out.len() as i32,
            )
        }
    }

    /// Raw native ctl call with a single integer argument.
    pub(crate) fn ctl_raw(&mut self, request: c_int, value: i32) -> i32 {
        unsafe { ffi::opus_encoder_ctl(self.handle, request, value) }
    }
}

/// Owned native decoder state.
#[derive(Debug)]
pub(crate) struct DecoderState {
    handle: *mut ffi::OpusDecoder,
}

// Safety: the handle is never shared; all access goes through &mut self.
unsafe impl Send for DecoderState {}

impl Drop for DecoderState {
    fn drop(&mut self) {
        unsafe { ffi::opus_decoder_destroy(self.handle) };
        trace!("destroyed opus decoder");
    }
}

impl DecoderState {
    pub(crate) fn create(params: SessionParams) -> Result<Self> {
        let version = ffi::engine_version();
        let mut error: c_int = 0;
        let handle = unsafe {
            ffi::opus_decoder_create(params.sample_rate(), params.channels(), &mut error)
        };

        if handle.is_null() || error != ffi::OPUS_OK {
            let code = if error != ffi::OPUS_OK {
                error
            } else {
                ffi::OPUS_ALLOC_FAIL
            };
            return Err(Error::from_code(code));
        }

        debug!(
            version,
            sample_rate = params.sample_rate(),
            channels = params.channels(),
            "created opus decoder"
        );
        Ok(Self { handle })
    }

    /// Raw native decode. `None` packet requests loss concealment. Returns
    /// the signed status untranslated: a non-negative value is the decoded
    /// sample count per channel.
    pub(crate) fn decode_raw(
        &mut self,
        packet: Option<&[u8]>,
        out: &mut [i16],
        frame_size: i32,
        decode_fec: bool,
    ) -> i32 {
        let (data, len) = match packet {
            Some(p) => (p.as_ptr(), p.len() as i32),
            None => (ptr::null(), 0),
        };

        unsafe {
            ffi::opus_decode(
                self.handle,
                data,
                len,
                out.as_mut_ptr(),
                frame_size,
                decode_fec as c_int,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_create_all_valid_params() {
        for rate in [8000, 12000, 16000, 24000, 48000] {
            for channels in [1, 2] {
                let params = SessionParams::new(rate, channels);
                assert!(EncoderState::create(params, Application::Voip).is_ok());
                assert!(DecoderState::create(params).is_ok());
            }
        }
    }

    #[test]
    fn test_create_invalid_sample_rate() {
        let params = SessionParams::new(44100, 1);
        let err = EncoderState::create(params, Application::Voip).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);

        let err = DecoderState::create(params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }

    #[test]
    fn test_create_invalid_channels() {
        let params = SessionParams::new(48000, 3);
        let err = EncoderState::create(params, Application::Audio).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);

        let err = DecoderState::create(params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }

    #[test]
    fn test_session_params_accessors() {
        let params = SessionParams::new(24000, 2);
        assert_eq!(params.sample_rate(), 24000);
        assert_eq!(params.channels(), 2);
    }

    #[test]
    fn test_application_to_ffi() {
        assert_eq!(Application::Voip.to_ffi(), 2048);
        assert_eq!(Application::Audio.to_ffi(), 2049);
        assert_eq!(Application::RestrictedLowDelay.to_ffi(), 2051);
    }
}
