//! Native engine boundary.
//!
//! Re-exports the libopus primitives the session layer consumes and declares
//! the constants they take. The bindings and the library build itself come
//! from `audiopus_sys`.

use std::ffi::CStr;
use std::os::raw::c_int;

use once_cell::sync::Lazy;

pub use audiopus_sys::{
    OpusDecoder, OpusEncoder, opus_decode, opus_decoder_create, opus_decoder_destroy, opus_encode,
    opus_encoder_create, opus_encoder_ctl, opus_encoder_destroy,
};

// Return codes
pub const OPUS_OK: c_int = 0;
pub const OPUS_ALLOC_FAIL: c_int = -7;

// Application types
pub const OPUS_APPLICATION_VOIP: c_int = 2048;
pub const OPUS_APPLICATION_AUDIO: c_int = 2049;
pub const OPUS_APPLICATION_RESTRICTED_LOWDELAY: c_int = 2051;

// CTL macros (request codes)
pub const OPUS_SET_BITRATE_REQUEST: c_int = 4002;
pub const OPUS_SET_COMPLEXITY_REQUEST: c_int = 4010;

static ENGINE_VERSION: Lazy<String> = Lazy::new(|| {
    unsafe {
        let c_str = audiopus_sys::opus_get_version_string();
        if c_str.is_null() {
            return String::from("opus (unknown version)");
        }
        CStr::from_ptr(c_str).to_string_lossy().into_owned()
    }
});

/// Binds the native library on first use and returns its version string.
/// Subsequent calls return the cached value.
pub fn engine_version() -> &'static str {
    &ENGINE_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        // Repeated calls hit the cached value.
        assert_eq!(engine_version(), version);
    }
}
