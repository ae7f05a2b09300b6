//! Stateful session layer over the Opus codec.
//!
//! Wraps the native engine's encoder and decoder states in owned, move-only
//! sessions with pre-sized reusable scratch buffers, a closed error taxonomy
//! over the engine's status codes, and stream chunking that round-trips
//! arbitrary PCM through codec-legal frames.
//!
//! # Example
//!
//! ```ignore
//! use opus_session::{
//!     Application, Chunker, Decoder, Encoder, SessionParams, MAX_FRAME_SAMPLES, MAX_PACKET_BYTES,
//! };
//!
//! let params = SessionParams::new(24000, 1);
//! let mut encoder = Encoder::new(params, Application::Voip, MAX_PACKET_BYTES)?;
//! let mut decoder = Decoder::new(params, MAX_FRAME_SAMPLES)?;
//!
//! // Encode 70 ms of audio as 20 ms frames plus a 10 ms tail.
//! let pcm = vec![0i16; 480 * 3 + 240];
//! let stream = Chunker::new(480)?.encode_stream(&mut encoder, &pcm)?;
//! let decoded = stream.decode(&mut decoder)?;
//! assert_eq!(decoded.len(), pcm.len());
//! ```

mod ffi;

mod decoder;
mod encoder;
mod error;
mod frame;
mod scratch;
mod session;
mod stream;

pub use decoder::*;
pub use encoder::*;
pub use error::*;
pub use frame::*;
pub use scratch::*;
pub use session::*;
pub use stream::*;

/// Upper bound on decoded samples per channel in one packet
/// (120 ms at 48 kHz).
pub const MAX_FRAME_SAMPLES: usize = 5760;

/// Default scratch capacity for encoder output, in bytes. Large enough for
/// any single Opus packet.
pub const MAX_PACKET_BYTES: usize = 4000;
