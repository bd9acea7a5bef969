//! Streaming MIDI wire-protocol decoder.
//!
//! Turns a packet of raw MIDI bytes into structured [`Message`] values:
//! status bytes (>= 0x80) select the message kind and channel, data bytes
//! (<= 0x7F) fill in its fields, and completed messages come out in the
//! order their final byte arrived.
//!
//! The decoder is tolerant by design: unrecognized status bytes (SysEx,
//! timing clock, reserved system bytes) and data bytes with nothing in
//! flight are logged on the `tracing` channel and dropped, never surfaced
//! as errors. The one hard failure is an input element that does not fit
//! in a byte, which aborts the whole call.
//!
//! # Example
//!
//! ```
//! use midi_wire::decode_packet;
//!
//! // Note On, channel 0, E4, velocity 127
//! let messages = decode_packet(&[0x90, 0x40, 0x7F]).unwrap();
//! assert_eq!(messages.len(), 1);
//! assert!(messages[0].is_note_on());
//! assert_eq!(messages[0].note(), Some(0x40));
//! ```

pub mod error;
pub use error::{Error, Result};

mod decoder;
pub use decoder::{decode_packet, StatusByteDecoder};

mod message;
pub use message::{Message, RawBytes};
