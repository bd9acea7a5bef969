//! Decoded MIDI message types.
//!
//! `Message` is the decoder's output unit: one variant per channel-voice or
//! transport message kind, carrying only the fields meaningful to it. Most
//! payload-bearing variants keep the literal wire bytes that produced them
//! (`raw`) for diagnostic and echo use.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Wire bytes backing a decoded message. Channel-voice messages are at most
/// three bytes, so this never spills to the heap.
pub type RawBytes = SmallVec<[u8; 3]>;

/// A decoded MIDI message.
///
/// Channels are 0-15, 7-bit fields are 0-127, pitch is the reassembled
/// 14-bit value (0-16383, 8192 = center).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Note On: key pressed.
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
        raw: RawBytes,
    },

    /// Note Off: key released.
    NoteOff {
        channel: u8,
        note: u8,
        velocity: u8,
        raw: RawBytes,
    },

    /// Polyphonic key pressure. Recognized on the wire, but the decoder
    /// currently never completes one: the awaiting-note data path only
    /// advances Note On/Off, so a pending poly aftertouch is dropped.
    PolyAftertouch { channel: u8, note: u8, pressure: u8 },

    /// Control Change: controller (0-127) set to value (0-127).
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },

    /// Program Change: patch select.
    ProgramChange {
        channel: u8,
        program: u8,
        raw: RawBytes,
    },

    /// Channel-wide key pressure.
    ChannelAftertouch {
        channel: u8,
        pressure: u8,
        raw: RawBytes,
    },

    /// Pitch Bend: 14-bit value assembled from two 7-bit data bytes,
    /// LSB first.
    PitchBend {
        channel: u8,
        pitch: u16,
        raw: RawBytes,
    },

    /// Song Select (system common).
    SongSelect { song: u8, raw: RawBytes },

    /// System Reset (0xFF). Single status byte, no data bytes.
    SystemReset { raw: RawBytes },

    /// Transport start (0xFA).
    Start,

    /// Transport stop (0xFC).
    Stop,

    /// Transport continue (0xFB).
    Continue,
}

impl Message {
    /// Channel for channel-voice messages, `None` for system messages.
    #[inline]
    pub fn channel(&self) -> Option<u8> {
        match self {
            Message::NoteOn { channel, .. }
            | Message::NoteOff { channel, .. }
            | Message::PolyAftertouch { channel, .. }
            | Message::ControlChange { channel, .. }
            | Message::ProgramChange { channel, .. }
            | Message::ChannelAftertouch { channel, .. }
            | Message::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self {
            Message::NoteOn { note, .. }
            | Message::NoteOff { note, .. }
            | Message::PolyAftertouch { note, .. } => Some(*note),
            _ => None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match self {
            Message::NoteOn { velocity, .. } | Message::NoteOff { velocity, .. } => {
                Some(*velocity)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, Message::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// Note Off, or Note On with velocity 0 (the conventional equivalent).
    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self,
            Message::NoteOff { .. } | Message::NoteOn { velocity: 0, .. }
        )
    }

    /// The literal wire bytes that produced this message, where retained.
    #[inline]
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Message::NoteOn { raw, .. }
            | Message::NoteOff { raw, .. }
            | Message::ProgramChange { raw, .. }
            | Message::ChannelAftertouch { raw, .. }
            | Message::PitchBend { raw, .. }
            | Message::SongSelect { raw, .. }
            | Message::SystemReset { raw } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_note_on_accessors() {
        let msg = Message::NoteOn {
            channel: 3,
            note: 60,
            velocity: 100,
            raw: smallvec![0x93, 60, 100],
        };
        assert!(msg.is_note_on());
        assert!(!msg.is_note_off());
        assert_eq!(msg.channel(), Some(3));
        assert_eq!(msg.note(), Some(60));
        assert_eq!(msg.velocity(), Some(100));
        assert_eq!(msg.raw_bytes(), Some(&[0x93, 60, 100][..]));
    }

    #[test]
    fn test_note_on_zero_velocity_is_note_off() {
        let msg = Message::NoteOn {
            channel: 0,
            note: 60,
            velocity: 0,
            raw: smallvec![0x90, 60, 0],
        };
        assert!(msg.is_note_off());
        assert!(!msg.is_note_on());
    }

    #[test]
    fn test_transport_messages_carry_nothing() {
        for msg in [Message::Start, Message::Stop, Message::Continue] {
            assert_eq!(msg.channel(), None);
            assert_eq!(msg.note(), None);
            assert_eq!(msg.velocity(), None);
            assert_eq!(msg.raw_bytes(), None);
        }
    }

    #[test]
    fn test_control_change_has_no_raw_buffer() {
        let msg = Message::ControlChange {
            channel: 0,
            controller: 7,
            value: 127,
        };
        assert_eq!(msg.raw_bytes(), None);
        assert_eq!(msg.channel(), Some(0));
    }

    #[test]
    fn test_system_reset_raw_bytes() {
        let msg = Message::SystemReset {
            raw: smallvec![0xFF],
        };
        assert_eq!(msg.channel(), None);
        assert_eq!(msg.raw_bytes(), Some(&[0xFF][..]));
    }
}
