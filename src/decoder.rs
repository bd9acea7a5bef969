//! Status-byte state machine.
//!
//! The decoder walks a packet byte-by-byte: bytes >= 0x80 select a message
//! kind and channel, bytes <= 0x7F fill in the pending message's fields.
//! Completed messages are pushed to the output in the order their final
//! byte arrives. Malformed input degrades silently (logged, dropped) with
//! one exception: an input element that does not fit in a byte fails the
//! whole call.

use smallvec::smallvec;
use tracing::debug;

use crate::error::{Error, Result};
use crate::message::{Message, RawBytes};

/// What the decoder expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    AwaitingStatus,
    AwaitingNote,
    AwaitingVelocity,
    AwaitingController,
    AwaitingValue,
    AwaitingProgram,
    AwaitingChannelPressure,
    AwaitingPitchLsb,
    AwaitingPitchMsb,
    AwaitingSong,
}

/// Stateful scanner that reassembles logical MIDI messages from raw wire
/// bytes.
///
/// State is local to one [`decode`](StatusByteDecoder::decode) call: the
/// decoder resets itself on entry, so a single value can be reused across
/// packets and independent decoders can run in parallel without
/// coordination.
#[derive(Debug)]
pub struct StatusByteDecoder {
    state: DecodeState,
    /// The message currently being assembled. Exclusively owned; replaced
    /// or cleared on every status byte, moved out on completion.
    pending: Option<Message>,
}

impl StatusByteDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::AwaitingStatus,
            pending: None,
        }
    }

    /// Decode one packet of wire bytes into completed messages, in arrival
    /// order.
    ///
    /// Each element is expected to be a byte value (0-255); the wide
    /// element type exists so that out-of-range input from transport or
    /// FFI layers can be rejected rather than silently truncated. The
    /// first element above 255 aborts the call with
    /// [`Error::ByteOutOfRange`] and no partial results.
    pub fn decode(&mut self, packet: &[u16]) -> Result<Vec<Message>> {
        self.state = DecodeState::AwaitingStatus;
        self.pending = None;

        let mut messages = Vec::new();
        for (index, &value) in packet.iter().enumerate() {
            if value > 0xFF {
                return Err(Error::ByteOutOfRange { index, value });
            }
            let byte = value as u8;
            if byte >= 0x80 {
                self.status_byte(byte, &mut messages);
            } else {
                self.data_byte(byte, &mut messages);
            }
        }

        debug!(
            "decoded {} messages from {} bytes",
            messages.len(),
            packet.len()
        );
        Ok(messages)
    }

    fn status_byte(&mut self, byte: u8, out: &mut Vec<Message>) {
        // A status byte always abandons whatever was in flight; partial
        // messages are lost, never emitted.
        self.pending = None;

        match byte {
            0x80..=0x8F => {
                self.pending = Some(Message::NoteOff {
                    channel: byte - 0x80,
                    note: 0,
                    velocity: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingNote;
            }
            0x90..=0x9F => {
                self.pending = Some(Message::NoteOn {
                    channel: byte - 0x90,
                    note: 0,
                    velocity: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingNote;
            }
            0xA0..=0xAF => {
                self.pending = Some(Message::PolyAftertouch {
                    channel: byte - 0xA0,
                    note: 0,
                    pressure: 0,
                });
                self.state = DecodeState::AwaitingNote;
            }
            0xB0..=0xBF => {
                self.pending = Some(Message::ControlChange {
                    channel: byte - 0xB0,
                    controller: 0,
                    value: 0,
                });
                self.state = DecodeState::AwaitingController;
            }
            0xC0..=0xCF => {
                self.pending = Some(Message::ProgramChange {
                    channel: byte - 0xC0,
                    program: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingProgram;
            }
            0xD0..=0xDF => {
                self.pending = Some(Message::ChannelAftertouch {
                    channel: byte - 0xD0,
                    pressure: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingChannelPressure;
            }
            0xE0..=0xEF => {
                self.pending = Some(Message::PitchBend {
                    channel: byte - 0xE0,
                    pitch: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingPitchLsb;
            }
            0xF3 => {
                self.pending = Some(Message::SongSelect {
                    song: 0,
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingSong;
            }
            0xFA => {
                out.push(Message::Start);
                self.state = DecodeState::AwaitingStatus;
            }
            0xFB => {
                out.push(Message::Continue);
                self.state = DecodeState::AwaitingStatus;
            }
            0xFC => {
                out.push(Message::Stop);
                self.state = DecodeState::AwaitingStatus;
            }
            0xFF => {
                out.push(Message::SystemReset {
                    raw: smallvec![byte],
                });
                self.state = DecodeState::AwaitingStatus;
            }
            _ => {
                // SysEx, timing clock, and reserved system bytes: no
                // message, no state change.
                debug!("unhandled status byte {:#04x}, ignoring", byte);
            }
        }
    }

    fn data_byte(&mut self, byte: u8, out: &mut Vec<Message>) {
        let state = self.state;
        match state {
            DecodeState::AwaitingNote => match self.pending.as_mut() {
                Some(Message::NoteOn { note, raw, .. })
                | Some(Message::NoteOff { note, raw, .. }) => {
                    *note = byte;
                    write_raw(raw, 1, byte);
                    self.state = DecodeState::AwaitingVelocity;
                }
                // A pending poly aftertouch also parks here but has no
                // completion path; its data bytes fall through and the
                // message is never emitted.
                _ => dropped(state, byte),
            },

            DecodeState::AwaitingVelocity => {
                match self.pending.as_mut() {
                    Some(Message::NoteOn { velocity, raw, .. })
                    | Some(Message::NoteOff { velocity, raw, .. }) => {
                        *velocity = byte;
                        write_raw(raw, 2, byte);
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                // Completed pair. The slot stays armed: further data-byte
                // pairs decode as fresh messages of the same kind and
                // channel without a new status byte.
                if let Some(msg) = &self.pending {
                    out.push(msg.clone());
                }
                self.state = DecodeState::AwaitingNote;
            }

            DecodeState::AwaitingController => match self.pending.as_mut() {
                Some(Message::ControlChange { controller, .. }) => {
                    *controller = byte;
                    self.state = DecodeState::AwaitingValue;
                }
                _ => dropped(state, byte),
            },

            DecodeState::AwaitingValue => {
                match self.pending.as_mut() {
                    Some(Message::ControlChange { value, .. }) => {
                        *value = byte;
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                // Same repeated-pair shortcut as notes.
                if let Some(msg) = &self.pending {
                    out.push(msg.clone());
                }
                self.state = DecodeState::AwaitingController;
            }

            DecodeState::AwaitingProgram => {
                match self.pending.as_mut() {
                    Some(Message::ProgramChange { program, raw, .. }) => {
                        *program = byte;
                        write_raw(raw, 1, byte);
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                self.finish(out);
            }

            DecodeState::AwaitingChannelPressure => {
                match self.pending.as_mut() {
                    Some(Message::ChannelAftertouch { pressure, raw, .. }) => {
                        *pressure = byte;
                        write_raw(raw, 1, byte);
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                self.finish(out);
            }

            DecodeState::AwaitingPitchLsb => match self.pending.as_mut() {
                Some(Message::PitchBend { pitch, raw, .. }) => {
                    *pitch = byte as u16;
                    write_raw(raw, 1, byte);
                    self.state = DecodeState::AwaitingPitchMsb;
                }
                _ => dropped(state, byte),
            },

            DecodeState::AwaitingPitchMsb => {
                match self.pending.as_mut() {
                    Some(Message::PitchBend { pitch, raw, .. }) => {
                        // LSB arrived first; the MSB supplies the top 7
                        // bits of the 14-bit value.
                        *pitch |= (byte as u16) << 7;
                        write_raw(raw, 2, byte);
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                self.finish(out);
            }

            DecodeState::AwaitingSong => {
                match self.pending.as_mut() {
                    Some(Message::SongSelect { song, raw }) => {
                        *song = byte;
                        write_raw(raw, 1, byte);
                    }
                    _ => {
                        dropped(state, byte);
                        return;
                    }
                }
                self.finish(out);
            }

            DecodeState::AwaitingStatus => dropped(state, byte),
        }
    }

    /// Move the completed message into the output and clear the slot.
    fn finish(&mut self, out: &mut Vec<Message>) {
        if let Some(msg) = self.pending.take() {
            out.push(msg);
        }
        self.state = DecodeState::AwaitingStatus;
    }
}

impl Default for StatusByteDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a single packet without keeping a decoder around.
pub fn decode_packet(packet: &[u16]) -> Result<Vec<Message>> {
    StatusByteDecoder::new().decode(packet)
}

/// Raw-byte slots are positional: a repeated pair overwrites bytes 1-2 of
/// the buffer instead of growing it.
fn write_raw(raw: &mut RawBytes, index: usize, byte: u8) {
    raw.truncate(index);
    raw.push(byte);
}

fn dropped(state: DecodeState, byte: u8) {
    debug!(
        "dropped data byte {:#04x} in state {:?}: no matching message in flight",
        byte, state
    );
}
