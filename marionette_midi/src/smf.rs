// Standard MIDI File import.
//
// Converts an SMF byte stream into a `Score`: tracks are merged to absolute
// ticks, note messages become `TimedEvent`s, and tempo meta events feed the
// `TempoMap`. A `NoteOn` with velocity 0 is the running-status shorthand for
// a note-off and is decoded as such.
//
// Uses the `midly` crate. Only metrical timing (ticks per quarter) is
// supported — SMPTE timecode division is rejected at load, the one hard
// error this crate can produce.

use crate::event::TimedEvent;
use crate::score::Score;
use crate::tempo::TempoChange;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::fmt;

/// Errors surfaced while decoding a Standard MIDI File into a `Score`.
#[derive(Debug)]
pub enum ScoreLoadError {
    /// The byte stream is not a well-formed SMF.
    Parse(midly::Error),
    /// The file uses SMPTE timecode division, which has no ticks-per-quarter.
    TimecodeDivision,
}

impl fmt::Display for ScoreLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLoadError::Parse(e) => write!(f, "malformed MIDI file: {e}"),
            ScoreLoadError::TimecodeDivision => {
                write!(f, "SMPTE timecode division is not supported")
            }
        }
    }
}

impl std::error::Error for ScoreLoadError {}

impl From<midly::Error> for ScoreLoadError {
    fn from(e: midly::Error) -> Self {
        ScoreLoadError::Parse(e)
    }
}

impl Score {
    /// Decode a Standard MIDI File into a `Score`.
    pub fn from_smf_bytes(bytes: &[u8]) -> Result<Score, ScoreLoadError> {
        let smf = Smf::parse(bytes)?;
        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(tpq) => tpq.as_int(),
            Timing::Timecode(..) => return Err(ScoreLoadError::TimecodeDivision),
        };

        let mut events = Vec::new();
        let mut tempos = Vec::new();

        for track in &smf.tracks {
            let mut tick: u64 = 0;
            for te in track {
                tick += u64::from(te.delta.as_int());
                match te.kind {
                    TrackEventKind::Midi { channel, message } => match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            events.push(TimedEvent::note_on(
                                tick,
                                channel.as_int(),
                                key.as_int(),
                                vel.as_int(),
                            ));
                        }
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            events.push(TimedEvent::note_off(tick, channel.as_int(), key.as_int()));
                        }
                        _ => {}
                    },
                    TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter)) => {
                        tempos.push(TempoChange {
                            tick,
                            beats_per_minute: 60_000_000.0 / f64::from(us_per_quarter.as_int()),
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(Score::new(ticks_per_quarter, events, tempos))
    }
}
