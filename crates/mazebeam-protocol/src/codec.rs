//! Codec trait and the text codec used on the bus.
//!
//! A "codec" (coder/decoder) converts between [`Message`] values and the
//! raw bytes of one datagram. The rest of the system only depends on the
//! [`Codec`] trait; [`TextCodec`] is the line-oriented ASCII format every
//! process on the bus speaks.
//!
//! Decoding is deliberately lenient. Numeric fields that fail to parse
//! become `0`, missing fields take their default, and unknown message
//! types are reported as [`ProtocolError::UnknownType`] so the receive
//! loop can drop them without noise.

use crate::{
    BeamAction, BeamEvent, GameState, LightNode, MazeSnapshot, Message,
    Orientation, ProtocolError, WallState, MAX_GRID_SIZE,
};

/// Converts messages to datagram bytes and back.
///
/// `Send + Sync + 'static` so a codec can live inside long-running tokio
/// tasks next to the socket it serves.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into the bytes of one datagram.
    fn encode(&self, msg: &Message) -> Vec<u8>;

    /// Parses the bytes of one datagram.
    ///
    /// # Errors
    /// Returns [`ProtocolError`] when the datagram is empty, names an
    /// unknown message type, or carries a field that has no sensible
    /// default (such as an unknown game state name).
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

// ---------------------------------------------------------------------------
// TextCodec
// ---------------------------------------------------------------------------

/// The whitespace-delimited ASCII codec.
///
/// ## Example
///
/// ```rust
/// use mazebeam_protocol::{BeamEvent, Codec, Message, Orientation, TextCodec};
///
/// let codec = TextCodec;
/// let msg = codec.decode(b"beam b h 2 3").unwrap();
/// assert_eq!(msg, Message::Beam(BeamEvent::broken(Orientation::Horizontal, 2, 3)));
/// assert_eq!(codec.encode(&msg), b"beam b h 2 3");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn encode(&self, msg: &Message) -> Vec<u8> {
        msg.to_string().into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        // The protocol is ASCII; lossy conversion keeps a stray byte from
        // costing us the whole datagram.
        let text = String::from_utf8_lossy(data);
        let tokens = tokenize(&text);
        let mut fields = tokens.into_iter();

        let kind = fields.next().ok_or(ProtocolError::Empty)?;
        match kind {
            "beam" => Ok(decode_beam(fields)),
            "event" => Ok(decode_event(fields)),
            "maze" => decode_maze(fields),
            "playerloc" => Ok(Message::PlayerLoc {
                x: lenient_int(fields.next()),
                y: lenient_int(fields.next()),
            }),
            "sound" => match fields.next() {
                Some(cue) => Ok(Message::Sound(cue.to_string())),
                None => Err(ProtocolError::InvalidMessage(
                    "sound without a cue name".into(),
                )),
            },
            "state" => decode_state(fields),
            "lightnodes" => Ok(decode_lightnodes(fields)),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Splits a datagram into tokens.
///
/// A token is either a `"quoted string"` (quotes included, may contain
/// spaces) or a run of non-whitespace characters. A `"` without a closing
/// partner starts an ordinary bare token.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let quoted_len = rest
            .strip_prefix('"')
            .and_then(|inner| inner.find('"'))
            .map(|close| close + 2);

        let len = quoted_len.unwrap_or_else(|| {
            rest.find(char::is_whitespace).unwrap_or(rest.len())
        });

        tokens.push(&rest[..len]);
        rest = rest[len..].trim_start();
    }

    tokens
}

/// Parses the leading integer of a token, `0` when there is none.
///
/// `"12"` → 12, `"-3"` → -3, `"7abc"` → 7, `"abc"` → 0, missing → 0.
fn lenient_int(token: Option<&str>) -> i32 {
    let Some(token) = token else {
        return 0;
    };
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i32>().unwrap_or(0);
    if negative { -value } else { value }
}

fn lenient_u16(token: Option<&str>) -> u16 {
    u16::try_from(lenient_int(token)).unwrap_or(0)
}

fn strip_quotes(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(token)
}

// ---------------------------------------------------------------------------
// Per-type decoders
// ---------------------------------------------------------------------------

fn decode_beam<'a>(mut fields: impl Iterator<Item = &'a str>) -> Message {
    let action = if fields.next() == Some("m") {
        BeamAction::Make
    } else {
        BeamAction::Break
    };
    let orientation = if fields.next() == Some("h") {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    Message::Beam(BeamEvent {
        action,
        orientation,
        x: lenient_int(fields.next()),
        y: lenient_int(fields.next()),
    })
}

fn decode_event<'a>(mut fields: impl Iterator<Item = &'a str>) -> Message {
    let source = fields.next().unwrap_or_default();
    let text = fields.next().map(strip_quotes).unwrap_or_default();
    Message::event(source, text)
}

fn decode_maze<'a>(
    mut fields: impl Iterator<Item = &'a str>,
) -> Result<Message, ProtocolError> {
    let declared = lenient_int(fields.next());
    let size = usize::try_from(declared).unwrap_or(0);
    if size > MAX_GRID_SIZE {
        return Err(ProtocolError::InvalidMessage(format!(
            "maze size {declared} exceeds {MAX_GRID_SIZE}"
        )));
    }

    let mut next_wall = || {
        fields
            .next()
            .and_then(|t| u8::try_from(lenient_int(Some(t))).ok())
            .and_then(WallState::from_code)
            .unwrap_or_default()
    };

    let mut snapshot = MazeSnapshot::open(size);
    for row in snapshot.horizontal.iter_mut() {
        for wall in row.iter_mut() {
            *wall = next_wall();
        }
    }
    for row in snapshot.vertical.iter_mut() {
        for wall in row.iter_mut() {
            *wall = next_wall();
        }
    }
    Ok(Message::Maze(snapshot))
}

fn decode_state<'a>(
    mut fields: impl Iterator<Item = &'a str>,
) -> Result<Message, ProtocolError> {
    let mut next_state = || -> Result<GameState, ProtocolError> {
        fields
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(ProtocolError::InvalidMessage)
    };
    let from = next_state()?;
    let to = next_state()?;
    Ok(Message::State { from, to })
}

fn decode_lightnodes<'a>(
    mut fields: impl Iterator<Item = &'a str>,
) -> Message {
    let count = usize::try_from(lenient_int(fields.next())).unwrap_or(0);
    let nodes = fields
        .take(count)
        .map(|token| {
            let mut parts = token.split('.');
            LightNode {
                universe: lenient_u16(parts.next()),
                subuniverse: lenient_u16(parts.next()),
                port: lenient_u16(parts.next()),
            }
        })
        .collect();
    Message::LightNodes(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_bare_and_quoted() {
        assert_eq!(
            tokenize("event maze-driver \"hello there\""),
            vec!["event", "maze-driver", "\"hello there\""]
        );
        assert_eq!(tokenize("  beam  b h 1 2 "), vec!["beam", "b", "h", "1", "2"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_unterminated_quote_is_bare() {
        assert_eq!(tokenize("event x \"oops here"), vec!["event", "x", "\"oops", "here"]);
    }

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(Some("12")), 12);
        assert_eq!(lenient_int(Some("-3")), -3);
        assert_eq!(lenient_int(Some("7abc")), 7);
        assert_eq!(lenient_int(Some("abc")), 0);
        assert_eq!(lenient_int(None), 0);
        assert_eq!(lenient_int(Some("99999999999")), 0);
    }

    #[test]
    fn test_decode_beam_example() {
        let msg = TextCodec.decode(b"beam b h 2 3").unwrap();
        let Message::Beam(beam) = msg else {
            panic!("expected beam, got {msg:?}");
        };
        assert_eq!(beam.action, BeamAction::Break);
        assert_eq!(beam.orientation, Orientation::Horizontal);
        assert_eq!((beam.x, beam.y), (2, 3));
    }

    #[test]
    fn test_decode_beam_malformed_numbers_become_zero() {
        let msg = TextCodec.decode(b"beam m v four").unwrap();
        assert_eq!(msg, Message::Beam(BeamEvent::made(Orientation::Vertical, 0, 0)));
    }

    #[test]
    fn test_decode_event_strips_quotes() {
        let msg = TextCodec
            .decode(b"event sound-driver \"played buzz\"")
            .unwrap();
        assert_eq!(msg, Message::event("sound-driver", "played buzz"));
    }

    #[test]
    fn test_decode_unknown_type() {
        assert_eq!(
            TextCodec.decode(b"heartbeat 1"),
            Err(ProtocolError::UnknownType("heartbeat".into()))
        );
        assert_eq!(TextCodec.decode(b""), Err(ProtocolError::Empty));
        assert_eq!(TextCodec.decode(b" \n"), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_decode_state() {
        assert_eq!(
            TextCodec.decode(b"state mazegen ingame").unwrap(),
            Message::State {
                from: GameState::MazeGen,
                to: GameState::InGame,
            }
        );
        assert!(matches!(
            TextCodec.decode(b"state attract lobby"),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_decode_sound_requires_cue() {
        assert_eq!(TextCodec.decode(b"sound buzz").unwrap(), Message::sound("buzz"));
        assert!(TextCodec.decode(b"sound").is_err());
    }

    #[test]
    fn test_decode_playerloc() {
        assert_eq!(
            TextCodec.decode(b"playerloc 2 0").unwrap(),
            Message::PlayerLoc { x: 2, y: 0 }
        );
    }

    #[test]
    fn test_decode_lightnodes() {
        let msg = TextCodec.decode(b"lightnodes 2 0.0.1 1.x.3").unwrap();
        assert_eq!(
            msg,
            Message::LightNodes(vec![
                LightNode { universe: 0, subuniverse: 0, port: 1 },
                LightNode { universe: 1, subuniverse: 0, port: 3 },
            ])
        );
    }

    #[test]
    fn test_decode_maze_short_stream_pads_with_open() {
        let msg = TextCodec.decode(b"maze 1 3 4").unwrap();
        let Message::Maze(snap) = msg else {
            panic!("expected maze");
        };
        assert_eq!(snap.horizontal, vec![vec![WallState::Start], vec![WallState::End]]);
        assert_eq!(snap.vertical, vec![vec![WallState::Open, WallState::Open]]);
    }

    #[test]
    fn test_decode_maze_rejects_oversized_grid() {
        assert!(matches!(
            TextCodec.decode(b"maze 500 0 0"),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }
}
