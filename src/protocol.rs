//! Line protocol parser and response generator.
//!
//! Every request is a single line holding one command:
//! - `PUT` + 8-byte key + value (up to 160 bytes)
//! - `GET` + 8-byte key
//!
//! PUT and GET fail differently on malformed input: a bad PUT (or an
//! unrecognized command) gets the error token, while a GET with the wrong
//! key length gets a bare newline — the same answer as a missing key. Both
//! behaviors are load-bearing for existing clients.

use bytes::{Bytes, BytesMut};

/// Width of the command name at the start of every request.
pub const CMD_SIZE: usize = 3;

/// Fixed width of every key.
pub const KEY_SIZE: usize = 8;

/// Maximum value length accepted by PUT.
pub const MAX_VALUE_SIZE: usize = 160;

/// Fixed-width opaque key addressing a stored value.
///
/// Keys are arbitrary byte strings of exactly [`KEY_SIZE`] bytes; they are
/// not required to be printable or numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key([u8; KEY_SIZE]);

impl Key {
    /// Build a key from a byte slice of exactly [`KEY_SIZE`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Key> {
        let key: [u8; KEY_SIZE] = bytes.try_into().ok()?;
        Some(Key(key))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store a value under a key, replacing any previous value.
    Put { key: Key, value: Bytes },

    /// Fetch the value stored under a key.
    Get { key: Key },

    /// A GET whose key portion is not exactly [`KEY_SIZE`] bytes.
    /// Answered with an empty line, indistinguishable from a missing key.
    MalformedGet,

    /// Anything else: unknown command, or a PUT without a full key or with
    /// an oversized value. Answered with the error token.
    Invalid,
}

/// Parser for the line protocol
pub struct Parser;

impl Parser {
    /// Parse a command from one frame.
    ///
    /// The frame must not contain the line terminator; trailing whitespace
    /// remnants (e.g. `\r` from CRLF clients) are stripped before parsing.
    /// Every frame parses to exactly one `Command` variant — parsing never
    /// fails outright.
    pub fn parse(frame: &[u8]) -> Command {
        let line = trim_line_end(frame);

        if line.len() < CMD_SIZE {
            return Command::Invalid;
        }

        match &line[..CMD_SIZE] {
            b"PUT" => Self::parse_put(&line[CMD_SIZE..]),
            b"GET" => Self::parse_get(&line[CMD_SIZE..]),
            _ => Command::Invalid,
        }
    }

    /// Parse the remainder of a PUT: 8-byte key, then the value.
    fn parse_put(rest: &[u8]) -> Command {
        if rest.len() < KEY_SIZE {
            return Command::Invalid;
        }

        let (key, value) = rest.split_at(KEY_SIZE);
        if value.len() > MAX_VALUE_SIZE {
            return Command::Invalid;
        }

        // split_at gave us exactly KEY_SIZE bytes, so this cannot fail
        match Key::from_slice(key) {
            Some(key) => Command::Put {
                key,
                value: Bytes::copy_from_slice(value),
            },
            None => Command::Invalid,
        }
    }

    /// Parse the remainder of a GET: exactly an 8-byte key, nothing after.
    fn parse_get(rest: &[u8]) -> Command {
        match Key::from_slice(rest) {
            Some(key) => Command::Get { key },
            None => Command::MalformedGet,
        }
    }
}

/// Response generator for the line protocol
pub struct Response;

impl Response {
    /// Acknowledgement for a successful PUT
    pub fn ok() -> &'static [u8] {
        b"OK\n"
    }

    /// Error token for malformed PUTs and unrecognized commands
    pub fn error() -> &'static [u8] {
        b"NO\n"
    }

    /// Empty line: GET of a missing key, or a malformed GET
    pub fn empty() -> &'static [u8] {
        b"\n"
    }

    /// A stored value followed by the line terminator
    pub fn value(data: &[u8]) -> BytesMut {
        let mut response = BytesMut::with_capacity(data.len() + 1);
        response.extend_from_slice(data);
        response.extend_from_slice(b"\n");
        response
    }
}

/// Strip trailing ASCII whitespace from a frame.
fn trim_line_end(frame: &[u8]) -> &[u8] {
    let mut end = frame.len();
    while end > 0 && frame[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &frame[..end]
}
