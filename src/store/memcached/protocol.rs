//! Memcached ASCII protocol: command encoding and reply parsing.

use chrono::Utc;

use crate::error::{StoreError, StoreResult};

/// Longest key memcached accepts.
pub const MAX_KEY_LENGTH: usize = 250;

/// Expiration times above this many seconds are read by memcached as Unix
/// timestamps rather than offsets.
const RELATIVE_EXPTIME_LIMIT: u64 = 60 * 60 * 24 * 30;

/// Whether `key` can be sent on the wire: 1 to 250 printable, non-space
/// ASCII bytes.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LENGTH && key.bytes().all(|b| b.is_ascii_graphic())
}

/// Converts a TTL in seconds to memcached's `exptime` field.
pub fn exptime(ttl: u64) -> u64 {
    if ttl <= RELATIVE_EXPTIME_LIMIT {
        ttl
    } else {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        now.saturating_add(ttl)
    }
}

// == Commands ==
/// A request sent to the server. Keys must already be validated.
#[derive(Debug, Clone, Copy)]
pub enum Command<'a> {
    Get(&'a str),
    Set {
        key: &'a str,
        exptime: u64,
        data: &'a [u8],
    },
    Delete(&'a str),
}

impl Command<'_> {
    /// Serializes the command, data block included.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Get(key) => format!("get {key}\r\n").into_bytes(),
            Command::Set { key, exptime, data } => {
                let mut buf = format!("set {key} 0 {exptime} {}\r\n", data.len()).into_bytes();
                buf.reserve(data.len() + 2);
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\r\n");
                buf
            }
            Command::Delete(key) => format!("delete {key}\r\n").into_bytes(),
        }
    }
}

// == Replies ==
/// A single reply line from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Header of a data block of `len` bytes
    Value { key: String, len: usize },
    End,
    Stored,
    NotStored,
    Deleted,
    NotFound,
    /// `ERROR`, `CLIENT_ERROR ...` or `SERVER_ERROR ...`
    Error(String),
}

/// Parses one reply line, without its trailing CRLF.
pub fn parse_reply(line: &str) -> StoreResult<Reply> {
    let mut parts = line.split(' ');
    let reply = match parts.next().unwrap_or_default() {
        "VALUE" => {
            let key = parts.next();
            let _flags = parts.next();
            let len = parts.next().and_then(|n| n.parse::<usize>().ok());
            match (key, len) {
                (Some(key), Some(len)) => Reply::Value {
                    key: key.to_string(),
                    len,
                },
                _ => return Err(StoreError::Protocol(format!("malformed VALUE line: {line:?}"))),
            }
        }
        "END" => Reply::End,
        "STORED" => Reply::Stored,
        "NOT_STORED" => Reply::NotStored,
        "DELETED" => Reply::Deleted,
        "NOT_FOUND" => Reply::NotFound,
        "ERROR" | "CLIENT_ERROR" | "SERVER_ERROR" => Reply::Error(line.to_string()),
        _ => return Err(StoreError::Protocol(format!("unexpected reply: {line:?}"))),
    };
    Ok(reply)
}
