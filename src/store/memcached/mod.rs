//! Memcached-backed paste store.
//!
//! Speaks the ASCII protocol over a single lazily opened TCP connection.
//! Commands are serialized on that connection; a connection that fails in
//! any way is dropped and reopened by the next command.

mod protocol;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

use self::protocol::{exptime, is_valid_key, parse_reply, Command, Reply};
use super::PasteStore;

type Connection = BufStream<TcpStream>;

/// Address memcached clients fall back to when none is configured.
pub const DEFAULT_ADDR: &str = "127.0.0.1:11211";

/// What a command produced.
enum Outcome {
    Value(Option<Bytes>),
    Stored,
    Deleted(bool),
}

pub struct MemcachedStore {
    addr: String,
    ttl: u64,
    conn: Mutex<Option<Connection>>,
}

impl MemcachedStore {
    /// Creates a store for the server at `addr`. No connection is made until
    /// the first command.
    pub fn new(addr: impl Into<String>, ttl: u64) -> Self {
        Self {
            addr: addr.into(),
            ttl,
            conn: Mutex::new(None),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn execute(&self, command: Command<'_>) -> StoreResult<Outcome> {
        let mut slot = self.conn.lock().await;

        let mut conn = match slot.take() {
            Some(conn) => conn,
            None => {
                let stream = TcpStream::connect(&self.addr).await?;
                stream.set_nodelay(true)?;
                debug!("connected to memcached at {}", self.addr);
                BufStream::new(stream)
            }
        };

        let outcome = exchange(&mut conn, command).await;
        if outcome.is_ok() {
            *slot = Some(conn);
        }
        outcome
    }
}

async fn exchange(conn: &mut Connection, command: Command<'_>) -> StoreResult<Outcome> {
    conn.write_all(&command.encode()).await?;
    conn.flush().await?;

    match (command, read_reply(conn).await?) {
        (Command::Get(_), Reply::End) => Ok(Outcome::Value(None)),
        (Command::Get(_), Reply::Value { len, .. }) => {
            let mut data = vec![0u8; len + 2];
            conn.read_exact(&mut data).await?;
            if !data.ends_with(b"\r\n") {
                return Err(StoreError::Protocol(
                    "data block not terminated by CRLF".to_string(),
                ));
            }
            data.truncate(len);

            match read_reply(conn).await? {
                Reply::End => Ok(Outcome::Value(Some(Bytes::from(data)))),
                other => Err(StoreError::Protocol(format!(
                    "expected END after value, got {other:?}"
                ))),
            }
        }
        (Command::Set { .. }, Reply::Stored) => Ok(Outcome::Stored),
        (Command::Delete(_), Reply::Deleted) => Ok(Outcome::Deleted(true)),
        (Command::Delete(_), Reply::NotFound) => Ok(Outcome::Deleted(false)),
        (_, Reply::Error(message)) => Err(StoreError::Server(message)),
        (_, other) => Err(StoreError::Protocol(format!("unexpected reply {other:?}"))),
    }
}

async fn read_reply(conn: &mut Connection) -> StoreResult<Reply> {
    let mut line = String::new();
    if conn.read_line(&mut line).await? == 0 {
        return Err(StoreError::Protocol(
            "connection closed by server".to_string(),
        ));
    }
    parse_reply(line.trim_end_matches(&['\r', '\n'][..]))
}

fn unexpected<T>() -> StoreResult<T> {
    Err(StoreError::Protocol("reply does not match command".to_string()))
}

#[async_trait]
impl PasteStore for MemcachedStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Bytes>> {
        if !is_valid_key(id) {
            return Ok(None);
        }
        match self.execute(Command::Get(id)).await? {
            Outcome::Value(value) => Ok(value),
            _ => unexpected(),
        }
    }

    async fn set(&self, id: &str, content: Bytes) -> StoreResult<()> {
        if !is_valid_key(id) {
            return Err(StoreError::InvalidKey(id.to_string()));
        }
        let command = Command::Set {
            key: id,
            exptime: exptime(self.ttl),
            data: &content,
        };
        match self.execute(command).await? {
            Outcome::Stored => Ok(()),
            _ => unexpected(),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        if !is_valid_key(id) {
            return Ok(false);
        }
        match self.execute(Command::Delete(id)).await? {
            Outcome::Deleted(existed) => Ok(existed),
            _ => unexpected(),
        }
    }
}
