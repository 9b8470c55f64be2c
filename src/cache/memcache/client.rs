//! Memcached Text Protocol Client
//!
//! Just the commands the cache backend needs: `set`, `get`, `delete` and
//! `flush_all`, over one buffered TCP connection.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Longest key memcached accepts, in bytes
pub const MAX_KEY_LENGTH: usize = 250;

/// Largest item memcached stores with its default `-I 1m` setting
pub const MAX_VALUE_LENGTH: usize = 1024 * 1024;

// == Key Validation ==
/// Rejects keys the text protocol cannot carry.
///
/// Memcached keys are 1..=250 bytes with no whitespace or control bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.bytes().any(|b| b <= b' ' || b == 0x7f) {
        return Err(CacheError::InvalidKey(format!(
            "key {:?} contains whitespace or control characters",
            key
        )));
    }
    Ok(())
}

// == Memcache Client ==
/// A single connection to a memcached server.
///
/// A request and its reply form one exchange. If an exchange is abandoned
/// halfway (the future was dropped, or the reply could not be parsed) the
/// connection is out of step with the server and is replaced before the next
/// command.
#[derive(Debug)]
pub struct MemcacheClient {
    stream: BufStream<TcpStream>,
    host: String,
    port: u16,
    addr: String,
    // Request written, reply not fully read
    in_flight: bool,
}

impl MemcacheClient {
    // == Connect ==
    /// Opens a connection to `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        let stream = open_stream(host, port, &addr).await?;
        info!(%addr, "connected to memcache server");

        Ok(Self {
            stream,
            host: host.to_string(),
            port,
            addr,
            in_flight: false,
        })
    }

    /// `host:port` this client is connected to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Starts an exchange, replacing the connection if the previous one was
    /// left unfinished.
    async fn begin(&mut self) -> Result<()> {
        if self.in_flight {
            warn!(addr = %self.addr, "previous memcache exchange unfinished, reconnecting");
            self.stream = open_stream(&self.host, self.port, &self.addr).await?;
        }
        self.in_flight = true;
        Ok(())
    }

    /// Marks the reply of the current exchange as fully read.
    fn finish(&mut self) {
        self.in_flight = false;
    }

    // == Set ==
    /// Stores `data` under `key` with no server-side expiry.
    pub async fn set(&mut self, key: &str, data: &[u8]) -> Result<()> {
        validate_key(key)?;
        if data.len() > MAX_VALUE_LENGTH {
            return Err(CacheError::Protocol(format!(
                "value for '{}' is {} bytes, above the {} byte item limit",
                key,
                data.len(),
                MAX_VALUE_LENGTH
            )));
        }

        self.begin().await?;
        let header = format!("set {} 0 0 {}\r\n", key, data.len());
        self.stream.write_all(header.as_bytes()).await?;
        self.stream.write_all(data).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;

        let reply = self.read_reply().await?;
        self.finish();
        match reply.as_str() {
            "STORED" => Ok(()),
            other => Err(CacheError::Protocol(format!(
                "set '{}' was rejected: {}",
                key, other
            ))),
        }
    }

    // == Get ==
    /// Fetches the raw bytes stored under `key`.
    pub async fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        self.begin().await?;
        self.send_line(&format!("get {}", key)).await?;

        let header = self.read_reply().await?;
        if header == "END" {
            self.finish();
            return Ok(None);
        }

        let len = parse_value_header(&header, key)?;
        // Payload is followed by its own CRLF
        let mut payload = vec![0u8; payload_len(len)?];
        self.stream.read_exact(&mut payload).await.map_err(closed)?;
        if !payload.ends_with(b"\r\n") {
            return Err(CacheError::Protocol(format!(
                "value for '{}' is not terminated by CRLF",
                key
            )));
        }
        payload.truncate(len);

        let end = self.read_reply().await?;
        if end != "END" {
            return Err(CacheError::Protocol(format!(
                "expected END after value, got '{}'",
                end
            )));
        }
        self.finish();
        debug!(key, bytes = len, "memcache hit");
        Ok(Some(payload))
    }

    // == Delete ==
    /// Deletes `key`; returns whether the server had it.
    pub async fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        self.begin().await?;
        self.send_line(&format!("delete {}", key)).await?;

        let reply = self.read_reply().await?;
        self.finish();
        match reply.as_str() {
            "DELETED" => Ok(true),
            "NOT_FOUND" => Ok(false),
            other => Err(CacheError::Protocol(format!(
                "delete '{}' failed: {}",
                key, other
            ))),
        }
    }

    // == Flush All ==
    /// Invalidates every item on the server.
    pub async fn flush_all(&mut self) -> Result<()> {
        self.begin().await?;
        self.send_line("flush_all").await?;

        let reply = self.read_reply().await?;
        self.finish();
        match reply.as_str() {
            "OK" => Ok(()),
            other => Err(CacheError::Protocol(format!("flush_all failed: {}", other))),
        }
    }

    async fn send_line(&mut self, line: &str) -> Result<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one reply line, mapping generic error replies to errors.
    ///
    /// Error replies leave the exchange unfinished: after a `CLIENT_ERROR`
    /// the server may still be consuming the rest of the request.
    async fn read_reply(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.stream.read_line(&mut line).await?;
        if n == 0 {
            return Err(CacheError::Connection(format!(
                "memcache server {} closed the connection",
                self.addr
            )));
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();

        if line == "ERROR" || line.starts_with("CLIENT_ERROR") || line.starts_with("SERVER_ERROR")
        {
            return Err(CacheError::Protocol(line));
        }
        Ok(line)
    }
}

async fn open_stream(host: &str, port: u16, addr: &str) -> Result<BufStream<TcpStream>> {
    let stream = TcpStream::connect((host, port)).await.map_err(|e| {
        CacheError::Connection(format!(
            "could not connect to memcache server {}: {}",
            addr, e
        ))
    })?;
    stream.set_nodelay(true)?;
    Ok(BufStream::new(stream))
}

/// Buffer size for a value of `len` bytes plus its trailing CRLF.
fn payload_len(len: usize) -> Result<usize> {
    len.checked_add(2)
        .filter(|_| len <= MAX_VALUE_LENGTH)
        .ok_or_else(|| {
            CacheError::Protocol(format!(
                "server announced a {} byte value, above the {} byte item limit",
                len, MAX_VALUE_LENGTH
            ))
        })
}

/// Parses `VALUE <key> <flags> <bytes>` and returns the byte count.
fn parse_value_header(header: &str, key: &str) -> Result<usize> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    match parts.as_slice() {
        ["VALUE", returned, _flags, len, ..] if *returned == key => len
            .parse::<usize>()
            .map_err(|_| CacheError::Protocol(format!("bad value length in '{}'", header))),
        _ => Err(CacheError::Protocol(format!(
            "unexpected reply to get '{}': {}",
            key, header
        ))),
    }
}

fn closed(err: std::io::Error) -> CacheError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        CacheError::Connection("memcache server closed the connection mid-value".to_string())
    } else {
        CacheError::Io(err)
    }
}
