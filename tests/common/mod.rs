//! Shared test helpers
//!
//! A tiny in-process memcached stand-in speaking the text protocol subset
//! the memcache backend uses.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kvstash::CacheConfig;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub type Store = Arc<Mutex<HashMap<String, Vec<u8>>>>;
type Delay = Arc<Mutex<Option<Duration>>>;

// == Fake Memcached ==
pub struct FakeMemcached {
    pub addr: SocketAddr,
    pub store: Store,
    delay: Delay,
    handle: JoinHandle<()>,
}

impl FakeMemcached {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store: Store = Arc::new(Mutex::new(HashMap::new()));

        let delay: Delay = Arc::new(Mutex::new(None));

        let shared = store.clone();
        let pending = delay.clone();
        let handle = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve(socket, shared.clone(), pending.clone()));
            }
        });

        Self {
            addr,
            store,
            delay,
            handle,
        }
    }

    /// Backend options pointing at this server
    pub fn config(&self) -> CacheConfig {
        CacheConfig::from_pairs([
            ("memcacheHost", self.addr.ip().to_string()),
            ("memcachePort", self.addr.port().to_string()),
        ])
    }

    /// Writes a raw blob, bypassing the client
    pub fn insert_raw(&self, key: &str, blob: Vec<u8>) {
        self.store.lock().unwrap().insert(key.to_string(), blob);
    }

    /// Holds back the next reply, on any connection, for `delay`
    pub fn delay_next_reply(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl Drop for FakeMemcached {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(socket: TcpStream, store: Store, delay: Delay) {
    let mut stream = BufStream::new(socket);

    loop {
        let mut line = String::new();
        match stream.read_line(&mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let reply: Vec<u8> = match parts.as_slice() {
            ["set", key, _flags, _exptime, len] => {
                let len: usize = len.parse().unwrap();
                let mut data = vec![0u8; len + 2];
                if stream.read_exact(&mut data).await.is_err() {
                    return;
                }
                data.truncate(len);
                store.lock().unwrap().insert(key.to_string(), data);
                b"STORED\r\n".to_vec()
            }
            ["get", key] => {
                let found = store.lock().unwrap().get(*key).cloned();
                match found {
                    Some(data) => {
                        let mut reply = format!("VALUE {} 0 {}\r\n", key, data.len()).into_bytes();
                        reply.extend_from_slice(&data);
                        reply.extend_from_slice(b"\r\nEND\r\n");
                        reply
                    }
                    None => b"END\r\n".to_vec(),
                }
            }
            ["delete", key] => {
                if store.lock().unwrap().remove(*key).is_some() {
                    b"DELETED\r\n".to_vec()
                } else {
                    b"NOT_FOUND\r\n".to_vec()
                }
            }
            ["flush_all"] => {
                store.lock().unwrap().clear();
                b"OK\r\n".to_vec()
            }
            _ => b"ERROR\r\n".to_vec(),
        };

        let pause = delay.lock().unwrap().take();
        if let Some(pause) = pause {
            tokio::time::sleep(pause).await;
        }

        if stream.write_all(&reply).await.is_err() || stream.flush().await.is_err() {
            return;
        }
    }
}
