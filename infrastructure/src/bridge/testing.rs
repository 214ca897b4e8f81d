//! In-memory hub for session and client tests.

use crate::bridge::codec::{FrameReader, encode_frame};
use crate::bridge::protocol::Frame;
use async_trait::async_trait;
use chatbridge_application::{AdapterError, BoxedStream, BridgeAdapter, ClientConfig, Connector};
use chatbridge_domain::{
    ChatPayload, ClientIdentity, CommandPayload, Endpoint, ONLINE_COMMAND, OnlineQueryResult,
};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub fn test_config() -> ClientConfig {
    test_config_named("survival")
}

pub fn test_config_named(name: &str) -> ClientConfig {
    ClientConfig::new(
        ClientIdentity::new(name, "secret").unwrap(),
        Endpoint::new("hub.test", 30001),
    )
    .with_handshake_timeout(Duration::from_secs(10))
    .with_command_timeout(Duration::from_secs(5))
    .with_keep_alive(Duration::from_secs(5), Duration::from_secs(15))
    .with_max_protocol_errors(3)
}

/// Hands the client end of a fresh in-memory pipe to the session and the
/// other end to the paired [`FakeHub`].
pub struct DuplexConnector {
    incoming: mpsc::UnboundedSender<DuplexStream>,
}

impl DuplexConnector {
    pub fn pair() -> (Self, FakeHub) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { incoming: tx },
            FakeHub {
                incoming: rx,
                conn: None,
            },
        )
    }
}

#[async_trait]
impl Connector for DuplexConnector {
    async fn connect(&self, _endpoint: &Endpoint) -> io::Result<BoxedStream> {
        let (client, server) = tokio::io::duplex(64 * 1024);
        self.incoming
            .send(server)
            .map_err(|_| io::Error::from(io::ErrorKind::ConnectionRefused))?;
        Ok(Box::new(client))
    }
}

pub struct RefusingConnector;

#[async_trait]
impl Connector for RefusingConnector {
    async fn connect(&self, _endpoint: &Endpoint) -> io::Result<BoxedStream> {
        Err(io::Error::from(io::ErrorKind::ConnectionRefused))
    }
}

type HubReader = FrameReader<BufReader<ReadHalf<DuplexStream>>>;

/// Scripted hub end of a [`DuplexConnector`].
pub struct FakeHub {
    incoming: mpsc::UnboundedReceiver<DuplexStream>,
    conn: Option<(HubReader, WriteHalf<DuplexStream>)>,
}

impl FakeHub {
    /// Accept the next connection and its login, answering with success.
    pub async fn accept(&mut self) -> Frame {
        self.accept_after(&[]).await
    }

    /// Like [`FakeHub::accept`], but send `early` frames before the login result.
    pub async fn accept_after(&mut self, early: &[Frame]) -> Frame {
        let login = self.take_login().await;
        for frame in early {
            self.send(frame).await;
        }
        self.send(&Frame::LoginResult {
            success: true,
            message: String::new(),
        })
        .await;
        login
    }

    /// Accept the next connection and reject its login.
    pub async fn reject(&mut self, message: &str) {
        self.take_login().await;
        self.send(&Frame::LoginResult {
            success: false,
            message: message.to_string(),
        })
        .await;
    }

    pub fn accept_in_background(mut self) -> JoinHandle<FakeHub> {
        tokio::spawn(async move {
            self.accept().await;
            self
        })
    }

    /// Drop the current connection, keeping the listener side alive.
    pub fn disconnect(&mut self) {
        self.conn = None;
    }

    pub async fn send(&mut self, frame: &Frame) {
        let bytes = encode_frame(frame).unwrap();
        self.write(&bytes).await;
    }

    /// Send a body that may not decode, with a valid header.
    pub async fn send_raw(&mut self, body: &[u8]) {
        let mut bytes = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
        bytes.extend_from_slice(body);
        self.write(&bytes).await;
    }

    pub async fn next_frame(&mut self) -> Option<Frame> {
        let (reader, _) = self.conn.as_mut().expect("no connection");
        reader.read_frame().await.ok().flatten()
    }

    /// Next frame that is not a keep-alive.
    pub async fn next_traffic(&mut self) -> Option<Frame> {
        loop {
            match self.next_frame().await {
                Some(Frame::KeepAlive { .. }) => continue,
                other => return other,
            }
        }
    }

    async fn take_login(&mut self) -> Frame {
        let stream = self.incoming.recv().await.expect("connector dropped");
        let (read_half, write_half) = tokio::io::split(stream);
        self.conn = Some((FrameReader::new(BufReader::new(read_half)), write_half));
        self.next_frame().await.expect("no login frame")
    }

    async fn write(&mut self, bytes: &[u8]) {
        let (_, writer) = self.conn.as_mut().expect("no connection");
        writer.write_all(bytes).await.unwrap();
        writer.flush().await.unwrap();
    }
}

struct RelayPeer {
    outbox: mpsc::UnboundedSender<Frame>,
    kick: CancellationToken,
}

/// Hub that authenticates everyone and relays between connected clients:
/// chat goes to every other client, commands and results to their receiver.
pub struct RelayHub {
    connector: Arc<DuplexConnector>,
    peers: Arc<Mutex<HashMap<String, RelayPeer>>>,
    logins: watch::Sender<usize>,
}

impl RelayHub {
    pub fn spawn() -> Self {
        let (connector, mut hub) = DuplexConnector::pair();
        let peers: Arc<Mutex<HashMap<String, RelayPeer>>> = Arc::default();
        let logins = watch::Sender::new(0);

        let accept_peers = Arc::clone(&peers);
        let accept_logins = logins.clone();
        tokio::spawn(async move {
            while let Some(stream) = hub.incoming.recv().await {
                tokio::spawn(serve_peer(
                    stream,
                    Arc::clone(&accept_peers),
                    accept_logins.clone(),
                ));
            }
        });

        Self {
            connector: Arc::new(connector),
            peers,
            logins,
        }
    }

    pub fn connector(&self) -> Arc<DuplexConnector> {
        Arc::clone(&self.connector)
    }

    /// Total successful logins so far.
    pub fn logins(&self) -> usize {
        *self.logins.borrow()
    }

    pub async fn wait_for_logins(&self, count: usize) {
        let mut rx = self.logins.subscribe();
        let _ = rx.wait_for(|seen| *seen >= count).await;
    }

    /// Forcibly close the connection of `name`.
    pub fn kick(&self, name: &str) {
        if let Some(peer) = self.peers.lock().unwrap().remove(name) {
            peer.kick.cancel();
        }
    }
}

async fn serve_peer(
    stream: DuplexStream,
    peers: Arc<Mutex<HashMap<String, RelayPeer>>>,
    logins: watch::Sender<usize>,
) {
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = FrameReader::new(BufReader::new(read_half));

    let Ok(Some(Frame::Login { name, .. })) = reader.read_frame().await else {
        return;
    };
    let (outbox, mut queue) = mpsc::unbounded_channel();
    let kick = CancellationToken::new();
    peers.lock().unwrap().insert(
        name.clone(),
        RelayPeer {
            outbox: outbox.clone(),
            kick: kick.clone(),
        },
    );
    let _ = outbox.send(Frame::LoginResult {
        success: true,
        message: String::new(),
    });
    logins.send_modify(|seen| *seen += 1);

    let writer_kick = kick.clone();
    let writer = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                _ = writer_kick.cancelled() => break,
                frame = queue.recv() => match frame {
                    Some(frame) => frame,
                    None => break,
                },
            };
            let bytes = encode_frame(&frame).unwrap();
            if write_half.write_all(&bytes).await.is_err() || write_half.flush().await.is_err() {
                break;
            }
        }
        let _ = write_half.shutdown().await;
    });

    loop {
        let frame = tokio::select! {
            _ = kick.cancelled() => break,
            frame = reader.read_frame() => match frame {
                Ok(Some(frame)) => frame,
                _ => break,
            },
        };
        let route = |receiver: &str, frame: Frame| {
            if let Some(peer) = peers.lock().unwrap().get(receiver) {
                let _ = peer.outbox.send(frame);
            }
        };
        match frame {
            Frame::KeepAlive { ping: true } => {
                let _ = outbox.send(Frame::KeepAlive { ping: false });
            }
            Frame::Chat { payload, .. } => {
                let others: Vec<_> = peers
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|(peer, _)| **peer != name)
                    .map(|(_, peer)| peer.outbox.clone())
                    .collect();
                for other in others {
                    let _ = other.send(Frame::Chat {
                        sender: name.clone(),
                        payload: payload.clone(),
                    });
                }
            }
            Frame::Command {
                receiver, payload, ..
            } => route(
                &receiver.clone(),
                Frame::Command {
                    sender: name.clone(),
                    receiver,
                    payload,
                },
            ),
            Frame::CommandResult {
                receiver, payload, ..
            } => route(
                &receiver.clone(),
                Frame::CommandResult {
                    sender: name.clone(),
                    receiver,
                    payload,
                },
            ),
            _ => {}
        }
    }

    kick.cancel();
    {
        let mut peers = peers.lock().unwrap();
        if peers.get(&name).is_some_and(|peer| peer.kick.is_cancelled()) {
            peers.remove(&name);
        }
    }
    let _ = writer.await;
}

/// Adapter that records every callback.
pub struct RecordingAdapter {
    chats: Mutex<Vec<(String, ChatPayload)>>,
    commands: Mutex<Vec<(String, CommandPayload)>>,
    chat_count: watch::Sender<usize>,
    roster: Option<Vec<String>>,
}

impl Default for RecordingAdapter {
    fn default() -> Self {
        Self {
            chats: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            chat_count: watch::Sender::new(0),
            roster: None,
        }
    }
}

impl RecordingAdapter {
    /// Chat message that makes `on_chat` return an error.
    pub const FAIL: &'static str = "__fail__";
    /// Chat message that makes `on_chat` panic.
    pub const PANIC: &'static str = "__panic__";

    pub fn with_roster<I: IntoIterator<Item = &'static str>>(names: I) -> Self {
        Self {
            roster: Some(names.into_iter().map(String::from).collect()),
            ..Default::default()
        }
    }

    pub fn chats(&self) -> Vec<(String, ChatPayload)> {
        self.chats.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<(String, CommandPayload)> {
        self.commands.lock().unwrap().clone()
    }

    pub async fn wait_for_chats(&self, count: usize) {
        let mut rx = self.chat_count.subscribe();
        let _ = rx.wait_for(|seen| *seen >= count).await;
    }
}

#[async_trait]
impl BridgeAdapter for RecordingAdapter {
    async fn on_chat(&self, sender: &str, payload: ChatPayload) -> Result<(), AdapterError> {
        let message = payload.message.clone();
        self.chats
            .lock()
            .unwrap()
            .push((sender.to_string(), payload));
        self.chat_count.send_modify(|seen| *seen += 1);

        match message.as_str() {
            Self::FAIL => Err(AdapterError::Platform("refused".to_string())),
            Self::PANIC => panic!("adapter blew up"),
            _ => Ok(()),
        }
    }

    async fn on_command(
        &self,
        sender: &str,
        payload: CommandPayload,
    ) -> Result<Option<Value>, AdapterError> {
        let is_online = payload.command == ONLINE_COMMAND;
        self.commands
            .lock()
            .unwrap()
            .push((sender.to_string(), payload));
        match (&self.roster, is_online) {
            (Some(roster), true) => Ok(Some(OnlineQueryResult::new(roster.clone()).to_value())),
            _ => Ok(None),
        }
    }
}
