//! Frame codec.
//!
//! Frames travel as `Content-Length: <n>\r\n\r\n` followed by `n` bytes of
//! UTF-8 JSON. A broken header or an oversized length means frame
//! boundaries are lost and is fatal for the connection; a body that fails
//! to decode only costs that one frame.

use crate::bridge::error::{BridgeError, Result};
use crate::bridge::protocol::Frame;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::trace;

/// Largest body accepted from the hub (1 MiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Longest header line tolerated before giving up on the stream.
const MAX_HEADER_LINE: usize = 256;

/// Serialize a frame including its transport header.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(frame)?;
    if !matches!(frame, Frame::Login { .. }) {
        trace!("Encoding frame: {}", String::from_utf8_lossy(&body));
    }
    let mut bytes = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode one frame body.
pub fn decode_body(body: &[u8]) -> Result<Frame> {
    let frame: Frame = serde_json::from_slice(body).map_err(|e| {
        BridgeError::Protocol(format!(
            "{} in {}",
            e,
            chatbridge_domain::preview(&String::from_utf8_lossy(body), 120)
        ))
    })?;
    frame
        .validate()
        .map_err(|e| BridgeError::Protocol(e.to_string()))?;
    Ok(frame)
}

/// Reads frames from a buffered byte stream.
pub struct FrameReader<R> {
    reader: R,
    line: String,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }

    /// Read the next frame.
    ///
    /// `Ok(None)` means the peer closed the stream cleanly between frames.
    /// [`BridgeError::Protocol`] is returned for an undecodable body; the
    /// reader is still positioned at the next frame afterwards.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        let Some(len) = self.read_content_length().await? else {
            return Ok(None);
        };

        // Remaining header lines up to the blank separator
        loop {
            if self.read_line().await? == 0 {
                return Err(BridgeError::TransportClosed);
            }
            if self.line.trim().is_empty() {
                break;
            }
        }

        let mut body = vec![0u8; len];
        self.reader.read_exact(&mut body).await?;
        trace!("Received frame: {}", String::from_utf8_lossy(&body));
        decode_body(&body).map(Some)
    }

    async fn read_content_length(&mut self) -> Result<Option<usize>> {
        loop {
            if self.read_line().await? == 0 {
                return Ok(None);
            }
            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(len_str) = trimmed.strip_prefix("Content-Length:") else {
                return Err(BridgeError::Framing(format!(
                    "expected Content-Length header, got {:?}",
                    chatbridge_domain::preview(trimmed, 60)
                )));
            };
            let len: usize = len_str
                .trim()
                .parse()
                .map_err(|_| BridgeError::Framing(format!("invalid length {:?}", len_str.trim())))?;
            if len > MAX_FRAME_SIZE {
                return Err(BridgeError::Framing(format!(
                    "frame of {} bytes exceeds the {} byte limit",
                    len, MAX_FRAME_SIZE
                )));
            }
            return Ok(Some(len));
        }
    }

    async fn read_line(&mut self) -> Result<usize> {
        self.line.clear();
        // One byte past the limit is enough to tell an overlong line apart
        let limit = MAX_HEADER_LINE as u64 + 1;
        let read = (&mut self.reader)
            .take(limit)
            .read_line(&mut self.line)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::InvalidData {
                    BridgeError::Framing("header is not valid UTF-8".to_string())
                } else {
                    BridgeError::Transport(e)
                }
            })?;
        if self.line.len() > MAX_HEADER_LINE {
            return Err(BridgeError::Framing(format!(
                "header line of {} bytes",
                self.line.len()
            )));
        }
        Ok(read)
    }
}
