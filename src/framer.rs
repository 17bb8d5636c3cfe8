//! Frame accumulation over a byte stream.
//!
//! TCP delivers bytes, not messages: a request may arrive one byte at a
//! time or in a single chunk. The framer owns that reassembly explicitly
//! instead of leaning on a line-buffered read primitive, so fragmented
//! delivery is a tested path with a hard cap on how much one connection
//! can buffer.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::protocol::{CMD_SIZE, KEY_SIZE, MAX_VALUE_SIZE};

/// Hard cap on the bytes accumulated for one frame.
///
/// The largest well-formed request is `CMD_SIZE + KEY_SIZE + MAX_VALUE_SIZE`
/// bytes before its terminator. One extra byte is admitted so the parser
/// still sees an oversized value and answers with the error token; without
/// the slack the framer would clip such a request down to a valid
/// maximum-size PUT.
pub const MAX_FRAME_SIZE: usize = CMD_SIZE + KEY_SIZE + MAX_VALUE_SIZE + 1;

/// Read exactly one frame from the stream.
///
/// Accumulates until a `\n` is observed (consumed and excluded from the
/// frame), the accumulated length reaches [`MAX_FRAME_SIZE`], or the stream
/// ends. At EOF whatever has arrived is the frame, possibly empty. A
/// delimiter sitting beyond the cap in a single large read does not extend
/// the frame — the result is the same as if the bytes had arrived one at a
/// time.
///
/// No timeout is applied here; a client that sends nothing parks its
/// connection task until it disconnects.
pub async fn read_frame<R>(reader: &mut R) -> std::io::Result<BytesMut>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(MAX_FRAME_SIZE);

    loop {
        let window = buffer.len().min(MAX_FRAME_SIZE);
        if let Some(pos) = buffer[..window].iter().position(|&b| b == b'\n') {
            buffer.truncate(pos);
            return Ok(buffer);
        }

        if buffer.len() >= MAX_FRAME_SIZE {
            buffer.truncate(MAX_FRAME_SIZE);
            return Ok(buffer);
        }

        let n = reader.read_buf(&mut buffer).await?;
        if n == 0 {
            // EOF: the partial line is the frame
            return Ok(buffer);
        }
    }
}
