use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::enumerate::error::ConnectionError;
use crate::enumerate::options::{EnumOptions, ReplyMode};

const MULTILINE_READ_FACTOR: usize = 16;

/// One TCP connection to the target, used for a single candidate.
///
/// The socket is closed when the session is dropped, so an early return on
/// any path still releases it.
#[derive(Debug)]
pub struct SmtpSession {
    peer: SocketAddr,
    stream: TcpStream,
    buffer: Vec<u8>,
    reply_mode: ReplyMode,
    max_read: usize,
    banner: String,
}

impl SmtpSession {
    /// Connect to `host` on the configured port and read the greeting banner.
    pub fn connect(host: &str, options: &EnumOptions) -> Result<Self, ConnectionError> {
        let target = format!("{host}:{}", options.port);
        let addrs: Vec<SocketAddr> = (host, options.port)
            .to_socket_addrs()
            .map_err(|err| ConnectionError::new(&target, err))?
            .collect();
        let (stream, peer) = open_stream(&addrs, options.connect_timeout)
            .map_err(|err| ConnectionError::new(&target, err))?;
        stream
            .set_read_timeout(options.read_timeout)
            .map_err(|err| ConnectionError::new(&target, err))?;
        stream
            .set_write_timeout(options.write_timeout)
            .map_err(|err| ConnectionError::new(&target, err))?;

        let mut session = Self {
            peer,
            stream,
            buffer: Vec::new(),
            reply_mode: options.reply_mode,
            max_read: options.max_read.max(1),
            banner: String::new(),
        };
        session
            .read_banner()
            .map_err(|err| ConnectionError::new(&target, err))?;
        Ok(session)
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    fn read_banner(&mut self) -> io::Result<()> {
        let banner = self.read_reply()?;
        debug!(peer = %self.peer, banner = %banner.trim_end(), "S: banner");
        self.banner = banner;
        Ok(())
    }

    pub fn send_command(&mut self, command: &str) -> io::Result<()> {
        debug!(peer = %self.peer, "C: {command}");
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.stream.write_all(&data)?;
        self.stream.flush()
    }

    /// Send `command` and return the raw text of the reply.
    pub fn transact(&mut self, command: &str) -> io::Result<String> {
        self.send_command(command)?;
        let reply = self.read_reply()?;
        debug!(peer = %self.peer, "S: {}", reply.trim_end());
        Ok(reply)
    }

    pub fn read_reply(&mut self) -> io::Result<String> {
        match self.reply_mode {
            ReplyMode::SingleRead => self.read_chunk(),
            ReplyMode::Multiline => self.read_multiline(),
        }
    }

    /// Close the socket in both directions. Dropping the session has the
    /// same effect; this only makes the teardown explicit.
    pub fn close(self) {
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            debug!(peer = %self.peer, error = %err, "shutdown failed");
        }
    }

    fn read_chunk(&mut self) -> io::Result<String> {
        let mut buf = vec![0u8; self.max_read];
        let read = self.stream.read(&mut buf)?;
        if read == 0 {
            return Err(connection_closed());
        }
        Ok(String::from_utf8_lossy(&buf[..read]).into_owned())
    }

    fn read_multiline(&mut self) -> io::Result<String> {
        let limit = self.multiline_limit();
        let mut lines = Vec::new();
        let mut total = 0usize;
        loop {
            let line = self.read_line()?;
            total += line.len() + 1;
            if total > limit {
                return Err(reply_too_long(limit));
            }
            let last = is_final_line(&line);
            lines.push(line);
            if last {
                break;
            }
        }
        Ok(lines.join("\n"))
    }

    fn read_line(&mut self) -> io::Result<String> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                if line.ends_with(b"\r\n") {
                    line.truncate(line.len() - 2);
                } else {
                    line.truncate(line.len() - 1);
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }

            if self.buffer.len() >= self.multiline_limit() {
                return Err(reply_too_long(self.multiline_limit()));
            }
            let mut buf = vec![0u8; self.max_read];
            let read = self.stream.read(&mut buf)?;
            if read == 0 {
                return Err(connection_closed());
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }

    /// Upper bound on one assembled reply.
    fn multiline_limit(&self) -> usize {
        self.max_read.saturating_mul(MULTILINE_READ_FACTOR)
    }
}

fn open_stream(
    addrs: &[SocketAddr],
    timeout: Option<Duration>,
) -> io::Result<(TcpStream, SocketAddr)> {
    let mut last_err = None;
    for addr in addrs {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => return Ok((stream, *addr)),
            Err(err) => {
                debug!(%addr, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no socket address available",
        )
    }))
}

/// A reply line ends the reply unless its status code is followed by `-`.
fn is_final_line(line: &str) -> bool {
    line.as_bytes().get(3) != Some(&b'-')
}

fn reply_too_long(limit: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("reply exceeds {limit} bytes"),
    )
}

fn connection_closed() -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed by peer",
    )
}
