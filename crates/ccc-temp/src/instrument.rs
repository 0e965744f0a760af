//! Text query transports for the temperature controller.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use ccc_core::errors::{CccError, ErrorInfo};
use log::debug;

/// A message-based instrument answering one line per query.
pub trait Instrument {
    /// Sends `command` and returns the response with line terminators trimmed.
    fn query(&mut self, command: &str) -> Result<String, CccError>;

    /// Address the session was opened on.
    fn resource(&self) -> &str;
}

impl<T: Instrument + ?Sized> Instrument for Box<T> {
    fn query(&mut self, command: &str) -> Result<String, CccError> {
        (**self).query(command)
    }

    fn resource(&self) -> &str {
        (**self).resource()
    }
}

fn instrument_error(code: &str, message: impl Into<String>, resource: &str) -> CccError {
    CccError::Instrument(ErrorInfo::new(code, message).with_context("resource", resource))
}

/// Splits `host:port` or `TCPIP[n]::host::port::SOCKET` into its parts.
pub fn parse_socket_address(address: &str) -> Result<(String, u16), CccError> {
    let address = address.trim();
    let (host, port) = if address.contains("::") {
        let parts: Vec<&str> = address.split("::").collect();
        let is_socket = parts.len() == 4
            && parts[0].to_ascii_uppercase().starts_with("TCPIP")
            && parts[3].eq_ignore_ascii_case("SOCKET");
        if !is_socket {
            return Err(CccError::Config(
                ErrorInfo::new("ccc_temp.address", "unsupported resource string")
                    .with_context("address", address)
                    .with_hint("use host:port or TCPIP0::host::port::SOCKET"),
            ));
        }
        (parts[1], parts[2])
    } else {
        address.rsplit_once(':').ok_or_else(|| {
            CccError::Config(
                ErrorInfo::new("ccc_temp.address", "address has no port")
                    .with_context("address", address),
            )
        })?
    };
    if host.is_empty() {
        return Err(CccError::Config(
            ErrorInfo::new("ccc_temp.address", "address has no host").with_context("address", address),
        ));
    }
    let port = port.parse::<u16>().map_err(|err| {
        CccError::Config(
            ErrorInfo::new("ccc_temp.address", err.to_string())
                .with_context("address", address)
                .with_context("port", port),
        )
    })?;
    Ok((host.to_string(), port))
}

/// Line-oriented socket session, as served by LAN/GPIB gateways.
#[derive(Debug)]
pub struct TcpInstrument {
    resource: String,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpInstrument {
    /// Connects to `host:port` or a `TCPIP::...::SOCKET` resource.
    pub fn connect(address: &str, timeout: Duration) -> Result<Self, CccError> {
        let (host, port) = parse_socket_address(address)?;
        let stream = TcpStream::connect((host.as_str(), port))
            .map_err(|err| instrument_error("ccc_temp.connect", err.to_string(), address))?;
        stream
            .set_read_timeout(Some(timeout))
            .and_then(|_| stream.set_write_timeout(Some(timeout)))
            .map_err(|err| instrument_error("ccc_temp.connect", err.to_string(), address))?;
        let writer = stream
            .try_clone()
            .map_err(|err| instrument_error("ccc_temp.connect", err.to_string(), address))?;
        debug!("connected to {host}:{port}");
        Ok(Self {
            resource: address.to_string(),
            reader: BufReader::new(stream),
            writer,
        })
    }
}

impl Instrument for TcpInstrument {
    fn query(&mut self, command: &str) -> Result<String, CccError> {
        debug!("{} <- {command}", self.resource);
        self.writer
            .write_all(format!("{command}\n").as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|err| instrument_error("ccc_temp.write", err.to_string(), &self.resource))?;
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|err| instrument_error("ccc_temp.read", err.to_string(), &self.resource))?;
        if read == 0 {
            return Err(instrument_error(
                "ccc_temp.read",
                "connection closed by instrument",
                &self.resource,
            ));
        }
        let response = line.trim().to_string();
        debug!("{} -> {response}", self.resource);
        Ok(response)
    }

    fn resource(&self) -> &str {
        &self.resource
    }
}

/// Instrument double that replays canned responses in order and records
/// every command it receives.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInstrument {
    resource: String,
    responses: VecDeque<String>,
    commands: Vec<String>,
}

impl ScriptedInstrument {
    /// Replays `responses` in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource: "scripted".to_string(),
            responses: responses.into_iter().map(Into::into).collect(),
            commands: Vec::new(),
        }
    }

    /// Commands received so far, oldest first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl Instrument for ScriptedInstrument {
    fn query(&mut self, command: &str) -> Result<String, CccError> {
        self.commands.push(command.to_string());
        let response = self.responses.pop_front().ok_or_else(|| {
            instrument_error("ccc_temp.read", "no scripted response left", &self.resource)
                .with_context("command", command)
        })?;
        Ok(response.trim().to_string())
    }

    fn resource(&self) -> &str {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn parses_plain_and_visa_socket_addresses() {
        assert_eq!(
            parse_socket_address("192.168.1.20:1234").unwrap(),
            ("192.168.1.20".to_string(), 1234)
        );
        assert_eq!(
            parse_socket_address("TCPIP0::lakeshore.lab::7777::SOCKET").unwrap(),
            ("lakeshore.lab".to_string(), 7777)
        );
    }

    #[test]
    fn rejects_gpib_resource_strings() {
        let err = parse_socket_address("GPIB0::12::INSTR").unwrap_err();
        assert_eq!(err.info().code, "ccc_temp.address");
        assert!(parse_socket_address("host:notaport").is_err());
        assert!(parse_socket_address("hostonly").is_err());
    }

    #[test]
    fn scripted_instrument_records_commands() {
        let mut instr = ScriptedInstrument::new(["4.2\r\n"]);
        assert_eq!(instr.query("KRDG? A").unwrap(), "4.2");
        assert_eq!(instr.commands(), ["KRDG? A"]);
        let err = instr.query("KRDG? B").unwrap_err();
        assert_eq!(err.info().code, "ccc_temp.read");
    }

    #[test]
    fn tcp_instrument_round_trips_a_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut buf = [0u8; 64];
            let n = socket.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"KRDG? C1\n");
            socket.write_all(b"+077.350\r\n").unwrap();
        });
        let mut instr =
            TcpInstrument::connect(&format!("127.0.0.1:{port}"), Duration::from_secs(5)).unwrap();
        assert_eq!(instr.query("KRDG? C1").unwrap(), "+077.350");
        server.join().unwrap();
    }
}
