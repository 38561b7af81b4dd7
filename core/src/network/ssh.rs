use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use async_ssh2_tokio::{AuthMethod, Client, ServerCheckMethod};
use async_trait::async_trait;
use tracing::{debug, warn};

use ioskit_common::config::Credentials;
use ioskit_common::session::{Command, CommandOutput, RemoteSession, SessionConnector};
use ioskit_common::{Error, Result};

pub const SSH_PORT: u16 = 22;

/// Opens password-authenticated SSH sessions.
#[derive(Debug, Clone)]
pub struct SshConnector {
    port: u16,
}

impl Default for SshConnector {
    fn default() -> Self {
        Self { port: SSH_PORT }
    }
}

impl SshConnector {
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

async fn connect(
    target: SocketAddr,
    credentials: &Credentials,
) -> std::result::Result<Client, async_ssh2_tokio::Error> {
    Client::connect(
        target,
        &credentials.username,
        AuthMethod::with_password(&credentials.password),
        ServerCheckMethod::NoCheck,
    )
    .await
}

async fn disconnect(client: Client, address: Ipv4Addr) {
    log_disconnect(client.disconnect().await, address);
}

/// Teardown failures are logged; the work on the connection is already done.
pub(crate) fn log_disconnect<E: fmt::Display>(
    result: std::result::Result<(), E>,
    peer: impl fmt::Display,
) {
    if let Err(e) = result {
        warn!("disconnect from {peer} failed: {e}");
    }
}

#[async_trait]
impl SessionConnector for SshConnector {
    async fn open(
        &self,
        address: Ipv4Addr,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>> {
        let target = SocketAddr::V4(SocketAddrV4::new(address, self.port));
        let client = connect(target, credentials)
            .await
            .map_err(|e| Error::ConnectionError {
                address,
                reason: e.to_string(),
            })?;

        debug!("SSH session established with {target}");
        Ok(Box::new(SshSession {
            target,
            address,
            credentials: credentials.clone(),
            ready: Some(client),
            closed: false,
        }))
    }
}

/// Logical session to one device.
///
/// IOS accepts a single exec request per SSH connection, so each command
/// gets a connection of its own. The one authenticated by
/// [`SshConnector::open`] serves the first command.
pub struct SshSession {
    target: SocketAddr,
    address: Ipv4Addr,
    credentials: Credentials,
    ready: Option<Client>,
    closed: bool,
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn run(&mut self, command: Command) -> Result<CommandOutput> {
        let address = self.address;
        let failed = |reason: String| Error::CommandError {
            address,
            command: command.to_string(),
            reason,
        };

        if self.closed {
            return Err(failed("session already closed".into()));
        }

        let client = match self.ready.take() {
            Some(client) => client,
            None => connect(self.target, &self.credentials)
                .await
                .map_err(|e| failed(format!("reconnect failed: {e}")))?,
        };

        let executed = client.execute(command.as_str()).await;
        disconnect(client, address).await;
        let result = executed.map_err(|e| failed(e.to_string()))?;

        if result.exit_status != 0 && result.stdout.trim().is_empty() {
            return Err(failed(format!("exit status {}", result.exit_status)));
        }

        Ok(CommandOutput::Raw(result.stdout))
    }

    async fn close(&mut self) {
        self.closed = true;
        if let Some(client) = self.ready.take() {
            disconnect(client, self.address).await;
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn failed_disconnect_is_logged() {
        let server: SocketAddr = "192.0.2.10:22".parse().unwrap();
        let output = logged(|| log_disconnect(Err("connection reset"), server));
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("disconnect from 192.0.2.10:22 failed: connection reset"));
    }

    #[test]
    fn clean_disconnect_is_silent() {
        let output = logged(|| log_disconnect(Ok::<(), String>(()), Ipv4Addr::LOCALHOST));
        assert!(output.is_empty(), "{output}");
    }

    #[tokio::test]
    async fn closed_port_is_a_connection_error() {
        let connector = SshConnector::with_port(1);
        let creds = Credentials::new("admin", "secret");
        let err = connector
            .open(Ipv4Addr::LOCALHOST, &creds)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::ConnectionError { address, .. } if address == Ipv4Addr::LOCALHOST));
    }

    fn detached_session(port: u16) -> SshSession {
        SshSession {
            target: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)),
            address: Ipv4Addr::LOCALHOST,
            credentials: Credentials::new("admin", "secret"),
            ready: None,
            closed: false,
        }
    }

    #[tokio::test]
    async fn each_command_dials_its_own_connection() {
        let mut session = detached_session(1);
        let err = session.run(Command::ShowVersion).await.unwrap_err();
        match err {
            Error::CommandError { command, reason, .. } => {
                assert_eq!(command, "show version");
                assert!(reason.starts_with("reconnect failed"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn closed_session_refuses_commands() {
        let mut session = detached_session(1);
        session.close().await;
        session.close().await;
        let err = session.run(Command::ShowIpInterfaceBrief).await.unwrap_err();
        assert!(matches!(err, Error::CommandError { reason, .. } if reason == "session already closed"));
    }

    #[tokio::test]
    #[ignore = "needs a reachable IOS device; set IOSKIT_TEST_DEVICE"]
    async fn live_show_version() {
        let address: Ipv4Addr = std::env::var("IOSKIT_TEST_DEVICE").unwrap().parse().unwrap();
        let creds = Credentials::new(
            std::env::var("IOSKIT_USERNAME").unwrap(),
            std::env::var("IOSKIT_PASSWORD").unwrap(),
        );
        let mut session = SshConnector::default().open(address, &creds).await.unwrap();
        let output = session.run(Command::ShowVersion).await.unwrap();
        let brief = session.run(Command::ShowIpInterfaceBrief).await.unwrap();
        session.close().await;
        session.close().await;
        assert!(matches!(output, CommandOutput::Raw(text) if text.contains("Cisco IOS")));
        assert!(matches!(brief, CommandOutput::Raw(text) if text.contains("IP-Address")));
    }
}
