//! Builder for opening NETCONF sessions over SSH.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use secrecy::SecretString;

use super::config::SessionConfig;
use super::netconf::NetconfSession;
use crate::error::{Error, Result};
use crate::transport::SshTransport;
use crate::transport::config::{AuthMethod, HostKeyVerification, NETCONF_PORT, SshConfig};

/// Slack added on top of the reply deadline before SSH drops an idle session.
const IDLE_MARGIN: Duration = Duration::from_secs(5);

/// Builder for connecting a [`NetconfSession`] to a Junos device.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use junos_netconf::SessionBuilder;
///
/// # async fn example() -> Result<(), junos_netconf::Error> {
/// let session = SessionBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .response_timeout(Duration::from_secs(60))
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    session: SessionConfig,
}

impl SessionBuilder {
    /// Create a new builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: NETCONF_PORT,
            username: None,
            auth: AuthMethod::None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            session: SessionConfig::default(),
        }
    }

    /// Set the SSH port (default: 830).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the SSH connect timeout (default: 30 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set the deadline for each reply (default: 200 s).
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.session.response_timeout = timeout;
        self
    }

    /// Set the backoff between reply probes (default: 300 ms).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.session.poll_interval = interval;
        self
    }

    /// Replace the client hello greeting.
    pub fn hello(mut self, hello: impl Into<String>) -> Self {
        self.session.hello = hello.into();
        self
    }

    /// Replace all session settings at once.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    pub(crate) fn into_configs(self) -> Result<(SshConfig, SessionConfig)> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::invalid_argument("Username is required"))?;
        if self.host.trim().is_empty() {
            return Err(Error::invalid_argument("Host is required"));
        }

        let ssh = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            // A reply may stay silent for the whole response timeout, plus
            // one poll interval before the collector notices.
            inactivity_timeout: Some(
                self.timeout
                    .max(self.session.response_timeout + self.session.poll_interval)
                    + IDLE_MARGIN,
            ),
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };
        Ok((ssh, self.session))
    }

    /// Connect over SSH, open the `netconf` subsystem and exchange hellos.
    pub async fn connect(self) -> Result<NetconfSession<SshTransport>> {
        let (ssh, session) = self.into_configs()?;
        debug!("connecting to {}", ssh);
        let transport = SshTransport::connect(ssh).await?;
        NetconfSession::new(transport, session).await
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_defaults() {
        let (ssh, session) = SessionBuilder::new("r1")
            .username("admin")
            .into_configs()
            .unwrap();
        assert_eq!(ssh.port, 830);
        assert_eq!(ssh.timeout, Duration::from_secs(30));
        assert!(matches!(ssh.auth, AuthMethod::None));
        assert_eq!(session, SessionConfig::default());
        assert_eq!(ssh.inactivity_timeout, Some(Duration::from_millis(205_300)));
    }

    #[test]
    fn test_settings_carried() {
        let (ssh, session) = SessionBuilder::new("r1")
            .port(2830)
            .username("admin")
            .private_key_with_passphrase("/home/admin/.ssh/id_ed25519", "pw")
            .host_key_verification(HostKeyVerification::Strict)
            .known_hosts_path("/tmp/known_hosts")
            .response_timeout(Duration::from_secs(10))
            .poll_interval(Duration::from_millis(20))
            .into_configs()
            .unwrap();

        assert_eq!(ssh.socket_addr(), "r1:2830");
        assert_eq!(ssh.host_key_verification, HostKeyVerification::Strict);
        assert_eq!(ssh.known_hosts_path, Some(PathBuf::from("/tmp/known_hosts")));
        match ssh.auth {
            AuthMethod::PrivateKey { path, passphrase } => {
                assert_eq!(path, PathBuf::from("/home/admin/.ssh/id_ed25519"));
                assert_eq!(passphrase.unwrap().expose_secret(), "pw");
            }
            other => panic!("unexpected auth: {:?}", other),
        }
        assert_eq!(session.response_timeout, Duration::from_secs(10));
        assert_eq!(session.poll_interval, Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_missing_username_fails_before_connecting() {
        let err = SessionBuilder::new("192.0.2.1")
            .password("secret")
            .connect()
            .await
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());

        let err = SessionBuilder::new("  ")
            .username("admin")
            .connect()
            .await
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }
}
