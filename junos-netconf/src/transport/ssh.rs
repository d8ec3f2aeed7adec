//! NETCONF-over-SSH transport using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use log::{debug, trace, warn};
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg};
use secrecy::ExposeSecret;

use super::Transport;
use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::{Result, TransportError};

/// Name of the SSH subsystem that carries NETCONF.
const NETCONF_SUBSYSTEM: &str = "netconf";

/// SSH transport bound to the `netconf` subsystem of one session channel.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Channel running the netconf subsystem.
    channel: Channel<Msg>,

    /// Configuration used for this connection.
    config: SshConfig,
}

impl SshTransport {
    /// Connect to the SSH server, authenticate and start the netconf subsystem.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client_config(&config));

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("connecting to {}", config.socket_addr());

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // Prefer the detailed host-key error over russh's generic UnknownKey
            let stored = host_key_error.lock().ok().and_then(|mut slot| slot.take());
            stored.unwrap_or(TransportError::Ssh(e))
        })?;

        Self::authenticate(&mut session, &config).await?;

        let channel = Self::open_subsystem(&session).await?;

        Ok(Self {
            session,
            channel,
            config,
        })
    }

    /// Open a session channel and request the netconf subsystem on it.
    async fn open_subsystem(session: &Handle<SshHandler>) -> Result<Channel<Msg>> {
        let channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_subsystem(true, NETCONF_SUBSYSTEM)
            .await
            .map_err(|_| TransportError::SubsystemRequestFailed(NETCONF_SUBSYSTEM.to_string()))?;

        debug!("netconf subsystem started");
        Ok(channel)
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Configuration this transport was opened with.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }
}

impl Transport for SshTransport {
    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.channel
            .data(data)
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            // A single poll of the channel queue; Pending means nothing buffered.
            match self.channel.wait().now_or_never() {
                None => return Ok(None),
                Some(Some(ChannelMsg::Data { data })) => return Ok(Some(data.to_vec())),
                Some(Some(ChannelMsg::ExtendedData { data, ext })) => {
                    trace!("ignoring {} bytes of extended data ({})", data.len(), ext);
                }
                Some(Some(ChannelMsg::Eof | ChannelMsg::Close)) | Some(None) => {
                    return Err(TransportError::Disconnected.into());
                }
                Some(Some(other)) => trace!("ignoring channel message {:?}", other),
            }
        }
    }

    async fn read(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { data }) => return Ok(Some(data.to_vec())),
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    trace!("ignoring {} bytes of extended data ({})", data.len(), ext);
                }
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => return Ok(None),
                Some(other) => trace!("ignoring channel message {:?}", other),
            }
        }
    }

    async fn close(self) -> Result<()> {
        // The peer may already have torn the channel down after close-session
        if let Err(e) = self.channel.eof().await {
            debug!("channel eof failed: {}", e);
        }
        if let Err(e) = self.channel.close().await {
            debug!("channel close failed: {}", e);
        }
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// russh client settings for a connection.
///
/// The connect timeout is applied around `client::connect` only; it never
/// becomes the session's idle limit.
pub(crate) fn client_config(config: &SshConfig) -> client::Config {
    client::Config {
        inactivity_timeout: config.inactivity_timeout,
        ..Default::default()
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::SessionBuilder;

    #[test]
    fn test_inactivity_outlasts_response_timeout() {
        let (ssh, session) = SessionBuilder::new("r1")
            .username("admin")
            .into_configs()
            .unwrap();
        let inactivity = client_config(&ssh).inactivity_timeout.unwrap();
        assert!(inactivity > session.response_timeout);
        assert!(inactivity > ssh.timeout);

        let (ssh, session) = SessionBuilder::new("r1")
            .username("admin")
            .timeout(Duration::from_secs(5))
            .response_timeout(Duration::from_secs(900))
            .into_configs()
            .unwrap();
        let inactivity = client_config(&ssh).inactivity_timeout.unwrap();
        assert!(inactivity >= session.response_timeout + session.poll_interval);
    }

    #[test]
    fn test_connect_timeout_is_not_idle_limit() {
        let mut config = SshConfig::new("r1", "admin");
        config.timeout = Duration::from_secs(30);
        assert_eq!(client_config(&config).inactivity_timeout, None);
    }
}
