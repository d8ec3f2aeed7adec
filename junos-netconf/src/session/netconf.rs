//! NETCONF session over a single transport.

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, trace, warn};

use super::candidate::CandidateLock;
use super::config::SessionConfig;
use super::stream::RpcStream;
use crate::channel::ResponseCollector;
use crate::error::{Error, InputError, ProtocolError, Result};
use crate::rpc::{ConfigFormat, Datastore, LoadType, Rpc, RpcReply, TERMINATOR, operations};
use crate::transport::{SshTransport, Transport};
use crate::xml::XmlDocument;

/// Filter selecting the whole configuration.
const WHOLE_CONFIGURATION: &str = "<configuration></configuration>";

/// A NETCONF session: one transport, one request in flight at a time.
///
/// The session is created by performing the hello exchange and is destroyed
/// by [`close`](Self::close), which consumes it. Every request takes
/// `&mut self`, so the request/reply ordering the framing depends on cannot
/// be violated from safe code. Callers needing concurrent access must own one
/// session per task or put the session behind their own mutex.
///
/// Two families of operations report failure differently:
/// - lock, unlock and validate return `Ok(false)` when the device rejects them
/// - load and commit operations return [`ProtocolError::Load`] or
///   [`ProtocolError::Commit`]
pub struct NetconfSession<T: Transport = SshTransport> {
    /// Underlying byte stream.
    transport: T,

    /// Reply framing and timeout policy.
    collector: ResponseCollector,

    config: SessionConfig,

    /// Server greeting received at handshake.
    server_capability: String,

    /// Reply of the most recently completed exchange.
    last_reply: RpcReply,

    /// Datastores this session last locked successfully.
    locked: HashSet<Datastore>,
}

impl<T: Transport> NetconfSession<T> {
    /// Perform the hello exchange on a ready transport.
    ///
    /// If no greeting comes back within the response timeout the transport is
    /// closed and the error returned; no half-open session is ever handed out.
    pub async fn new(mut transport: T, config: SessionConfig) -> Result<Self> {
        let collector = ResponseCollector::new(config.response_timeout, config.poll_interval);

        let capability = match Self::hello(&mut transport, &collector, &config.hello).await {
            Ok(capability) => capability,
            Err(e) => {
                warn!("hello exchange failed: {}", e);
                if let Err(close_err) = transport.close().await {
                    debug!("closing transport after failed hello: {}", close_err);
                }
                return Err(e);
            }
        };

        let session = Self {
            transport,
            collector,
            config,
            last_reply: RpcReply::new(capability.clone()),
            server_capability: capability,
            locked: HashSet::new(),
        };
        info!(
            "NETCONF session established (session-id {})",
            session.session_id().unwrap_or("unknown")
        );
        Ok(session)
    }

    async fn hello(transport: &mut T, collector: &ResponseCollector, greeting: &str) -> Result<String> {
        let greeting = greeting.trim_end();
        if greeting.is_empty() {
            return Err(Error::invalid_argument("hello greeting can't be empty"));
        }
        let mut wire = greeting.to_string();
        if !wire.ends_with(TERMINATOR) {
            wire.push_str(TERMINATOR);
        }
        debug!("sending hello");
        trace!("hello: {}", wire);
        transport.write_all(wire.as_bytes()).await?;
        collector.collect(TERMINATOR, transport).await
    }

    /// The greeting the server sent at handshake, verbatim.
    pub fn server_capability(&self) -> &str {
        &self.server_capability
    }

    /// Session id from the server greeting.
    ///
    /// `None` unless the greeting holds exactly one `<session-id>` element.
    pub fn session_id(&self) -> Option<&str> {
        let (_, rest) = self.server_capability.split_once("<session-id>")?;
        if rest.contains("<session-id>") {
            return None;
        }
        let (id, tail) = rest.split_once("</session-id>")?;
        if tail.contains("</session-id>") {
            return None;
        }
        Some(id)
    }

    /// Reply of the most recent exchange (the greeting right after handshake).
    pub fn last_rpc_reply(&self) -> &RpcReply {
        &self.last_reply
    }

    /// Whether this session holds the lock on `target`, as last observed.
    pub fn is_locked(&self, target: Datastore) -> bool {
        self.locked.contains(&target)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // Raw RPC exchange
    // =========================================================================

    /// Write one envelope and collect its reply.
    pub async fn send_rpc(&mut self, rpc: &Rpc) -> Result<RpcReply> {
        debug!("sending rpc ({} bytes)", rpc.as_bytes().len());
        trace!("rpc: {}", rpc);
        self.transport.write_all(rpc.as_bytes()).await?;
        let raw = self
            .collector
            .collect(TERMINATOR, &mut self.transport)
            .await?;
        let reply = RpcReply::new(raw);
        self.last_reply = reply.clone();
        Ok(reply)
    }

    /// Send an RPC and parse the reply.
    ///
    /// `content` may be a bare operation name, an element, a full `<rpc>`
    /// envelope, an [`XmlDocument`] or an [`Rpc`].
    ///
    /// ```rust,no_run
    /// # async fn example(session: &mut junos_netconf::NetconfSession) -> Result<(), junos_netconf::Error> {
    /// let inventory = session.execute_rpc("get-chassis-inventory").await?;
    /// println!("{:?}", inventory.find_value(&["chassis", "serial-number"]));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_rpc<R>(&mut self, content: R) -> Result<XmlDocument>
    where
        R: TryInto<Rpc>,
        Error: From<R::Error>,
    {
        let rpc = content.try_into()?;
        self.send_rpc(&rpc).await?.to_xml()
    }

    /// Send an RPC and hand back a reader over the raw reply stream.
    ///
    /// No end-of-message detection or timeout is applied; the caller reads
    /// until it sees the `]]>]]>` marker. The session is borrowed until the
    /// stream is dropped. Stop reading early only if the session will be
    /// closed afterwards, since unread bytes would be taken as the next reply.
    pub async fn execute_rpc_streaming<R>(&mut self, content: R) -> Result<RpcStream<'_, T>>
    where
        R: TryInto<Rpc>,
        Error: From<R::Error>,
    {
        let rpc = content.try_into()?;
        debug!("sending streaming rpc ({} bytes)", rpc.as_bytes().len());
        trace!("rpc: {}", rpc);
        self.transport.write_all(rpc.as_bytes()).await?;
        Ok(RpcStream::new(&mut self.transport))
    }

    async fn send_checked(&mut self, rpc: Rpc) -> Result<bool> {
        self.send_rpc(&rpc).await?.succeeded()
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Lock the candidate configuration. `Ok(false)` if the device refused.
    pub async fn lock(&mut self) -> Result<bool> {
        self.lock_datastore(Datastore::Candidate).await
    }

    /// Unlock the candidate configuration. `Ok(false)` if the device refused.
    pub async fn unlock(&mut self) -> Result<bool> {
        self.unlock_datastore(Datastore::Candidate).await
    }

    pub async fn lock_datastore(&mut self, target: Datastore) -> Result<bool> {
        let locked = self.send_checked(operations::lock(target)).await?;
        debug!("lock {}: {}", target, locked);
        if locked {
            self.locked.insert(target);
        }
        Ok(locked)
    }

    pub async fn unlock_datastore(&mut self, target: Datastore) -> Result<bool> {
        let unlocked = self.send_checked(operations::unlock(target)).await?;
        debug!("unlock {}: {}", target, unlocked);
        if unlocked {
            self.locked.remove(&target);
        }
        Ok(unlocked)
    }

    /// Lock the candidate and return a guard for editing it.
    ///
    /// Fails with [`ProtocolError::LockFailed`] if the device refused the lock.
    pub async fn lock_candidate(&mut self) -> Result<CandidateLock<'_, T>> {
        CandidateLock::acquire(self).await
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load configuration into `target`.
    ///
    /// XML payloads without a `<configuration>` root get one. `load_type` is
    /// validated before anything is sent and is ignored for set-format
    /// payloads. Set-format payloads go through `load-configuration`, which
    /// only targets the candidate; any other target is rejected before I/O.
    pub async fn edit_config<L>(
        &mut self,
        target: Datastore,
        configuration: &str,
        load_type: L,
        format: ConfigFormat,
    ) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        let rpc = match format {
            ConfigFormat::Xml => {
                operations::edit_config_xml(target, configuration, load_type.try_into()?)
            }
            ConfigFormat::Text => {
                operations::edit_config_text(target, configuration, load_type.try_into()?)
            }
            ConfigFormat::Set if target == Datastore::Candidate => {
                operations::load_configuration_set(configuration)
            }
            ConfigFormat::Set => {
                return Err(Error::invalid_argument(format!(
                    "set-format configuration can only be loaded into the candidate, not {}",
                    target
                )));
            }
        };

        let reply = self.send_rpc(&rpc).await?;
        if !reply.succeeded()? {
            return Err(ProtocolError::Load {
                message: reply.failure_message("Load operation"),
                reply: reply.into_string(),
            }
            .into());
        }
        debug!("{:?} configuration loaded into {}", format, target);
        Ok(())
    }

    /// Load XML configuration into the candidate.
    pub async fn load_xml_configuration<L>(&mut self, configuration: &str, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        self.edit_config(Datastore::Candidate, configuration, load_type, ConfigFormat::Xml)
            .await
    }

    /// Load text/tree configuration into the candidate.
    pub async fn load_text_configuration<L>(&mut self, configuration: &str, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        self.edit_config(Datastore::Candidate, configuration, load_type, ConfigFormat::Text)
            .await
    }

    /// Load `set` statements (newline separated) into the candidate.
    pub async fn load_set_configuration(&mut self, configuration: &str) -> Result<()> {
        self.edit_config(
            Datastore::Candidate,
            configuration,
            LoadType::Merge,
            ConfigFormat::Set,
        )
        .await
    }

    pub async fn load_xml_file<L>(&mut self, path: impl AsRef<Path>, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        let load_type: LoadType = load_type.try_into()?;
        let configuration = read_config_file(path.as_ref()).await?;
        self.load_xml_configuration::<LoadType>(&configuration, load_type).await
    }

    pub async fn load_text_file<L>(&mut self, path: impl AsRef<Path>, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        let load_type: LoadType = load_type.try_into()?;
        let configuration = read_config_file(path.as_ref()).await?;
        self.load_text_configuration::<LoadType>(&configuration, load_type).await
    }

    pub async fn load_set_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let configuration = read_config_file(path.as_ref()).await?;
        self.load_set_configuration(&configuration).await
    }

    /// Lock, load a configuration file, commit and unlock.
    ///
    /// The format is picked from the file's first token (`<` is XML, `set`
    /// is set format, anything else is text). If the lock is refused nothing
    /// else is sent and [`ProtocolError::LockFailed`] is returned. If the load
    /// or commit fails, an unlock is still attempted before the failure is
    /// returned.
    pub async fn commit_file<L>(&mut self, path: impl AsRef<Path>, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        let configuration = read_config_file(path.as_ref()).await?;
        let configuration = configuration.trim();
        let format = ConfigFormat::detect(configuration);

        // Set-format loads have no default-operation
        let load_type: LoadType = if format.uses_load_type() {
            load_type.try_into()?
        } else {
            LoadType::Merge
        };

        let mut lock = self.lock_candidate().await?;

        let outcome = match lock.load::<LoadType>(configuration, format, load_type).await {
            Ok(()) => lock.commit().await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                if !lock.unlock().await? {
                    warn!("candidate unlock refused after commit");
                }
                Ok(())
            }
            Err(e) => {
                lock.unlock_best_effort().await;
                Err(e)
            }
        }
    }

    // =========================================================================
    // Commit / validate
    // =========================================================================

    /// Commit the candidate configuration.
    pub async fn commit(&mut self) -> Result<()> {
        self.send_commit(operations::commit()).await
    }

    /// Commit, asking the device to roll back unless confirmed within `timeout`.
    ///
    /// The rollback timer runs on the device; confirm with a plain
    /// [`commit`](Self::commit). Sub-second precision is dropped.
    pub async fn commit_confirmed(&mut self, timeout: Duration) -> Result<()> {
        if timeout.as_secs() == 0 {
            return Err(Error::invalid_argument(
                "commit confirmed timeout must be at least one second",
            ));
        }
        self.send_commit(operations::commit_confirmed(timeout)).await
    }

    async fn send_commit(&mut self, rpc: Rpc) -> Result<()> {
        let reply = self.send_rpc(&rpc).await?;
        if !reply.succeeded()? {
            return Err(ProtocolError::Commit {
                message: reply.failure_message("Commit operation"),
                reply: reply.into_string(),
            }
            .into());
        }
        debug!("commit succeeded");
        Ok(())
    }

    /// Validate the candidate configuration. `Ok(false)` if it is invalid.
    pub async fn validate(&mut self) -> Result<bool> {
        self.send_checked(operations::validate(Datastore::Candidate))
            .await
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// `get-config` with a subtree filter; the raw reply is returned.
    pub async fn get_config(&mut self, source: Datastore, filter: &str) -> Result<RpcReply> {
        self.send_rpc(&operations::get_config(source, filter)).await
    }

    /// Candidate configuration, or the part selected by `filter`.
    pub async fn get_candidate_config(&mut self, filter: Option<&str>) -> Result<XmlDocument> {
        self.get_config(Datastore::Candidate, filter.unwrap_or(WHOLE_CONFIGURATION))
            .await?
            .to_xml()
    }

    /// Running configuration, or the part selected by `filter`.
    pub async fn get_running_config(&mut self, filter: Option<&str>) -> Result<XmlDocument> {
        self.get_config(Datastore::Running, filter.unwrap_or(WHOLE_CONFIGURATION))
            .await?
            .to_xml()
    }

    // =========================================================================
    // Operational
    // =========================================================================

    /// Reboot the device; the raw reply is returned.
    pub async fn reboot(&mut self) -> Result<String> {
        Ok(self.send_rpc(&operations::reboot()).await?.into_string())
    }

    /// Run a CLI command and return its text output.
    ///
    /// If the reply has no `<output>` element the raw reply is returned.
    pub async fn run_cli_command(&mut self, command: &str) -> Result<String> {
        let command = non_empty(command, "command")?;
        let reply = self.send_rpc(&operations::command_text(command)).await?;
        let doc = reply.to_xml()?;
        match doc.find_value(&["output"]) {
            Some(output) => Ok(output.to_string()),
            None => Ok(reply.into_string()),
        }
    }

    /// Run a CLI command and read its output incrementally.
    pub async fn run_cli_command_streaming(&mut self, command: &str) -> Result<RpcStream<'_, T>> {
        let command = non_empty(command, "command")?;
        let rpc = operations::command_text(command);
        self.execute_rpc_streaming(rpc).await
    }

    /// Open a configuration database, e.g. `private`, for subsequent loads.
    pub async fn open_configuration(&mut self, mode: &str) -> Result<RpcReply> {
        let mode = non_empty(mode, "mode")?;
        self.send_rpc(&operations::open_configuration(mode)).await
    }

    /// Close a configuration database opened with
    /// [`open_configuration`](Self::open_configuration).
    pub async fn close_configuration(&mut self) -> Result<RpcReply> {
        self.send_rpc(&operations::close_configuration()).await
    }

    /// Send `close-session` and release the transport.
    ///
    /// The transport is released even if the close-session exchange fails;
    /// the exchange error takes precedence.
    pub async fn close(mut self) -> Result<()> {
        if !self.locked.is_empty() {
            debug!("closing session while holding locks on {:?}", self.locked);
        }
        let exchange = self.send_rpc(&operations::close_session()).await;
        let released = self.transport.close().await;
        exchange?;
        released?;
        info!("NETCONF session closed");
        Ok(())
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} can't be empty", what)));
    }
    Ok(value)
}

/// Read a configuration payload from disk.
async fn read_config_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        let path = path.to_path_buf();
        if e.kind() == io::ErrorKind::NotFound {
            Error::from(InputError::FileNotFound { path })
        } else {
            Error::from(InputError::FileRead { path, source: e })
        }
    })
}
