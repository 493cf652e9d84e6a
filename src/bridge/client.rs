use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::bridge::command::LightCommand;
use crate::bridge::object::ObjectKind;
use crate::bridge::object::RawObject;
use crate::bridge::object::Registry;
use crate::config::BridgeConfig;

/// How long a single bridge request may take before it is abandoned
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while talking to the bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The bridge answered with a non-success status. The response body is
    /// kept verbatim for diagnostics.
    #[error("Bridge returned {status} for {context}: {body}")]
    Communication {
        context: String,
        status: StatusCode,
        body: String,
    },

    /// The request never completed (connection failure or timeout)
    #[error("Request for {context} failed: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response that did not parse as the expected object mapping
    #[error("Malformed bridge response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Operations the presence controller needs from the lighting bridge.
///
/// This trait allows the controller to be driven by a mock in tests.
#[async_trait]
pub trait LightingBridge: Send + Sync {
    /// Retrieve all controllable objects of the configured kind
    async fn fetch_objects(&self) -> Result<Registry, BridgeError>;

    /// Apply one command to every target, sequentially and in the given
    /// order. An empty target list is a no-op. The first failing target
    /// aborts the batch; earlier targets keep the update they already got.
    async fn apply_command(
        &self,
        command: &LightCommand,
        targets: &[String],
    ) -> Result<(), BridgeError>;

    /// Apply a per-target command to every target, with the same sequential
    /// fail-fast semantics as [`apply_command`](Self::apply_command).
    /// Targets without an entry in `commands` are skipped.
    async fn apply_revert(
        &self,
        targets: &[String],
        commands: &HashMap<String, LightCommand>,
    ) -> Result<(), BridgeError>;
}

/// HTTP client for the bridge's REST API.
///
/// Owns its `reqwest` handle; nothing else in the crate performs network
/// I/O. All paths hang off `http://{address}/api/{username}/`.
pub struct BridgeClient {
    http: reqwest::Client,
    base: String,
    kind: ObjectKind,
}

impl BridgeClient {
    pub fn new(config: &BridgeConfig, kind: ObjectKind) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base: format!("http://{}/api/{}/", config.address, config.username),
            kind,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn put_update(&self, id: &str, command: &LightCommand) -> Result<(), BridgeError> {
        let context = format!("{} {}", self.kind, id);
        let path = format!("{}/{}/{}", self.kind.collection(), id, self.kind.update_path());

        tracing::debug!("Applying lighting update for {}", context);
        let response = self
            .http
            .put(self.url(&path))
            .json(command)
            .send()
            .await
            .map_err(|source| BridgeError::Transport {
                context: context.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Communication {
                context,
                status,
                body,
            });
        }

        tracing::info!("Applied lighting update for {}", context);
        Ok(())
    }
}

#[async_trait]
impl LightingBridge for BridgeClient {
    async fn fetch_objects(&self) -> Result<Registry, BridgeError> {
        let collection = self.kind.collection();

        tracing::debug!("Fetching {} from the bridge", collection);
        let response = self
            .http
            .get(self.url(collection))
            .send()
            .await
            .map_err(|source| BridgeError::Transport {
                context: collection.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| BridgeError::Transport {
                context: collection.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(BridgeError::Communication {
                context: collection.to_string(),
                status,
                body,
            });
        }

        let raw: HashMap<String, RawObject> = serde_json::from_str(&body)?;
        tracing::info!("Fetched {} {}", raw.len(), collection);

        Ok(raw
            .into_iter()
            .map(|(id, object)| (id, object.into_object(self.kind)))
            .collect())
    }

    async fn apply_command(
        &self,
        command: &LightCommand,
        targets: &[String],
    ) -> Result<(), BridgeError> {
        for id in targets {
            self.put_update(id, command).await?;
        }
        Ok(())
    }

    async fn apply_revert(
        &self,
        targets: &[String],
        commands: &HashMap<String, LightCommand>,
    ) -> Result<(), BridgeError> {
        for id in targets {
            if let Some(command) = commands.get(id) {
                self.put_update(id, command).await?;
            }
        }
        Ok(())
    }
}

/// Mock bridge for driving the controller in tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MockBridge {
    pub registry: Registry,
    pub fail_fetch: bool,
    pub fail_apply: bool,
    pub fetches: std::sync::atomic::AtomicUsize,
    pub applied: std::sync::Mutex<Vec<(LightCommand, Vec<String>)>>,
    pub reverted: std::sync::Mutex<Vec<HashMap<String, LightCommand>>>,
}

#[cfg(test)]
impl MockBridge {
    fn unavailable(context: &str) -> BridgeError {
        BridgeError::Communication {
            context: context.to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "bridge unavailable".to_string(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LightingBridge for MockBridge {
    async fn fetch_objects(&self) -> Result<Registry, BridgeError> {
        self.fetches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail_fetch {
            return Err(Self::unavailable("lights"));
        }
        Ok(self.registry.clone())
    }

    async fn apply_command(
        &self,
        command: &LightCommand,
        targets: &[String],
    ) -> Result<(), BridgeError> {
        self.applied
            .lock()
            .unwrap()
            .push((command.clone(), targets.to_vec()));
        if self.fail_apply {
            return Err(Self::unavailable("light 1"));
        }
        Ok(())
    }

    async fn apply_revert(
        &self,
        _targets: &[String],
        commands: &HashMap<String, LightCommand>,
    ) -> Result<(), BridgeError> {
        self.reverted.lock().unwrap().push(commands.clone());
        Ok(())
    }
}
