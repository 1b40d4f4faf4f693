//! Ephemeral one-shot file transfers keyed by short numeric codes.
//!
//! A code doubles as a TCP port: `offer_file` binds a listener on a free code,
//! reserves it in the registry, and spawns a worker that serves exactly one
//! connection before tearing everything down.

mod code;
mod registry;
mod worker;

pub use registry::TransferRegistry;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Error, Debug)]
pub enum ShareError {
    /// Every candidate drawn was either bound elsewhere or already reserved.
    #[error("no free transfer code after {attempts} attempts")]
    CodesExhausted { attempts: usize },
}

/// Settings for the allocation loop and worker lifetime.
#[derive(Clone, Debug)]
pub struct ShareConfig {
    /// Inclusive code range; codes are used directly as port numbers.
    pub code_min: u16,
    pub code_max: u16,
    /// Bound on allocation retries before giving up.
    pub max_attempts: usize,
    /// How long a worker waits for a peer. `None` waits indefinitely.
    pub accept_timeout: Option<Duration>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            code_min: 1000,
            code_max: 9999,
            max_attempts: 256,
            accept_timeout: None,
        }
    }
}

/// Hands out transfer codes and owns the registry behind them.
pub struct FileSharer {
    registry: Arc<TransferRegistry>,
    config: ShareConfig,
}

impl FileSharer {
    pub fn new(config: ShareConfig) -> Self {
        Self {
            registry: Arc::new(TransferRegistry::new()),
            config,
        }
    }

    /// Allocate a code for `path` and launch the worker that will serve it.
    ///
    /// The returned code is live: the socket is bound and the registry entry
    /// exists before this returns. The worker owns both from here on, so
    /// errors after handoff never reach the caller.
    pub async fn offer_file(&self, path: PathBuf) -> Result<u16, ShareError> {
        for _ in 0..self.config.max_attempts {
            let code = code::generate_code(self.config.code_min, self.config.code_max);

            // Bind first: a failed bind is cheaper to retry than rolling back
            // a registry insert.
            let listener = match TcpListener::bind(("0.0.0.0", code)).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::debug!("bind on port {} failed: {}", code, e);
                    continue;
                }
            };

            // Narrow race: a concurrent allocator can reserve this code between
            // our bind and this insert. Losing drops the listener, freeing the
            // OS port for whoever won.
            if !self.registry.try_reserve(code, &path) {
                tracing::debug!("code {} reserved concurrently, retrying", code);
                continue;
            }

            tokio::spawn(worker::serve_once(
                listener,
                code,
                path,
                Arc::clone(&self.registry),
                self.config.accept_timeout,
            ));
            return Ok(code);
        }

        Err(ShareError::CodesExhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// Registry read for the direct-download path. Does not consume the code.
    pub fn lookup_path(&self, code: u16) -> Option<PathBuf> {
        self.registry.lookup(code)
    }

    /// Number of codes currently live.
    pub fn active_transfers(&self) -> usize {
        self.registry.active_count()
    }
}
