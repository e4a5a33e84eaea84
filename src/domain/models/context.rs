use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::Interrupted;

/// Environment variable naming the namespace the process is scoped to.
pub const SYSTEM_NAMESPACE_ENV: &str = "SYSTEM_NAMESPACE";

/// Namespace used when [`SYSTEM_NAMESPACE_ENV`] is not set.
pub const DEFAULT_SYSTEM_NAMESPACE: &str = "messaging-system";

/// Ambient context handed to backend constructors and admin operations.
///
/// Cloning shares the cancellation token, so cancelling the original also
/// cancels every clone.
#[derive(Debug, Clone)]
pub struct AdminContext {
    namespace: String,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl AdminContext {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context scoped to `SYSTEM_NAMESPACE`, or the default namespace.
    pub fn from_env() -> Self {
        let namespace = std::env::var(SYSTEM_NAMESPACE_ENV)
            .ok()
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_NAMESPACE.to_string());
        Self::new(namespace)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Run `fut` until it completes, the context is cancelled, or the
    /// deadline passes, whichever happens first.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Interrupted::Cancelled),
            () = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
