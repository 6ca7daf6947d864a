use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::error::{Error, Result};
use crate::routes::router;
use crate::store::ReadingStore;

/// HTTP server receiving scanner reports and serving the status array.
pub struct CollectorServer {
    listen_addr: SocketAddr,
    store: Arc<ReadingStore>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl CollectorServer {
    /// Creates a server that will listen on `listen_addr` and keep readings in `store`.
    #[must_use]
    pub fn new(listen_addr: SocketAddr, store: Arc<ReadingStore>) -> Self {
        Self {
            listen_addr,
            store,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// The store the server records readings into.
    #[must_use]
    pub fn store(&self) -> Arc<ReadingStore> {
        self.store.clone()
    }

    /// Binds the listener and starts serving in the background.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// port 0 was requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] on a second call and [`Error::Bind`]
    /// if the address cannot be bound.
    pub async fn start(&self) -> Result<SocketAddr> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(Error::Bind)?;
        let local_addr = listener.local_addr().map_err(Error::Bind)?;

        let app = router(self.store.clone());
        let shutdown_token = self.shutdown_token.clone();

        self.task_tracker.spawn(async move {
            tokio::select! {
                e = axum::serve(listener, app.into_make_service()).into_future() => {
                    info!("collector http server exited {:?}", e);
                }
                () = shutdown_token.cancelled() => {}
            };
        });

        self.task_tracker.close();

        info!("collector listening on {}", local_addr);

        Ok(local_addr)
    }

    /// Stops serving and waits for the server task to finish.
    pub async fn shutdown(&self) {
        info!("collector shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("collector shutdown");
    }
}
