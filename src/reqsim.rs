use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    config::ServiceConfig,
    errors::ServiceError,
    http_api::{start_http_server, AppState},
    store::RecordStore,
};

/// The service harness: owns the store connection and the HTTP server
/// lifecycle.
pub struct ReqSim {
    config: ServiceConfig,
    store: Arc<RecordStore>,
    shutdown: broadcast::Sender<()>,
}

impl ReqSim {
    /// Validate the config and open the store.
    ///
    /// A store failure here is fatal; the service never starts serving
    /// without a working connection and schema.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;

        let store = RecordStore::open(config.store.path.as_deref())?;

        Ok(Self {
            config,
            store: Arc::new(store),
            shutdown: broadcast::channel(1).0,
        })
    }

    /// Sender half of the shutdown channel; sending on it stops the server.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown.clone()
    }

    /// Serve until a shutdown signal arrives, then release the store.
    pub async fn run(self) -> Result<(), ServiceError> {
        let state = Arc::new(AppState {
            store: Arc::clone(&self.store),
            fib_n: self.config.workload.fib_n,
            upstream_delay: self.config.upstream.delay,
        });

        let shutdown_rx = self.shutdown.subscribe();

        let served = start_http_server(
            self.config.http.bind_addr.clone(),
            self.config.http.bind_port,
            state,
            shutdown_rx,
        )
        .await;

        // The server has stopped, successfully or not, and its handlers are
        // gone, so the harness should hold the last reference to the store.
        info!("Releasing store connection");
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close()?,
            Err(_) => warn!("Store still shared at shutdown; closing on drop"),
        }

        served?;

        info!("Shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpConfig, StoreConfig, WorkloadConfig};

    #[test]
    fn test_new_with_defaults() {
        let sim = ReqSim::new(ServiceConfig::default());
        assert!(sim.is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ServiceConfig {
            workload: WorkloadConfig { fib_n: 200 },
            ..Default::default()
        };
        assert!(ReqSim::new(config).is_err());
    }

    #[test]
    fn test_new_fails_on_unusable_store_path() {
        let config = ServiceConfig {
            store: StoreConfig {
                path: Some("/nonexistent-dir/requests.db".into()),
            },
            ..Default::default()
        };
        assert!(ReqSim::new(config).is_err());
    }

    #[tokio::test]
    async fn test_run_fails_cleanly_when_bind_fails() {
        // Occupy a port so the server cannot bind to it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ServiceConfig {
            http: HttpConfig {
                bind_addr: "127.0.0.1".to_string(),
                bind_port: port,
            },
            ..Default::default()
        };

        let sim = ReqSim::new(config).unwrap();
        let err = sim.run().await.unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_until_shutdown() {
        let config = ServiceConfig {
            http: HttpConfig {
                bind_addr: "127.0.0.1".to_string(),
                bind_port: 18086,
            },
            ..Default::default()
        };

        let sim = ReqSim::new(config).unwrap();
        let shutdown = sim.shutdown_handle();

        let server = tokio::spawn(sim.run());
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        shutdown.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
