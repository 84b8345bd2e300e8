//! Composition root: connects the database, wires the external
//! collaborators, primes the partition window, spawns the background
//! ticks, and binds the HTTP listener.

use crate::config::Config;
use crate::routes::build_router;
use crate::services::artifact_store::{ArtifactStore, LocalArtifactStore};
use crate::services::push_provider::{HttpPushProvider, PushProvider};
use crate::services::scheduler::{spawn_alert_tick, spawn_partition_maintenance, spawn_reconciliation};
use crate::services::webhook_notifier::{HttpWebhookNotifier, NullWebhookNotifier, WebhookNotifier};
use crate::state::AppState;
use chrono::Utc;
use mdm_db::DbPool;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct OrchestratorKernel {
    port: u16,
    state: AppState,
}

impl OrchestratorKernel {
    #[instrument(skip(config))]
    pub async fn ignite(config: Config) -> Self {
        let config = Arc::new(config);

        let db = DbPool::connect(&config.database_url, config.db_max_connections)
            .await
            .expect("database connection failed, aborting startup");
        db.run_migrations().await.expect("database migration failed, aborting startup");

        let http_client = reqwest::Client::new();

        let push_provider: Arc<dyn PushProvider> = match &config.push_provider_credentials {
            Some(credentials) => Arc::new(HttpPushProvider::new(
                http_client.clone(),
                "https://push.example-provider.com/v1/send".to_string(),
                credentials.clone(),
            )),
            None => {
                info!("PUSH_PROVIDER_CREDENTIALS unset, dispatch pushes will report unreachable");
                Arc::new(crate::services::push_provider::FakePushProvider::new(
                    crate::services::push_provider::PushOutcome::Unreachable,
                ))
            }
        };

        let webhook_notifier: Arc<dyn WebhookNotifier> = match &config.webhook_url {
            Some(url) => Arc::new(HttpWebhookNotifier::new(http_client.clone(), url.clone())),
            None => Arc::new(NullWebhookNotifier),
        };

        let artifact_store: Arc<dyn ArtifactStore> =
            Arc::new(LocalArtifactStore::new(config.artifact_store_root.clone()));

        let port = config.port;
        let state = AppState::new(db, config, push_provider, webhook_notifier, artifact_store);

        mdm_telemetry::metrics::register_all();

        state
            .partition_repo
            .ensure_forward_window(Utc::now().date_naive())
            .await
            .expect("failed to prime heartbeat partition window");

        Self { port, state }
    }

    pub async fn run(self) {
        spawn_alert_tick(self.state.db.clone(), self.state.alert_engine.clone(), self.state.config.alert_tick_interval());
        spawn_reconciliation(
            self.state.db.clone(),
            self.state.reconciliation_job.clone(),
            self.state.config.reconciliation_interval(),
        );
        spawn_partition_maintenance(
            self.state.db.clone(),
            self.state.partition_maintenance_job.clone(),
            self.state.config.nightly_maintenance_interval(),
        );

        let router = build_router(self.state);

        let bind_address = SocketAddr::new("0.0.0.0".parse::<IpAddr>().expect("static address"), self.port);
        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("failed to bind HTTP listener");

        info!(%bind_address, "orchestrator listening");

        let make_service = router.into_make_service_with_connect_info::<SocketAddr>();
        if let Err(error) = axum::serve(listener, make_service).await {
            error!(%error, "HTTP server terminated unexpectedly");
            std::process::exit(1);
        }
    }
}
