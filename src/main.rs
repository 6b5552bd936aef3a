use std::io::Error;
use std::sync::Arc;
use std::time::Duration;

use campaigns::{
    application::{
        dispatch::{DeliveryExecutor, RunRegistry},
        handlers::{
            campaign_dispatcher::{CampaignDispatcher, DispatchOptions},
            scheduled_dispatch::ScheduledDispatchWorker,
        },
        services::jwt::{JwtService, JwtServiceConfig},
        usecases::{
            cancel_campaign::CancelCampaignUseCase,
            create_campaign::{CreateCampaignConfig, CreateCampaignUseCase},
            dispatch_campaign::DispatchCampaignUseCase,
            get_campaign::GetCampaignUseCase,
            list_campaigns::ListCampaignsUseCase,
            register_session::RegisterSessionUseCase,
            schedule_campaign::ScheduleCampaignUseCase,
        },
    },
    config::Config,
    domain::repositories::{CampaignRepository, SessionRepository},
    infrastructure::{
        messaging::wppconnect::{WppConnectConfig, WppConnectGateway},
        repositories::{
            in_memory::{InMemoryCampaignRepository, InMemorySessionRepository},
            postgres::{PostgresCampaignRepository, PostgresSessionRepository},
        },
    },
    presentation::http::endpoints::root::{ApiState, endpoints},
};
use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use tokio::main;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::try_parse().map_err(Error::other)?;

    let (campaign_repo, session_repo) = repositories(&config).await.map_err(Error::other)?;
    let gateway = WppConnectGateway::new(&WppConnectConfig {
        base_url: config.gateway_url.clone(),
        timeout: config.gateway_timeout,
    })
    .map_err(Error::other)?;

    let registry = RunRegistry::new();
    let dispatcher = Arc::new(CampaignDispatcher::new(
        campaign_repo.clone(),
        session_repo.clone(),
        DeliveryExecutor::new(gateway),
        registry.clone(),
        DispatchOptions {
            persist_progress: config.persist_progress,
        },
    ));

    let shutdown = CancellationToken::new();
    let scheduler = ScheduledDispatchWorker::new(
        campaign_repo.clone(),
        dispatcher.clone(),
        config.scheduler_interval,
    )
    .spawn(shutdown.clone());

    let state = Arc::new(ApiState {
        create_campaign_usecase: Arc::new(CreateCampaignUseCase::new(
            campaign_repo.clone(),
            CreateCampaignConfig {
                default_delay_ms: config.default_delay_ms,
            },
        )),
        list_campaigns_usecase: Arc::new(ListCampaignsUseCase::new(campaign_repo.clone())),
        get_campaign_usecase: Arc::new(GetCampaignUseCase::new(campaign_repo.clone())),
        schedule_campaign_usecase: Arc::new(ScheduleCampaignUseCase::new(campaign_repo.clone())),
        dispatch_campaign_usecase: Arc::new(DispatchCampaignUseCase::new(
            campaign_repo.clone(),
            dispatcher.clone(),
        )),
        cancel_campaign_usecase: Arc::new(CancelCampaignUseCase::new(
            campaign_repo.clone(),
            dispatcher.clone(),
        )),
        register_session_usecase: Arc::new(RegisterSessionUseCase::new(session_repo)),
        jwt: JwtService::new(JwtServiceConfig {
            secret: config.jwt_secret.clone(),
        }),
    });

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);
    info!(%server_url, "starting server");

    let api_service = OpenApiService::new(endpoints(state), "Campaigns API", "0.1.0")
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    // Runs are cancelled as soon as the signal arrives so they reach their
    // pacing checkpoints while in-flight requests are still draining.
    let signal = {
        let shutdown = shutdown.clone();
        let registry = registry.clone();
        async move {
            let _ = tokio::signal::ctrl_c().await;
            info!(active_runs = registry.active_count(), "shutdown requested");
            shutdown.cancel();
            registry.shutdown();
        }
    };

    let result = Server::new(TcpListener::bind(format!("0.0.0.0:{}", config.port)))
        .run_with_graceful_shutdown(app, signal, Some(Duration::from_secs(10)))
        .await;

    shutdown.cancel();
    registry.shutdown();
    if let Err(err) = scheduler.await {
        warn!(error = %err, "scheduler task ended abnormally");
    }

    let drain = config.gateway_timeout + Duration::from_secs(5);
    if tokio::time::timeout(drain, registry.wait_idle()).await.is_err() {
        warn!(
            active_runs = registry.active_count(),
            "runs still active after shutdown grace period"
        );
    }

    result
}

async fn repositories(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CampaignRepository>, Arc<dyn SessionRepository>)> {
    match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("using postgres repositories");
            let campaigns: Arc<dyn CampaignRepository> =
                PostgresCampaignRepository::new(pool.clone());
            let sessions: Arc<dyn SessionRepository> = PostgresSessionRepository::new(pool);
            Ok((campaigns, sessions))
        }
        None => {
            warn!("DATABASE_URL not set, campaigns are kept in memory");
            let campaigns: Arc<dyn CampaignRepository> = Arc::new(InMemoryCampaignRepository::new());
            let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
            Ok((campaigns, sessions))
        }
    }
}
