use std::io::Error;
use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use tokio::main;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::application::handlers::broadcast_runner::BroadcastRunner;
use crate::application::services::pacing::Pacer;
use crate::application::services::safe_send::SafeSender;
use crate::application::services::transport::{SerialTransport, TransportClient};
use crate::application::usecases::{
    get_job::GetJobUseCase, list_jobs::ListJobsUseCase, send_message::SendMessageUseCase,
    start_broadcast::StartBroadcastUseCase,
};
use crate::config::Config;
use crate::domain::repositories::{BroadcastJobRepository, RecipientListRepository};
use crate::domain::value_objects::Jid;
use crate::infrastructure::repositories::{
    file::FileRecipientListRepository, in_memory::InMemoryBroadcastJobRepository,
};
use crate::infrastructure::transport::bridge::BridgeTransport;
use crate::presentation::http::endpoints::{
    broadcasts::BroadcastsEndpoints,
    messages::MessagesEndpoints,
    root::{ApiState, Endpoints},
    session::SessionEndpoints,
};

mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bridge = Arc::new(BridgeTransport::new(
        &config.bridge_url,
        config.send.call_timeout,
    ));
    bridge.clone().spawn_status_poller(config.bridge_status_poll);
    let transport: Arc<dyn TransportClient> = Arc::new(SerialTransport::new(bridge));

    let operator = match &config.operator {
        Some(raw) => match Jid::normalize(raw, &config.defaults) {
            Ok(jid) => Some(jid),
            Err(reason) => {
                warn!(%reason, "ignoring invalid operator recipient");
                None
            }
        },
        None => None,
    };

    let sender = Arc::new(SafeSender::new(transport.clone(), config.send.clone()));
    let jobs: Arc<dyn BroadcastJobRepository> = Arc::new(InMemoryBroadcastJobRepository::new());
    let lists: Arc<dyn RecipientListRepository> = Arc::new(FileRecipientListRepository::new(
        config.recipient_lists_dir.clone(),
    ));
    let runner = Arc::new(BroadcastRunner::new(
        sender.clone(),
        Pacer::new(config.pacing.clone()),
        jobs.clone(),
        config.defaults.clone(),
        operator,
    ));

    let state = Arc::new(ApiState {
        send_message_usecase: Arc::new(SendMessageUseCase::new(sender, config.defaults.clone())),
        start_broadcast_usecase: Arc::new(StartBroadcastUseCase::new(lists, runner)),
        get_job_usecase: Arc::new(GetJobUseCase::new(jobs.clone())),
        list_jobs_usecase: Arc::new(ListJobsUseCase::new(jobs)),
        transport,
    });

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    println!("Starting server at {}", server_url);

    let api_service = OpenApiService::new(
        (
            Endpoints,
            MessagesEndpoints::new(state.clone()),
            BroadcastsEndpoints::new(state.clone()),
            SessionEndpoints::new(state),
        ),
        "Broadcast API",
        "0.1.0",
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("localhost:{}", config.port)))
        .run(app)
        .await
}
