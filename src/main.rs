use std::{net::SocketAddr, sync::Arc};

use sd35_serverless::{
    app::{envy::Envy, util},
    engine::{config::EngineConfig, runner::ProcessRunner, service::Engine},
    jobs::{
        queue::{self, JobQueue},
        serverless::{self, Webhooks},
    },
    router, AppState,
};

#[tokio::main]
async fn main() {
    // tracing
    util::logging::init();

    // environment
    util::dotenv::load();
    let envy = match envy::from_env::<Envy>() {
        Ok(config) => config,
        Err(e) => panic!("{:#?}", e),
    };

    let engine = Arc::new(Engine::new(EngineConfig::from_envy(&envy), ProcessRunner));

    if let Some(webhooks) = Webhooks::from_envy(&envy) {
        serverless::start(webhooks, engine).await;
        return;
    }

    if envy.is_serverless() {
        tracing::warn!("RUNPOD_WEBHOOK_POST_OUTPUT is missing, serving the local API instead");
    }

    // local api
    let port = envy.port.to_owned().unwrap_or(8000);
    let envy = Arc::new(envy);

    let (queue, receiver) = JobQueue::new();
    let queue = Arc::new(queue);
    queue::spawn_consumer(queue.clone(), receiver, engine);
    util::janitor::spawn(queue.clone(), envy.job_retention_secs);

    let state = AppState { queue, envy };
    let app = router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", e);
    }
}
