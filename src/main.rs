use lesson_recommender::config::Config;
use lesson_recommender::db::SqliteStore;
use lesson_recommender::logging::init_tracing;
use lesson_recommender::recommender::RecommendationWeights;
use lesson_recommender::seed::seed_curriculum;
use lesson_recommender::services::{RecommendationOptions, RecommendationService};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let store = match SqliteStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, url = %config.database_url, "failed to open database");
            std::process::exit(1);
        }
    };

    seed_curriculum(&store, config.curriculum_seed.as_deref()).await;

    let recommendations = RecommendationService::new(
        RecommendationWeights::from_env(),
        RecommendationOptions {
            track: config.track.clone(),
            default_weekly_hours: config.default_weekly_hours,
        },
    );

    let app = lesson_recommender::create_app(store, recommendations);

    let addr = config.bind_addr();
    tracing::info!(%addr, track = %config.track, "lesson-recommender listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
