use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use internship_match::config::{LoggingSettings, Settings};
use internship_match::core::Matcher;
use internship_match::routes::{
    self, handle_json_payload_error, handle_query_payload_error, AppState, RequestLimits,
};
use internship_match::services::{
    CachedJobSource, CareerAssistant, CatalogStore, ChatCompletionClient, CompletionService,
    HttpJobSource, JobSource, PostgresClient, QuizBank, Recommender, TokenVerifier,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_assistant(settings: &Settings) -> CareerAssistant {
    let Some(api_key) = settings.completion.api_key.clone() else {
        warn!("No completion API key configured, assistant runs in offline mode");
        return CareerAssistant::offline();
    };

    match ChatCompletionClient::new(
        settings.completion.base_url.clone(),
        api_key,
        settings.completion.model.clone(),
        settings.completion.timeout_secs,
    ) {
        Ok(client) => {
            info!("Completion client initialized (model: {})", client.model());
            let completion: Arc<dyn CompletionService> = Arc::new(client);
            CareerAssistant::new(Some(completion))
        }
        Err(e) => {
            error!("Failed to build completion client ({}), assistant runs in offline mode", e);
            CareerAssistant::offline()
        }
    }
}

fn build_job_source(settings: &Settings) -> Option<Arc<dyn JobSource>> {
    let live = &settings.live_jobs;
    if !live.enabled {
        info!("Live job search disabled");
        return None;
    }

    let Some(endpoint) = live.endpoint.clone() else {
        warn!("Live job search enabled but no endpoint configured");
        return None;
    };

    match HttpJobSource::new(endpoint, live.api_key.clone(), live.timeout_secs) {
        Ok(source) => {
            info!(
                "Live job search enabled (cache: {} entries, TTL: {}s)",
                live.cache_capacity, live.cache_ttl_secs
            );
            let inner: Arc<dyn JobSource> = Arc::new(source);
            Some(Arc::new(CachedJobSource::new(inner, live.cache_capacity, live.cache_ttl_secs)))
        }
        Err(e) => {
            error!("Failed to build live job client ({}), continuing without it", e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);
    info!("Starting internship matching service...");

    // Weights were checked when the settings were loaded
    let weights = settings
        .scoring
        .weights
        .to_weights()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let matcher = Matcher::new(weights);
    info!("Matcher initialized with weights: {:?}", weights);

    let catalog = Arc::new(CatalogStore::load(&settings.catalog.path));
    let recommender = Arc::new(Recommender::new(matcher, catalog));

    let quiz = Arc::new(QuizBank::load(&settings.quiz.path));

    // PostgreSQL is optional - matching and the assistant work without it
    let postgres = match &settings.database {
        Some(database) => match PostgresClient::from_settings(database).await {
            Ok(client) => {
                info!("PostgreSQL client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                error!("Failed to connect to PostgreSQL ({}), account endpoints disabled", e);
                None
            }
        },
        None => {
            warn!("No database configured, account endpoints disabled");
            None
        }
    };

    let tokens = match &settings.auth.jwt_secret {
        Some(secret) => Some(Arc::new(TokenVerifier::new(secret))),
        None => {
            warn!("No JWT secret configured, authenticated endpoints disabled");
            None
        }
    };

    let app_state = AppState {
        recommender,
        assistant: build_assistant(&settings),
        quiz,
        jobs: build_job_source(&settings),
        postgres,
        tokens,
        limits: RequestLimits::from_settings(&settings),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
