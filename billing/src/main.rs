use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mentora_billing::handlers;
use mentora_config::FeatureToggles;
use mentora_database::{Database, DatabaseConfig};
use mentora_middleware::auth::AuthMiddlewareFactory;
use mentora_observability::{init_tracing, observability, TracingConfig};
use sqlx::PgPool;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize observability with structured logging
    init_tracing(TracingConfig::for_service("billing-service"));

    // Load environment variables
    dotenv::dotenv().ok();

    let port = mentora_config::service_port("BILLING_SERVICE_PORT", 3011);

    // Initialize authentication middleware with feature toggle
    let toggles = FeatureToggles::from_env_path();
    let auth_middleware = if toggles.auth_enabled() {
        AuthMiddlewareFactory::new().map_err(|e| {
            tracing::error!("Failed to initialize auth middleware: {}", e);
            e
        })?
    } else {
        tracing::warn!("Auth feature disabled via feature toggles; injecting default claims.");
        AuthMiddlewareFactory::disabled()
    };

    // Database connection - always required
    let db_config = DatabaseConfig::from_env()?;
    tracing::info!("[Billing Service] Connecting to database...");
    let database = Database::new(&db_config).await?;
    database.migrate().await?;
    tracing::info!("[Billing Service] Database connection established");
    let pool = database.pool().clone();

    tracing::info!("[Billing Service] Starting on port {}", port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(cors)
            .wrap(observability("billing-service"))
            .wrap(auth_middleware.clone())
            .route("/health", web::get().to(health_check))
            .configure(handlers::billing::configure_billing_routes)
            .configure(handlers::trial::configure_trial_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}

async fn health_check(pool: web::Data<PgPool>) -> actix_web::Result<web::Json<serde_json::Value>> {
    let db_status = match sqlx::query("SELECT 1 as test").fetch_one(pool.get_ref()).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("[Billing Service] Database health check failed: {}", e);
            "disconnected"
        }
    };

    Ok(web::Json(serde_json::json!({
        "status": "healthy",
        "service": "billing-service",
        "database": db_status,
        "timestamp": chrono::Utc::now()
    })))
}
