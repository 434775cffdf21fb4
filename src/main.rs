use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use arena_broker_rs::api;
use arena_broker_rs::broker::Broker;
use arena_broker_rs::config::Settings;
use arena_broker_rs::context::SessionContext;
use arena_broker_rs::host::LoggingHost;
use arena_broker_rs::model::Account;
use arena_broker_rs::remote::http::HttpRemote;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    // Load environment variables
    dotenv::dotenv().ok();

    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            error!("❌ Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let session = settings.session.clone().unwrap_or_default();
    let account = Account {
        id: session.account_id.unwrap_or_else(|| {
            error!("❌ session.account_id is required");
            std::process::exit(1);
        }),
        name: session
            .account_name
            .unwrap_or_else(|| "TradeArena Trading Account".to_string()),
        currency: session.currency.unwrap_or_else(|| "USD".to_string()),
    };

    let remote = match HttpRemote::new(settings.backend.as_ref()) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            error!("❌ Failed to configure backend client: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = SessionContext::new(
        account,
        session.user_id.unwrap_or_default(),
        session.competition_id,
    );

    let broker = Arc::new(Broker::new(
        remote,
        Arc::new(LoggingHost),
        ctx,
        settings.flags.clone(),
        settings.settlement.clone(),
    ));

    info!(
        "✅ Broker adapter initialized for account {}",
        broker.current_account()
    );

    let port = settings
        .server
        .as_ref()
        .and_then(|s| s.port)
        .unwrap_or(3003);
    let bind_address = format!("0.0.0.0:{}", port);
    info!("🚀 Starting broker API on {}", bind_address);

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(broker.clone()))
            .configure(api::config)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
