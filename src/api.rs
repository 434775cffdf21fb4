use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, ResponseError, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::broker::Broker;
use crate::error::BrokerError;
use crate::model::{Brackets, PreOrder};

impl ResponseError for BrokerError {
    fn status_code(&self) -> StatusCode {
        match self {
            BrokerError::Validation(_) => StatusCode::BAD_REQUEST,
            BrokerError::NotFound(_) => StatusCode::NOT_FOUND,
            BrokerError::Transport(_) | BrokerError::Remote(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Discovery payload the front end polls once at startup.
pub async fn capabilities(data: web::Data<Arc<Broker>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "connectionStatus": data.connection_status(),
        "supportsBrackets": data.supports_brackets(),
        "configFlags": data.config_flags(),
        "accountManagerInfo": data.account_manager_info(),
    }))
}

pub async fn accounts_metainfo(data: web::Data<Arc<Broker>>) -> impl Responder {
    HttpResponse::Ok().json(data.accounts_metainfo().await)
}

pub async fn account_balance(
    data: web::Data<Arc<Broker>>,
) -> Result<HttpResponse, BrokerError> {
    Ok(HttpResponse::Ok().json(data.account_balance().await?))
}

pub async fn position_actions(
    data: web::Data<Arc<Broker>>,
    path: web::Path<String>,
) -> impl Responder {
    HttpResponse::Ok().json(data.position_actions(&path).await)
}

pub async fn list_positions(
    data: web::Data<Arc<Broker>>,
) -> Result<HttpResponse, BrokerError> {
    Ok(HttpResponse::Ok().json(data.positions().await?))
}

#[derive(Deserialize)]
pub struct SymbolQuery {
    symbol: String,
}

pub async fn is_tradable(
    data: web::Data<Arc<Broker>>,
    query: web::Query<SymbolQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(data.is_tradable(&query.symbol).await)
}

pub async fn executions(
    data: web::Data<Arc<Broker>>,
    query: web::Query<SymbolQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(data.executions(&query.symbol).await)
}

pub async fn edit_brackets(
    data: web::Data<Arc<Broker>>,
    path: web::Path<String>,
    body: web::Json<Brackets>,
) -> Result<HttpResponse, BrokerError> {
    data.edit_position_brackets(&path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

pub async fn modify_position(
    data: web::Data<Arc<Broker>>,
    path: web::Path<String>,
    body: web::Json<Brackets>,
) -> Result<HttpResponse, BrokerError> {
    data.modify_position(&path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

pub async fn close_position(
    data: web::Data<Arc<Broker>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BrokerError> {
    data.close_position(&path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

pub async fn reverse_position(
    data: web::Data<Arc<Broker>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BrokerError> {
    data.reverse_position(&path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

pub async fn place_order(
    data: web::Data<Arc<Broker>>,
    body: web::Json<PreOrder>,
) -> Result<HttpResponse, BrokerError> {
    let order_id = data.place_order(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "order_id": order_id })))
}

// Route configuration
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)))
        .service(web::resource("/capabilities").route(web::get().to(capabilities)))
        .service(web::resource("/accounts").route(web::get().to(accounts_metainfo)))
        .service(web::resource("/accounts/balance").route(web::get().to(account_balance)))
        .service(web::resource("/tradable").route(web::get().to(is_tradable)))
        .service(web::resource("/executions").route(web::get().to(executions)))
        .service(web::resource("/positions").route(web::get().to(list_positions)))
        .service(
            web::resource("/positions/{id}/actions").route(web::get().to(position_actions)),
        )
        .service(web::resource("/positions/{id}/brackets").route(web::post().to(edit_brackets)))
        .service(web::resource("/positions/{id}/modify").route(web::post().to(modify_position)))
        .service(web::resource("/positions/{id}/close").route(web::post().to(close_position)))
        .service(web::resource("/positions/{id}/reverse").route(web::post().to(reverse_position)))
        .service(web::resource("/orders").route(web::post().to(place_order)));
}
