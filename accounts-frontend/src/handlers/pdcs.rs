use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::forms::pdc;
use crate::models::Pdc;
use crate::services::{BackendGateway, GatewayError};
use crate::AppState;

async fn find_pdc(gateway: &dyn BackendGateway, id: &str) -> Result<Pdc, GatewayError> {
    gateway
        .list_pdcs()
        .await?
        .into_iter()
        .find(|pdc| pdc.id == id)
        .ok_or_else(|| GatewayError::NotFound {
            resource: "pdc",
            id: id.to_string(),
        })
}

pub async fn realise_pdc(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pdc>, AppError> {
    let gateway = state.gateway.as_ref();
    let cheque = find_pdc(gateway, &id).await?;
    Ok(Json(pdc::mark_realised(gateway, &cheque).await?))
}

pub async fn bounce_pdc(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pdc>, AppError> {
    let gateway = state.gateway.as_ref();
    let cheque = find_pdc(gateway, &id).await?;
    Ok(Json(pdc::mark_bounced(gateway, &cheque).await?))
}
