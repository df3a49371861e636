use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use service_core::error::AppError;

use crate::forms::ReceiptApplicator;
use crate::models::{date_format, PaymentMethod, Receipt};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub customer: String,
    /// Required unless the customer has exactly one open invoice.
    #[serde(default)]
    pub invoice: Option<String>,
    /// Raw input; omitted means the invoice's full balance.
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create_receipt(
    State(state): State<AppState>,
    Json(request): Json<ReceiptRequest>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let gateway = state.gateway.as_ref();
    let mut form = ReceiptApplicator::new(request.date);

    form.load(gateway).await?;
    form.select_customer(gateway, &request.customer).await?;

    if let Some(invoice) = &request.invoice {
        if form.invoice() != Some(invoice.as_str()) {
            form.select_invoice(invoice)?;
        }
    }
    if let Some(amount) = &request.amount {
        form.set_amount(amount)?;
    }
    form.set_payment_method(request.payment_method);
    form.set_notes(request.notes);

    let receipt = form.save(gateway).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
