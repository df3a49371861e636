use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::forms::numbering::next_sequence_number;
use crate::forms::PaymentApplicator;
use crate::models::{date_format, Payment, PaymentMethod};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    pub invoice: String,
    /// Raw input; omitted means the invoice's full remaining balance.
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPaymentRequest {
    pub supplier: String,
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub allocations: Vec<AllocationRequest>,
}

pub async fn next_payment_number(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let payments = state.gateway.list_payments().await?;
    let payment_number = next_sequence_number(
        &state.numbering.payment_prefix,
        state.numbering.payment_width,
        payments.iter().map(|p| p.payment_number.as_str()),
    );
    Ok(Json(json!({ "paymentNumber": payment_number })))
}

/// Run the supplier payment form against freshly loaded data and create the
/// payment.
pub async fn create_supplier_payment(
    State(state): State<AppState>,
    Json(request): Json<SupplierPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let gateway = state.gateway.as_ref();
    let mut form = PaymentApplicator::for_suppliers(request.date);

    form.load(gateway, &state.numbering).await?;
    form.select_party(&request.supplier)?;
    form.set_method(request.method);
    form.set_notes(request.notes);

    for allocation in &request.allocations {
        let already_allocated = form
            .allocations()
            .iter()
            .any(|a| a.invoice_id == allocation.invoice);
        if !already_allocated {
            form.toggle_invoice(&allocation.invoice)?;
        }
        if let Some(amount) = &allocation.amount {
            form.set_allocation_amount(&allocation.invoice, amount)?;
        }
    }

    let payment = form.submit(gateway).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
