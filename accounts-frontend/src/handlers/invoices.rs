use axum::Json;
use serde::Deserialize;
use service_core::error::AppError;

use crate::forms::invoice_builder::InvoicePreview;
use crate::forms::{InvoiceBuilder, LineField};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
}

/// Raw, unparsed form input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePreviewRequest {
    #[serde(default)]
    pub items: Vec<PreviewLine>,
    #[serde(default)]
    pub amount_paid: String,
}

/// Replay the submitted lines through an [`InvoiceBuilder`] and return the
/// derived totals.
pub async fn preview_invoice(
    Json(request): Json<InvoicePreviewRequest>,
) -> Result<Json<InvoicePreview>, AppError> {
    let mut builder = InvoiceBuilder::new_sales_invoice();

    for (index, line) in request.items.iter().enumerate() {
        builder.add_line();
        builder.update_line(index, LineField::Description, &line.description)?;
        builder.update_line(index, LineField::Quantity, &line.quantity)?;
        builder.update_line(index, LineField::UnitPrice, &line.unit_price)?;
    }
    builder.set_amount_paid(&request.amount_paid)?;

    Ok(Json(builder.preview()))
}
