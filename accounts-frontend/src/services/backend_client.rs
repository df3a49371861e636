//! HTTP client for the backend of record.
//!
//! Every call is made once with the configured timeout. Outgoing requests
//! carry the current trace context and, when configured, a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use service_core::observability::{TracedClientExt, TracedRequest};

use super::backend_gateway::BackendGateway;
use super::error::GatewayError;
use super::metrics::{GATEWAY_REQUESTS_TOTAL, GATEWAY_REQUEST_DURATION};
use super::resource::{
    Customers, Invoices, Payments, Pdcs, PurchaseInvoices, Receipts, Resource, SalesReturns,
    Suppliers,
};
use crate::config::BackendSettings;
use crate::models::{
    CreatePayment, CreateReceipt, Customer, Invoice, InvoiceNumberPreview, Payment, Pdc,
    PurchaseInvoice, Receipt, ReceiptNumberPreview, ReturnNumberPreview, Supplier,
};

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        self.settings.url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// `path` with each of `segments` appended as one percent-encoded path
    /// segment, so ids never change the shape of the route.
    fn url_with(&self, path: &str, segments: &[&str]) -> Result<String, GatewayError> {
        let raw = self.url(path);
        let invalid = |reason: String| GatewayError::InvalidUrl {
            url: raw.clone(),
            reason,
        };

        let mut url = Url::parse(&raw).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot have path segments".to_string()))?
            .extend(segments);
        Ok(url.into())
    }

    fn prepare(&self, request: TracedRequest) -> TracedRequest {
        let request = request.timeout(Duration::from_secs(self.settings.timeout_seconds));
        match &self.settings.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send and reject non-success statuses, keeping the body for the error.
    async fn dispatch(
        &self,
        url: &str,
        request: TracedRequest,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .prepare(request)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        operation: &'static str,
        url: &str,
        request: TracedRequest,
    ) -> Result<T, GatewayError> {
        let timer = GATEWAY_REQUEST_DURATION
            .with_label_values(&[resource, operation])
            .start_timer();

        let result = match self.dispatch(url, request).await {
            Ok(response) => response
                .json::<T>()
                .await
                .map_err(|source| GatewayError::Decode {
                    url: url.to_string(),
                    source,
                }),
            Err(err) => Err(err),
        };

        timer.observe_duration();
        record_outcome(resource, operation, url, result.as_ref().err());
        result
    }

    async fn send_empty(
        &self,
        resource: &'static str,
        operation: &'static str,
        url: &str,
        request: TracedRequest,
    ) -> Result<(), GatewayError> {
        let timer = GATEWAY_REQUEST_DURATION
            .with_label_values(&[resource, operation])
            .start_timer();

        let result = self.dispatch(url, request).await.map(|_| ());

        timer.observe_duration();
        record_outcome(resource, operation, url, result.as_ref().err());
        result
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R::Record>, GatewayError> {
        let url = self.url(R::PATH);
        self.send_json(R::NAME, "list", &url, self.client.traced_get(&url))
            .await
    }

    pub async fn create<R: Resource>(&self, input: &R::Input) -> Result<R::Record, GatewayError> {
        let url = self.url(R::PATH);
        self.send_json(R::NAME, "create", &url, self.client.traced_post(&url).json(input))
            .await
    }

    pub async fn update<R: Resource>(
        &self,
        id: &str,
        input: &R::Input,
    ) -> Result<R::Record, GatewayError> {
        let url = self.url_with(R::PATH, &[id])?;
        self.send_json(R::NAME, "update", &url, self.client.traced_put(&url).json(input))
            .await
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.url_with(R::PATH, &[id])?;
        self.send_empty(R::NAME, "delete", &url, self.client.traced_delete(&url))
            .await
    }

    async fn preview<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
    ) -> Result<T, GatewayError> {
        let url = self.url(&format!("{}/new-number", path));
        self.send_json(resource, "next_number", &url, self.client.traced_get(&url))
            .await
    }

    async fn pdc_action(&self, id: &str, action: &'static str) -> Result<Pdc, GatewayError> {
        let url = self.url_with(Pdcs::PATH, &[id, action])?;
        let pdc: Pdc = self
            .send_json(Pdcs::NAME, action, &url, self.client.traced_patch(&url))
            .await?;
        tracing::info!(pdc_id = %pdc.id, status = %pdc.status, "Cheque status changed");
        Ok(pdc)
    }
}

fn record_outcome(
    resource: &'static str,
    operation: &'static str,
    url: &str,
    error: Option<&GatewayError>,
) {
    let outcome = error.map_or("success", GatewayError::outcome);
    GATEWAY_REQUESTS_TOTAL
        .with_label_values(&[resource, operation, outcome])
        .inc();

    match error {
        Some(err) => tracing::warn!(
            resource,
            operation,
            url = %url,
            error = %err,
            "Backend request failed"
        ),
        None => tracing::debug!(resource, operation, url = %url, "Backend request succeeded"),
    }
}

#[async_trait]
impl BackendGateway for BackendClient {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        self.list::<Customers>().await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, GatewayError> {
        self.list::<Suppliers>().await
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, GatewayError> {
        self.list::<Invoices>().await
    }

    async fn list_purchase_invoices(&self) -> Result<Vec<PurchaseInvoice>, GatewayError> {
        self.list::<PurchaseInvoices>().await
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, GatewayError> {
        self.list::<Payments>().await
    }

    async fn list_pdcs(&self) -> Result<Vec<Pdc>, GatewayError> {
        self.list::<Pdcs>().await
    }

    async fn invoices_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Invoice>, GatewayError> {
        let url = self.url_with(Invoices::PATH, &["by-customer", customer_id])?;
        self.send_json(Invoices::NAME, "by_customer", &url, self.client.traced_get(&url))
            .await
    }

    async fn next_invoice_number(&self) -> Result<String, GatewayError> {
        let preview: InvoiceNumberPreview = self.preview(Invoices::NAME, Invoices::PATH).await?;
        Ok(preview.invoice_number)
    }

    async fn next_return_number(&self) -> Result<String, GatewayError> {
        let preview: ReturnNumberPreview = self
            .preview(SalesReturns::NAME, SalesReturns::PATH)
            .await?;
        Ok(preview.return_number)
    }

    async fn next_receipt_number(&self) -> Result<String, GatewayError> {
        let preview: ReceiptNumberPreview = self.preview(Receipts::NAME, Receipts::PATH).await?;
        Ok(preview.receipt_number)
    }

    async fn next_purchase_invoice_number(&self) -> Result<String, GatewayError> {
        let preview: InvoiceNumberPreview = self
            .preview(PurchaseInvoices::NAME, PurchaseInvoices::PATH)
            .await?;
        Ok(preview.invoice_number)
    }

    async fn create_payment(&self, payment: &CreatePayment) -> Result<Payment, GatewayError> {
        self.create::<Payments>(payment).await
    }

    async fn update_payment(
        &self,
        id: &str,
        payment: &CreatePayment,
    ) -> Result<Payment, GatewayError> {
        self.update::<Payments>(id, payment).await
    }

    async fn create_receipt(&self, receipt: &CreateReceipt) -> Result<Receipt, GatewayError> {
        self.create::<Receipts>(receipt).await
    }

    async fn update_receipt(
        &self,
        id: &str,
        receipt: &CreateReceipt,
    ) -> Result<Receipt, GatewayError> {
        self.update::<Receipts>(id, receipt).await
    }

    async fn mark_pdc_realised(&self, id: &str) -> Result<Pdc, GatewayError> {
        self.pdc_action(id, "realise").await
    }

    async fn mark_pdc_bounced(&self, id: &str) -> Result<Pdc, GatewayError> {
        self.pdc_action(id, "bounce").await
    }
}
