pub mod app;
pub mod invoices;
pub mod metrics;
pub mod payments;
pub mod pdcs;
pub mod receipts;
