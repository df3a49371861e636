//! Form engines: draft state, derived amounts and validation for every
//! document the administrator edits.

pub mod input;
pub mod invoice_builder;
pub mod journal_voucher;
pub mod numbering;
pub mod payment_amendment;
pub mod payment_applicator;
pub mod pdc;
pub mod receipt_applicator;
pub mod state;
pub mod totals;
pub mod validation;

pub use invoice_builder::{DocumentKind, InvoiceBuilder, LineField};
pub use payment_applicator::{PaymentApplicator, Settleable};
pub use receipt_applicator::ReceiptApplicator;
pub use state::FormState;
pub use validation::ValidationError;
