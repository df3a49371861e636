//! Typed records exchanged with the backend of record.
//!
//! Field names follow the backend's camelCase JSON with Mongo-style `_id`
//! identifiers. Money is always [`rust_decimal::Decimal`], carried on the wire
//! as a JSON number.

pub mod date_format;
pub mod invoice;
pub mod journal_voucher;
pub mod party;
pub mod payment;
pub mod pdc;
pub mod purchase_invoice;
pub mod receipt;
pub mod reference;
pub mod sales_return;
pub mod user;

pub use invoice::{
    AppliedPayment, CreateInvoice, Invoice, InvoiceNumberPreview, InvoiceStatus, LineItem,
};
pub use journal_voucher::{CreateJournalVoucher, JournalVoucher};
pub use party::{CreateParty, Customer, Party, PartyKind, Supplier};
pub use payment::{AppliedInvoiceAllocation, CreatePayment, Payment, PaymentDirection, PaymentMethod};
pub use pdc::{CreatePdc, Pdc, PdcStatus};
pub use purchase_invoice::{CreatePurchaseInvoice, PurchaseInvoice, PurchaseLine};
pub use receipt::{CreateReceipt, Receipt, ReceiptNumberPreview};
pub use reference::Reference;
pub use sales_return::{CreateSalesReturn, ReturnNumberPreview, SalesReturn};
pub use user::{CreateUser, User};
