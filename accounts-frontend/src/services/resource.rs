//! REST collections exposed by the backend of record.
//!
//! Each marker type names one collection: its path, the record the backend
//! returns and the body it accepts on create and update.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    CreateInvoice, CreateJournalVoucher, CreateParty, CreatePayment, CreatePdc,
    CreatePurchaseInvoice, CreateReceipt, CreateSalesReturn, CreateUser, Customer, Invoice,
    JournalVoucher, Payment, Pdc, PurchaseInvoice, Receipt, SalesReturn, Supplier, User,
};

pub trait Resource {
    const PATH: &'static str;
    /// Singular label used in logs, metrics and not-found errors.
    const NAME: &'static str;
    type Record: DeserializeOwned + Send;
    type Input: Serialize + Sync;
}

macro_rules! resource {
    ($marker:ident, $path:literal, $name:literal, $record:ty, $input:ty) => {
        pub struct $marker;

        impl Resource for $marker {
            const PATH: &'static str = $path;
            const NAME: &'static str = $name;
            type Record = $record;
            type Input = $input;
        }
    };
}

resource!(Users, "/users", "user", User, CreateUser);
resource!(Customers, "/customers", "customer", Customer, CreateParty);
resource!(Suppliers, "/suppliers", "supplier", Supplier, CreateParty);
resource!(Invoices, "/invoices", "invoice", Invoice, CreateInvoice);
resource!(
    PurchaseInvoices,
    "/purchase-invoices",
    "purchase_invoice",
    PurchaseInvoice,
    CreatePurchaseInvoice
);
resource!(SalesReturns, "/sales-returns", "sales_return", SalesReturn, CreateSalesReturn);
resource!(Receipts, "/receipts", "receipt", Receipt, CreateReceipt);
resource!(Payments, "/payments", "payment", Payment, CreatePayment);
resource!(Pdcs, "/pdcs", "pdc", Pdc, CreatePdc);
resource!(
    JournalVouchers,
    "/journal-vouchers",
    "journal_voucher",
    JournalVoucher,
    CreateJournalVoucher
);
