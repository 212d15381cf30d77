//! Custodia Ledger - Invoice/payment/credit reconciliation
//!
//! The reconciliation engine keeps three figures mutually consistent for
//! every invoice: the billed amount, the sum of accepted payments and the
//! sum of issued credit memos. All decision functions are pure; they
//! operate on the invoice and the committed totals the caller just read,
//! and the caller commits results inside one serialized store
//! transaction.
//!
//! Also owns the `{PREFIX}-{year}-{seq:05}` document number format used
//! by receipts, invoices, payments and credit memos.

pub mod credit;
pub mod error;
pub mod invoice;
pub mod numbering;
pub mod payment;
pub mod reconcile;

pub use credit::{CreditMemo, CreditReason};
pub use error::LedgerError;
pub use invoice::{Invoice, InvoiceStatus};
pub use numbering::{DocumentKind, DocumentNumber, NumberParseError};
pub use payment::{Payment, PaymentMethod};
pub use reconcile::{
    apply_payment, apply_payment_removal, change_status, check_credit, check_payment,
    check_payment_removal, outstanding_balance, total_of, CreditOutcome, PaymentOutcome,
    RemovalOutcome,
};
