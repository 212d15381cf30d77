//! Ledger reconciliation engine
//!
//! Keeps an invoice's billed amount, applied payments and issued credits
//! mutually consistent. Everything here is a pure function of the invoice
//! and the committed totals the caller read immediately before the
//! decision; the caller is responsible for reading those totals and
//! writing the results inside one serialized store transaction, otherwise
//! two concurrent requests can both pass a ceiling check on stale sums.
//!
//! Two ceilings exist and are checked independently:
//! - payments:  Σ payments  <= invoice.amount
//! - credits:   Σ credits   <= invoice.amount
//!
//! The combined figure every downstream display uses is
//! [`outstanding_balance`] = amount - payments - credits.

use crate::error::LedgerError;
use crate::invoice::{Invoice, InvoiceStatus};
use chrono::Utc;
use custodia_core::Amount;
use rust_decimal::Decimal;

/// Decision for an accepted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Cumulative paid total including the new payment
    pub new_total: Amount,
    /// True when the payment crosses the full-amount threshold
    pub marks_paid: bool,
}

/// Decision after a payment removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Cumulative paid total after the removal
    pub new_total: Amount,
    /// True when a `paid` invoice dropped below its amount and was
    /// reverted to `sent`
    pub reverts_to_sent: bool,
}

/// Decision for an accepted credit memo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditOutcome {
    /// Cumulative credit total including the new memo
    pub new_total: Amount,
}

/// Validate a payment of `amount` against an invoice whose committed
/// payment total is `already_paid`.
///
/// Check order follows the business rule: invoice status first, then the
/// payment shape, then the ceiling. The `OverPayment` error carries the
/// exact remaining allowance so the caller can resubmit a corrected
/// amount without another read.
pub fn check_payment(
    invoice: &Invoice,
    already_paid: Amount,
    amount: Amount,
) -> Result<PaymentOutcome, LedgerError> {
    match invoice.status {
        InvoiceStatus::Paid | InvoiceStatus::Cancelled => {
            return Err(LedgerError::InvoiceClosedForPayment {
                status: invoice.status,
            });
        }
        InvoiceStatus::Draft => {
            // A draft has never been presented, and draft -> paid is not
            // an edge in the status graph; money against it has nowhere
            // legal to take the invoice.
            return Err(LedgerError::InvoiceNotPayable {
                status: invoice.status,
            });
        }
        InvoiceStatus::Sent | InvoiceStatus::Overdue => {}
    }

    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }

    // Committed totals never exceed the invoice amount; a corrupted row
    // reads as zero remaining and rejects everything.
    let remaining = invoice
        .amount
        .checked_sub(&already_paid)
        .unwrap_or(Amount::ZERO);

    if amount > remaining {
        return Err(LedgerError::OverPayment {
            attempted: amount,
            remaining,
        });
    }

    let new_total = Amount::new_unchecked(already_paid.value() + amount.value());
    Ok(PaymentOutcome {
        new_total,
        marks_paid: new_total >= invoice.amount,
    })
}

/// Validate and apply a payment in one step: on acceptance, an invoice
/// crossing the full-amount threshold transitions to `paid`.
pub fn apply_payment(
    invoice: &mut Invoice,
    already_paid: Amount,
    amount: Amount,
) -> Result<PaymentOutcome, LedgerError> {
    let outcome = check_payment(invoice, already_paid, amount)?;
    if outcome.marks_paid {
        invoice.status = InvoiceStatus::Paid;
        invoice.updated_at = Utc::now();
    }
    Ok(outcome)
}

/// Decide what a payment removal does to the invoice. `remaining_total`
/// is the committed payment sum with the removed payment already gone.
///
/// Only `paid -> sent` is ever derived here; dropping below the amount
/// never re-opens a cancelled invoice and never invents `overdue`, both
/// of which require explicit business action.
pub fn check_payment_removal(invoice: &Invoice, remaining_total: Amount) -> RemovalOutcome {
    RemovalOutcome {
        new_total: remaining_total,
        reverts_to_sent: invoice.status == InvoiceStatus::Paid
            && remaining_total < invoice.amount,
    }
}

/// Apply a payment removal, reverting a no-longer-covered `paid` invoice
/// to `sent`.
pub fn apply_payment_removal(invoice: &mut Invoice, remaining_total: Amount) -> RemovalOutcome {
    let outcome = check_payment_removal(invoice, remaining_total);
    if outcome.reverts_to_sent {
        invoice.status = InvoiceStatus::Sent;
        invoice.updated_at = Utc::now();
    }
    outcome
}

/// Validate a credit memo of `amount` against an invoice whose committed
/// credit total (excluding this memo) is `existing_credits`.
///
/// The ceiling is `invoice.amount - existing_credits`, independent of
/// payments. Credits never flip invoice status.
pub fn check_credit(
    invoice: &Invoice,
    existing_credits: Amount,
    amount: Amount,
) -> Result<CreditOutcome, LedgerError> {
    if invoice.status == InvoiceStatus::Cancelled {
        return Err(LedgerError::InvoiceClosedForCredit);
    }

    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }

    let remaining = invoice
        .amount
        .checked_sub(&existing_credits)
        .unwrap_or(Amount::ZERO);

    if amount > remaining {
        return Err(LedgerError::CreditExceedsRemainder {
            attempted: amount,
            remaining,
        });
    }

    Ok(CreditOutcome {
        new_total: Amount::new_unchecked(existing_credits.value() + amount.value()),
    })
}

/// Validate a caller-initiated status change and apply it.
pub fn change_status(invoice: &mut Invoice, to: InvoiceStatus) -> Result<(), LedgerError> {
    if !invoice.status.can_transition(to) {
        return Err(LedgerError::InvalidStatusTransition {
            from: invoice.status,
            to,
        });
    }
    invoice.status = to;
    invoice.updated_at = Utc::now();
    Ok(())
}

/// Amount still owed: billed amount minus payments minus credits.
///
/// The two ceilings are independent, so payments plus credits can jointly
/// exceed the amount; the display figure floors at zero.
pub fn outstanding_balance(amount: Amount, payments: Amount, credits: Amount) -> Amount {
    let outstanding = amount.value() - payments.value() - credits.value();
    if outstanding < Decimal::ZERO {
        Amount::ZERO
    } else {
        Amount::new_unchecked(outstanding)
    }
}

/// Sum a list of committed amounts (payment or credit totals)
pub fn total_of(amounts: &[Amount]) -> Amount {
    Amount::new_unchecked(amounts.iter().map(|a| a.value()).sum())
}
