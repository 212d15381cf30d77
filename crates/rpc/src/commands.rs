//! CLI commands
//!
//! Thin printing wrappers over the [`AppContext`] operations. Parsing
//! of raw argument strings into domain types happens here; the
//! operations themselves only see typed values.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use custodia_core::{Amount, AssetKind, ComplianceStatus, Currency};
use custodia_ledger::{CreditReason, InvoiceStatus, PaymentMethod};
use custodia_receipt::ReceiptStatus;
use custodia_risk::RiskFactor;

use crate::auth::Actor;
use crate::context::AppContext;

/// Register a new client
pub fn register_client(
    ctx: &mut AppContext,
    actor: &Actor,
    name: &str,
    country: &str,
) -> Result<(), anyhow::Error> {
    let client = ctx.register_client(actor, name, country)?;

    println!("✅ Registered client {} ({})", client.name, client.id);
    Ok(())
}

/// Change a client's compliance status
pub fn set_client_status(
    ctx: &mut AppContext,
    actor: &Actor,
    client_id: &str,
    status: &str,
) -> Result<(), anyhow::Error> {
    let status: ComplianceStatus = parse_enum(status, "compliance status")?;

    let client = ctx.set_client_status(actor, client_id, status)?;

    println!("✅ Client {} is now {}", client.id, client.compliance_status);
    Ok(())
}

/// Register an asset held in custody for a client
pub fn register_asset(
    ctx: &mut AppContext,
    actor: &Actor,
    client_id: &str,
    name: &str,
    kind: &str,
    value: Decimal,
    currency: &str,
) -> Result<(), anyhow::Error> {
    let kind: AssetKind = parse_enum(kind, "asset kind")?;
    let declared_value = Amount::new(value)?;
    let currency: Currency = currency.parse()?;

    let asset = ctx.register_asset(actor, client_id, name, kind, declared_value, currency)?;

    println!("✅ Registered asset {} ({})", asset.name, asset.id);
    Ok(())
}

/// Create a draft custody receipt for an asset
pub fn create_receipt(
    ctx: &mut AppContext,
    actor: &Actor,
    client_id: &str,
    asset_id: &str,
) -> Result<(), anyhow::Error> {
    let receipt = ctx.create_receipt(actor, client_id, asset_id)?;

    println!(
        "✅ Created custody receipt {} (id: {})",
        receipt.number, receipt.id
    );
    Ok(())
}

/// Advance a receipt through its lifecycle
pub fn advance_receipt(
    ctx: &mut AppContext,
    actor: &Actor,
    number: &str,
    to: &str,
) -> Result<(), anyhow::Error> {
    let to: ReceiptStatus = parse_enum(to, "receipt status")?;

    let receipt = ctx.advance_receipt(actor, number, to)?;

    println!("✅ Receipt {} advanced to {}", receipt.number, receipt.status);
    if receipt.status == ReceiptStatus::Issued {
        // The hash goes on the printed document handed to the client
        println!(
            "   Integrity hash: {}",
            receipt.integrity_hash.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Delete a draft receipt
pub fn delete_receipt(
    ctx: &mut AppContext,
    actor: &Actor,
    number: &str,
) -> Result<(), anyhow::Error> {
    let receipt = ctx.delete_receipt(actor, number)?;

    println!("✅ Deleted draft receipt {}", receipt.number);
    Ok(())
}

/// Answer a verification request for a receipt number
pub fn verify_receipt(
    ctx: &AppContext,
    number: &str,
    hash: Option<&str>,
) -> Result<(), anyhow::Error> {
    let report = ctx.verify_receipt(number, hash)?;

    if !report.valid {
        if report.hash_valid == Some(false) {
            println!(
                "❌ Receipt {} failed verification: integrity hash mismatch",
                report.number
            );
        } else {
            println!("❌ Receipt {} is not verifiable", report.number);
        }
        return Ok(());
    }

    println!("✅ Receipt {} is authentic", report.number);
    if let Some(status) = report.status {
        println!("   Status:  {}", status);
    }
    if let Some(date) = report.issue_date {
        println!("   Issued:  {}", date.to_rfc3339());
    }
    if let Some(ref client) = report.client {
        println!("   Client:  {} ({})", client.name, client.country);
    }
    if let Some(ref asset) = report.asset {
        println!(
            "   Asset:   {} [{}], declared {} {}",
            asset.name, asset.kind, asset.declared_value, asset.currency
        );
    }
    Ok(())
}

/// Create an invoice for an approved client
pub fn create_invoice(
    ctx: &mut AppContext,
    actor: &Actor,
    client_id: &str,
    amount: Decimal,
    currency: &str,
    receipt_ref: Option<&str>,
    due: Option<&str>,
) -> Result<(), anyhow::Error> {
    let amount = Amount::new(amount)?;
    let currency: Currency = currency.parse()?;
    let due_date = due
        .map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .transpose()
        .map_err(|err| anyhow::anyhow!("Invalid due date (expected YYYY-MM-DD): {err}"))?;

    let invoice = ctx.create_invoice(actor, client_id, amount, currency, receipt_ref, due_date)?;

    println!(
        "✅ Created invoice {} for {} ({} {})",
        invoice.number, invoice.client_id, invoice.amount, invoice.currency
    );
    Ok(())
}

/// Change an invoice's status
pub fn set_invoice_status(
    ctx: &mut AppContext,
    actor: &Actor,
    number: &str,
    to: &str,
) -> Result<(), anyhow::Error> {
    let to: InvoiceStatus = parse_enum(to, "invoice status")?;

    let invoice = ctx.set_invoice_status(actor, number, to)?;

    println!("✅ Invoice {} is now {}", invoice.number, invoice.status);
    Ok(())
}

/// Print an invoice with its payments, credits and derived totals
pub fn show_invoice(ctx: &AppContext, number: &str) -> Result<(), anyhow::Error> {
    let statement = ctx.invoice_statement(number)?;
    let invoice = &statement.invoice;

    println!("Invoice {} [{}]", invoice.number, invoice.status);
    println!("{:-<72}", "");
    println!("  Client:      {}", invoice.client_id);
    if let Some(ref receipt) = invoice.receipt_ref {
        println!("  Receipt:     {}", receipt);
    }
    if let Some(due) = invoice.due_date {
        println!("  Due:         {}", due);
    }
    println!("  Amount:      {} {}", invoice.amount, invoice.currency);

    if !statement.payments.is_empty() {
        println!("  Payments:");
        for payment in &statement.payments {
            println!(
                "    {:>14} | {:>12} | {:<13} | {}",
                payment.number,
                payment.amount,
                payment.method,
                payment.reference.as_deref().unwrap_or("-")
            );
        }
    }
    if !statement.credits.is_empty() {
        println!("  Credits:");
        for memo in &statement.credits {
            println!(
                "    {:>14} | {:>12} | {}",
                memo.number, memo.amount, memo.reason
            );
        }
    }
    println!("{:-<72}", "");
    println!("  Paid:        {}", statement.paid_total);
    println!("  Credited:    {}", statement.credit_total);
    println!("  Outstanding: {}", statement.outstanding);
    Ok(())
}

/// Record a payment against an invoice
pub fn record_payment(
    ctx: &mut AppContext,
    actor: &Actor,
    invoice_number: &str,
    amount: Decimal,
    method: &str,
    reference: Option<&str>,
) -> Result<(), anyhow::Error> {
    let amount = Amount::new(amount)?;
    let method: PaymentMethod = parse_enum(method, "payment method")?;

    let (payment, invoice) = ctx.record_payment(actor, invoice_number, amount, method, reference)?;

    println!(
        "✅ Recorded payment {} of {} against {}",
        payment.number, payment.amount, invoice.number
    );
    if invoice.status == InvoiceStatus::Paid {
        println!("   Invoice {} is now fully paid", invoice.number);
    }
    Ok(())
}

/// Remove a recorded payment
pub fn remove_payment(
    ctx: &mut AppContext,
    actor: &Actor,
    payment_number: &str,
) -> Result<(), anyhow::Error> {
    let (payment, invoice) = ctx.remove_payment(actor, payment_number)?;

    println!("✅ Removed payment {} from {}", payment.number, invoice.number);
    println!("   Invoice {} is now {}", invoice.number, invoice.status);
    Ok(())
}

/// Issue a credit memo against an invoice
pub fn issue_credit(
    ctx: &mut AppContext,
    actor: &Actor,
    invoice_number: &str,
    amount: Decimal,
    reason: &str,
    notes: Option<&str>,
) -> Result<(), anyhow::Error> {
    let amount = Amount::new(amount)?;
    let reason: CreditReason = parse_enum(reason, "credit reason")?;

    let memo = ctx.issue_credit(actor, invoice_number, amount, reason, notes)?;

    println!(
        "✅ Issued credit memo {} of {} against {}",
        memo.number, memo.amount, invoice_number
    );
    Ok(())
}

/// Submit a risk assessment for a client
///
/// Factors come in as a JSON array, e.g.
/// `[{"category":"jurisdiction","score":"80","weight":"0.6"}, ...]`
pub fn assess(
    ctx: &mut AppContext,
    actor: &Actor,
    client_id: &str,
    factors_json: &str,
    score: Decimal,
    level: &str,
) -> Result<(), anyhow::Error> {
    let factors: Vec<RiskFactor> = serde_json::from_str(factors_json)
        .map_err(|err| anyhow::anyhow!("Invalid factors JSON: {err}"))?;
    let level = parse_enum(level, "risk level")?;

    let assessment = ctx.submit_assessment(actor, client_id, factors, score, level)?;

    println!(
        "✅ Assessment accepted for {}: score {}, tier {}",
        assessment.client_id, assessment.overall_score, assessment.risk_level
    );
    Ok(())
}

/// Verify the audit journal hash chain
pub fn audit(ctx: &AppContext) -> Result<(), anyhow::Error> {
    match ctx.verify_audit() {
        Ok(count) => {
            println!("✅ Audit chain valid ({} records)", count);
            Ok(())
        }
        Err(err) => {
            println!("❌ Audit chain verification FAILED: {}", err);
            anyhow::bail!("audit chain broken")
        }
    }
}

fn parse_enum<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, anyhow::Error> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Unknown {what}: '{raw}'"))
}
