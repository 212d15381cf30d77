//! Application context - wires everything together
//!
//! Every mutation follows the same shape: authorize the actor, run one
//! store transaction, then append to the audit journal once the
//! transaction has committed. A failed transaction therefore leaves no
//! journal record, and a journal record always describes committed
//! state.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use custodia_audit::{verify_chain, AuditError, AuditEvent, AuditJournal, AuditReader};
use custodia_core::{Amount, Asset, AssetKind, Client, ComplianceStatus, Currency, RiskTier};
use custodia_ledger::{
    apply_payment, apply_payment_removal, change_status, check_credit, outstanding_balance,
    total_of, CreditMemo, CreditReason, DocumentKind, Invoice, InvoiceStatus, LedgerError,
    Payment, PaymentMethod,
};
use custodia_receipt::{
    advance, build_report, ensure_deletable, CustodyReceipt, ReceiptError, ReceiptStatus,
    VerificationReport,
};
use custodia_risk::{validate_assessment, RiskAssessment, RiskConfig, RiskError, RiskFactor};
use custodia_store::{Datastore, StoreError};

use crate::auth::{self, Actor, AuthError};

/// An invoice together with its settlement history and derived totals.
#[derive(Debug)]
pub struct InvoiceStatement {
    pub invoice: Invoice,
    pub payments: Vec<Payment>,
    pub credits: Vec<CreditMemo>,
    pub paid_total: Amount,
    pub credit_total: Amount,
    pub outstanding: Amount,
}

/// Application context - open store, journal and risk configuration for
/// one data directory.
pub struct AppContext {
    store: Datastore,
    journal: AuditJournal,
    pub risk_config: RiskConfig,
    db_path: PathBuf,
    journal_path: PathBuf,
}

impl AppContext {
    /// Open (or initialize) a data directory.
    ///
    /// Layout: `custodia.db` holds the records, `journal/` holds the
    /// hash-chained audit log, and an optional `risk.json` overrides
    /// the assessment validation tolerances.
    pub fn new(data_path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let data_path = data_path.as_ref();
        let db_path = data_path.join("custodia.db");
        let journal_path = data_path.join("journal");
        let config_path = data_path.join("risk.json");

        // Create directories
        std::fs::create_dir_all(&journal_path)?;

        // Initialize components
        let store = Datastore::open(&db_path)?;
        let journal = AuditJournal::open(&journal_path)?;
        let risk_config = if config_path.exists() {
            RiskConfig::from_file(&config_path)?
        } else {
            RiskConfig::default()
        };

        Ok(Self {
            store,
            journal,
            risk_config,
            db_path,
            journal_path,
        })
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Get journal path
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Sequence the next audit record will carry
    pub fn next_audit_sequence(&self) -> u64 {
        self.journal.next_sequence()
    }

    // --- Clients and assets -------------------------------------------

    pub fn register_client(
        &mut self,
        actor: &Actor,
        name: &str,
        country: &str,
    ) -> Result<Client, OpError> {
        auth::require_role(actor, auth::OPERATIONS)?;

        let client = Client::new(name, country);
        self.store.immediate_tx(|tx| tx.insert_client(&client))?;

        self.journal.append(
            &actor.id,
            AuditEvent::ClientRegistered {
                client_id: client.id.clone(),
                name: client.name.clone(),
            },
        )?;
        info!(client_id = %client.id, name = %client.name, "client registered");
        Ok(client)
    }

    pub fn set_client_status(
        &mut self,
        actor: &Actor,
        client_id: &str,
        status: ComplianceStatus,
    ) -> Result<Client, OpError> {
        auth::require_role(actor, auth::COMPLIANCE)?;

        let (client, previous) =
            self.store
                .immediate_tx(|tx| -> Result<(Client, ComplianceStatus), OpError> {
                    let mut client = tx.get_client(client_id)?;
                    let previous = client.compliance_status;
                    client.compliance_status = status;
                    tx.update_client(&client)?;
                    Ok((client, previous))
                })?;

        self.journal.append(
            &actor.id,
            AuditEvent::ClientStatusChanged {
                client_id: client.id.clone(),
                from: previous.to_string(),
                to: status.to_string(),
            },
        )?;
        info!(client_id = %client.id, from = %previous, to = %status, "client status changed");
        Ok(client)
    }

    pub fn register_asset(
        &mut self,
        actor: &Actor,
        client_id: &str,
        name: &str,
        kind: AssetKind,
        declared_value: Amount,
        currency: Currency,
    ) -> Result<Asset, OpError> {
        auth::require_role(actor, auth::OPERATIONS)?;

        let asset = self.store.immediate_tx(|tx| -> Result<Asset, OpError> {
            let client = tx.get_client(client_id)?;
            let asset = Asset::new(&client.id, name, kind, declared_value, currency);
            tx.insert_asset(&asset)?;
            Ok(asset)
        })?;

        self.journal.append(
            &actor.id,
            AuditEvent::AssetRegistered {
                asset_id: asset.id.clone(),
                client_id: asset.client_id.clone(),
            },
        )?;
        info!(asset_id = %asset.id, client_id = %asset.client_id, name = %asset.name, "asset registered");
        Ok(asset)
    }

    // --- Custody receipts ---------------------------------------------

    pub fn create_receipt(
        &mut self,
        actor: &Actor,
        client_id: &str,
        asset_id: &str,
    ) -> Result<CustodyReceipt, OpError> {
        auth::require_role(actor, auth::OPERATIONS)?;

        let receipt = self
            .store
            .immediate_tx(|tx| -> Result<CustodyReceipt, OpError> {
                let client = tx.get_client(client_id)?;
                let asset = tx.get_asset(asset_id)?;
                if asset.client_id != client.id {
                    return Err(OpError::AssetClientMismatch {
                        asset_id: asset.id,
                        client_id: client.id,
                    });
                }

                let number = tx.next_document_number(DocumentKind::Receipt, Utc::now().year())?;
                let receipt = CustodyReceipt::new(number.to_string(), &client.id, &asset.id);
                tx.insert_receipt(&receipt)?;
                Ok(receipt)
            })?;

        self.journal.append(
            &actor.id,
            AuditEvent::ReceiptCreated {
                receipt_id: receipt.id.clone(),
                number: receipt.number.clone(),
            },
        )?;
        info!(number = %receipt.number, client_id = %receipt.client_id, "custody receipt created");
        Ok(receipt)
    }

    pub fn advance_receipt(
        &mut self,
        actor: &Actor,
        number: &str,
        to: ReceiptStatus,
    ) -> Result<CustodyReceipt, OpError> {
        auth::require_role(actor, auth::OPERATIONS)?;

        let (receipt, from) =
            self.store
                .immediate_tx(|tx| -> Result<(CustodyReceipt, ReceiptStatus), OpError> {
                    let mut receipt = tx
                        .find_receipt_by_number(number)?
                        .ok_or_else(|| StoreError::not_found("receipt", number))?;
                    let from = receipt.status;
                    advance(&mut receipt, to, &actor.id)?;
                    tx.update_receipt(&receipt)?;
                    Ok((receipt, from))
                })?;

        self.journal.append(
            &actor.id,
            AuditEvent::ReceiptAdvanced {
                receipt_id: receipt.id.clone(),
                number: receipt.number.clone(),
                from: from.to_string(),
                to: to.to_string(),
            },
        )?;
        info!(number = %receipt.number, from = %from, to = %to, "receipt advanced");
        Ok(receipt)
    }

    pub fn delete_receipt(
        &mut self,
        actor: &Actor,
        number: &str,
    ) -> Result<CustodyReceipt, OpError> {
        auth::require_role(actor, auth::OPERATIONS)?;

        let receipt = self
            .store
            .immediate_tx(|tx| -> Result<CustodyReceipt, OpError> {
                let receipt = tx
                    .find_receipt_by_number(number)?
                    .ok_or_else(|| StoreError::not_found("receipt", number))?;
                ensure_deletable(&receipt)?;
                tx.delete_receipt(&receipt.id)?;
                Ok(receipt)
            })?;

        self.journal.append(
            &actor.id,
            AuditEvent::ReceiptDeleted {
                receipt_id: receipt.id.clone(),
                number: receipt.number.clone(),
            },
        )?;
        info!(number = %receipt.number, "receipt deleted");
        Ok(receipt)
    }

    /// Answer a verification request for a receipt number.
    ///
    /// Unknown numbers and receipts that have not reached issuance get
    /// the same opaque "not verifiable" report, so the endpoint cannot
    /// be used to probe which numbers exist. No role is required.
    pub fn verify_receipt(
        &self,
        number: &str,
        supplied_hash: Option<&str>,
    ) -> Result<VerificationReport, OpError> {
        let records = self.store.read();
        let Some(receipt) = records.find_receipt_by_number(number)? else {
            return Ok(VerificationReport::not_verifiable(number));
        };
        let client = records.get_client(&receipt.client_id)?;
        let asset = records.get_asset(&receipt.asset_id)?;
        Ok(build_report(&receipt, &client, &asset, supplied_hash))
    }

    // --- Invoices, payments, credit memos -----------------------------

    pub fn create_invoice(
        &mut self,
        actor: &Actor,
        client_id: &str,
        amount: Amount,
        currency: Currency,
        receipt_ref: Option<&str>,
        due_date: Option<NaiveDate>,
    ) -> Result<Invoice, OpError> {
        auth::require_role(actor, auth::FINANCE)?;

        let invoice = self.store.immediate_tx(|tx| -> Result<Invoice, OpError> {
            let client = tx.get_client(client_id)?;
            if client.compliance_status != ComplianceStatus::Approved {
                return Err(OpError::ClientNotApproved {
                    client_id: client.id,
                    status: client.compliance_status,
                });
            }
            if let Some(reference) = receipt_ref {
                let receipt = tx
                    .find_receipt_by_number(reference)?
                    .ok_or_else(|| StoreError::not_found("receipt", reference))?;
                if receipt.client_id != client.id {
                    return Err(OpError::ReceiptClientMismatch {
                        number: receipt.number,
                        client_id: client.id,
                    });
                }
            }

            let number = tx.next_document_number(DocumentKind::Invoice, Utc::now().year())?;
            let mut invoice = Invoice::new(number.to_string(), &client.id, amount, currency)?;
            invoice.receipt_ref = receipt_ref.map(str::to_string);
            invoice.due_date = due_date;
            tx.insert_invoice(&invoice)?;
            Ok(invoice)
        })?;

        self.journal.append(
            &actor.id,
            AuditEvent::InvoiceCreated {
                invoice_id: invoice.id.clone(),
                number: invoice.number.clone(),
                client_id: invoice.client_id.clone(),
                amount: invoice.amount.to_string(),
            },
        )?;
        info!(number = %invoice.number, client_id = %invoice.client_id, amount = %invoice.amount, "invoice created");
        Ok(invoice)
    }

    pub fn set_invoice_status(
        &mut self,
        actor: &Actor,
        number: &str,
        to: InvoiceStatus,
    ) -> Result<Invoice, OpError> {
        auth::require_role(actor, auth::FINANCE)?;

        let (invoice, from) =
            self.store
                .immediate_tx(|tx| -> Result<(Invoice, InvoiceStatus), OpError> {
                    let mut invoice = tx
                        .find_invoice_by_number(number)?
                        .ok_or_else(|| StoreError::not_found("invoice", number))?;
                    let from = invoice.status;
                    change_status(&mut invoice, to)?;
                    tx.update_invoice(&invoice)?;
                    Ok((invoice, from))
                })?;

        self.journal.append(
            &actor.id,
            AuditEvent::InvoiceStatusChanged {
                invoice_id: invoice.id.clone(),
                number: invoice.number.clone(),
                from: from.to_string(),
                to: to.to_string(),
            },
        )?;
        info!(number = %invoice.number, from = %from, to = %to, "invoice status changed");
        Ok(invoice)
    }

    /// Record a payment against an invoice.
    ///
    /// Flow: Authorize → Reconcile → Persist → Journal
    pub fn record_payment(
        &mut self,
        actor: &Actor,
        invoice_number: &str,
        amount: Amount,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<(Payment, Invoice), OpError> {
        auth::require_role(actor, auth::FINANCE)?;

        let result =
            self.store
                .immediate_tx(|tx| -> Result<(Payment, Invoice, InvoiceStatus), OpError> {
                    // 1. Load the invoice and its committed payment total
                    let mut invoice = tx
                        .find_invoice_by_number(invoice_number)?
                        .ok_or_else(|| StoreError::not_found("invoice", invoice_number))?;
                    let previous = invoice.status;
                    let applied: Vec<Amount> = tx
                        .payments_for_invoice(&invoice.id)?
                        .iter()
                        .map(|p| p.amount)
                        .collect();

                    // 2. Reconcile; flips the invoice to paid on exact settlement
                    apply_payment(&mut invoice, total_of(&applied), amount)?;

                    // 3. Persist the payment and the invoice together
                    let number =
                        tx.next_document_number(DocumentKind::Payment, Utc::now().year())?;
                    let mut payment = Payment::new(number.to_string(), &invoice.id, amount, method);
                    payment.reference = reference.map(str::to_string);
                    tx.insert_payment(&payment)?;
                    tx.update_invoice(&invoice)?;
                    Ok((payment, invoice, previous))
                });

        let (payment, invoice, previous) = match result {
            Ok(value) => value,
            Err(err) => {
                warn!(invoice = %invoice_number, amount = %amount, error = %err, "payment rejected");
                return Err(err);
            }
        };

        // 4. Journal the payment, and the settlement flip when it happened
        self.journal.append(
            &actor.id,
            AuditEvent::PaymentRecorded {
                payment_id: payment.id.clone(),
                number: payment.number.clone(),
                invoice_id: payment.invoice_id.clone(),
                amount: payment.amount.to_string(),
            },
        )?;
        if invoice.status == InvoiceStatus::Paid && previous != InvoiceStatus::Paid {
            self.journal.append(
                &actor.id,
                AuditEvent::InvoiceStatusChanged {
                    invoice_id: invoice.id.clone(),
                    number: invoice.number.clone(),
                    from: previous.to_string(),
                    to: invoice.status.to_string(),
                },
            )?;
        }
        info!(
            payment = %payment.number,
            invoice = %invoice.number,
            amount = %payment.amount,
            settled = invoice.status == InvoiceStatus::Paid,
            "payment recorded"
        );
        Ok((payment, invoice))
    }

    /// Remove a recorded payment, reverting a paid invoice to sent when
    /// the remaining total drops below the billed amount.
    pub fn remove_payment(
        &mut self,
        actor: &Actor,
        payment_number: &str,
    ) -> Result<(Payment, Invoice), OpError> {
        auth::require_role(actor, auth::FINANCE)?;

        let (payment, invoice, reverted) =
            self.store
                .immediate_tx(|tx| -> Result<(Payment, Invoice, bool), OpError> {
                    let payment = tx
                        .find_payment_by_number(payment_number)?
                        .ok_or_else(|| StoreError::not_found("payment", payment_number))?;
                    let mut invoice = tx.get_invoice(&payment.invoice_id)?;

                    tx.delete_payment(&payment.id)?;
                    let remaining: Vec<Amount> = tx
                        .payments_for_invoice(&invoice.id)?
                        .iter()
                        .map(|p| p.amount)
                        .collect();
                    let outcome = apply_payment_removal(&mut invoice, total_of(&remaining));
                    tx.update_invoice(&invoice)?;
                    Ok((payment, invoice, outcome.reverts_to_sent))
                })?;

        self.journal.append(
            &actor.id,
            AuditEvent::PaymentRemoved {
                payment_id: payment.id.clone(),
                invoice_id: payment.invoice_id.clone(),
                reverted_to_sent: reverted,
            },
        )?;
        info!(payment = %payment.number, invoice = %invoice.number, reverted_to_sent = reverted, "payment removed");
        Ok((payment, invoice))
    }

    /// Issue a credit memo against an invoice. Credits cap at the
    /// billed amount independently of payments.
    pub fn issue_credit(
        &mut self,
        actor: &Actor,
        invoice_number: &str,
        amount: Amount,
        reason: CreditReason,
        notes: Option<&str>,
    ) -> Result<CreditMemo, OpError> {
        auth::require_role(actor, auth::FINANCE)?;

        let result = self.store.immediate_tx(|tx| -> Result<CreditMemo, OpError> {
            let invoice = tx
                .find_invoice_by_number(invoice_number)?
                .ok_or_else(|| StoreError::not_found("invoice", invoice_number))?;
            let issued: Vec<Amount> = tx
                .credit_memos_for_invoice(&invoice.id)?
                .iter()
                .map(|m| m.amount)
                .collect();
            check_credit(&invoice, total_of(&issued), amount)?;

            let number = tx.next_document_number(DocumentKind::CreditMemo, Utc::now().year())?;
            let mut memo = CreditMemo::new(number.to_string(), &invoice.id, amount, reason);
            memo.notes = notes.map(str::to_string);
            tx.insert_credit_memo(&memo)?;
            Ok(memo)
        });

        let memo = match result {
            Ok(memo) => memo,
            Err(err) => {
                warn!(invoice = %invoice_number, amount = %amount, error = %err, "credit memo rejected");
                return Err(err);
            }
        };

        self.journal.append(
            &actor.id,
            AuditEvent::CreditIssued {
                memo_id: memo.id.clone(),
                number: memo.number.clone(),
                invoice_id: memo.invoice_id.clone(),
                amount: memo.amount.to_string(),
            },
        )?;
        info!(memo = %memo.number, invoice = %invoice_number, amount = %memo.amount, "credit memo issued");
        Ok(memo)
    }

    /// Assemble an invoice with its payments, credits and derived
    /// totals. Read-only, no role required.
    pub fn invoice_statement(&self, number: &str) -> Result<InvoiceStatement, OpError> {
        let records = self.store.read();
        let invoice = records
            .find_invoice_by_number(number)?
            .ok_or_else(|| StoreError::not_found("invoice", number))?;
        let payments = records.payments_for_invoice(&invoice.id)?;
        let credits = records.credit_memos_for_invoice(&invoice.id)?;

        let paid: Vec<Amount> = payments.iter().map(|p| p.amount).collect();
        let credited: Vec<Amount> = credits.iter().map(|m| m.amount).collect();
        let paid_total = total_of(&paid);
        let credit_total = total_of(&credited);
        let outstanding = outstanding_balance(invoice.amount, paid_total, credit_total);

        Ok(InvoiceStatement {
            invoice,
            payments,
            credits,
            paid_total,
            credit_total,
            outstanding,
        })
    }

    // --- Risk assessments ---------------------------------------------

    /// Accept a risk assessment for a client.
    ///
    /// The claimed score and tier are recomputed from the factors and
    /// rejected on drift beyond the configured tolerances. Acceptance
    /// stores the assessment and overwrites the client tier in the same
    /// transaction.
    pub fn submit_assessment(
        &mut self,
        actor: &Actor,
        client_id: &str,
        factors: Vec<RiskFactor>,
        overall_score: Decimal,
        risk_level: RiskTier,
    ) -> Result<RiskAssessment, OpError> {
        auth::require_role(actor, auth::COMPLIANCE)?;

        if let Err(err) =
            validate_assessment(&factors, overall_score, risk_level, &self.risk_config)
        {
            warn!(client_id, error = %err, "assessment rejected");
            return Err(err.into());
        }

        let assessment = RiskAssessment::new(
            client_id,
            factors,
            overall_score,
            risk_level,
            actor.id.as_str(),
        );
        self.store.immediate_tx(|tx| -> Result<(), OpError> {
            let mut client = tx.get_client(client_id)?;
            tx.insert_assessment(&assessment)?;
            client.risk_tier = assessment.risk_level;
            tx.update_client(&client)?;
            Ok(())
        })?;

        self.journal.append(
            &actor.id,
            AuditEvent::AssessmentAccepted {
                assessment_id: assessment.id.clone(),
                client_id: assessment.client_id.clone(),
                risk_level: assessment.risk_level.to_string(),
            },
        )?;
        info!(
            client_id = %assessment.client_id,
            risk_level = %assessment.risk_level,
            score = %assessment.overall_score,
            "assessment accepted"
        );
        Ok(assessment)
    }

    // --- Audit --------------------------------------------------------

    /// Re-read the whole journal and verify the hash chain. Returns the
    /// number of verified records.
    pub fn verify_audit(&self) -> Result<usize, OpError> {
        let reader = AuditReader::from_directory(&self.journal_path)?;
        let records = reader.read_all()?;
        verify_chain(&records).map_err(AuditError::from)?;
        Ok(records.len())
    }
}

/// Errors surfaced by application operations
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Receipt error: {0}")]
    Receipt(#[from] ReceiptError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Client {client_id} is {status}; invoicing requires an approved client")]
    ClientNotApproved {
        client_id: String,
        status: ComplianceStatus,
    },

    #[error("Asset {asset_id} does not belong to client {client_id}")]
    AssetClientMismatch { asset_id: String, client_id: String },

    #[error("Receipt {number} does not belong to client {client_id}")]
    ReceiptClientMismatch { number: String, client_id: String },
}
