//! Custodia CLI - Main entry point

use clap::{Parser, Subcommand};
use custodia_rpc::{commands, Actor, AppContext, Role};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "custodia")]
#[command(about = "Custodia - Custody receipt & billing integrity engine", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// Acting user id, recorded on issued receipts and audit records
    #[arg(long, default_value = "admin")]
    actor: String,

    /// Roles held by the actor (admin, operations, finance, compliance)
    #[arg(long, default_value = "admin", value_delimiter = ',')]
    roles: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // === Clients and assets ===
    /// Register a new client
    RegisterClient {
        /// Legal name
        name: String,
        /// Two-letter country code
        country: String,
    },

    /// Change a client's compliance status
    SetClientStatus {
        /// Client id
        client: String,
        /// New status (pending, approved, rejected, suspended)
        status: String,
    },

    /// Register an asset held in custody for a client
    RegisterAsset {
        /// Owning client id
        client: String,
        /// Asset description
        name: String,
        /// Declared value
        #[arg(long)]
        value: Decimal,
        /// Asset kind (vehicle, artwork, jewelry, document, equipment, other)
        #[arg(long, default_value = "other")]
        kind: String,
        /// Currency of the declared value
        #[arg(long, default_value = "EUR")]
        currency: String,
    },

    // === Custody receipts ===
    /// Create a draft custody receipt for an asset
    CreateReceipt {
        /// Client id
        client: String,
        /// Asset id
        asset: String,
    },

    /// Advance a receipt through its lifecycle
    AdvanceReceipt {
        /// Receipt number (CR-YYYY-NNNNN)
        number: String,
        /// Target status (draft, approved, issued, in_transit, delivered, closed)
        to: String,
    },

    /// Delete a draft receipt
    DeleteReceipt {
        /// Receipt number
        number: String,
    },

    /// Verify a receipt number, optionally against a printed hash
    VerifyReceipt {
        /// Receipt number
        number: String,
        /// Integrity hash from the printed document
        #[arg(long)]
        hash: Option<String>,
    },

    // === Invoices, payments, credit memos ===
    /// Create an invoice for an approved client
    CreateInvoice {
        /// Client id
        client: String,
        /// Billed amount
        amount: Decimal,
        /// Currency code
        #[arg(long, default_value = "EUR")]
        currency: String,
        /// Custody receipt number this invoice bills for
        #[arg(long)]
        receipt: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Change an invoice's status
    SetInvoiceStatus {
        /// Invoice number (INV-YYYY-NNNNN)
        number: String,
        /// Target status (draft, sent, paid, overdue, cancelled)
        to: String,
    },

    /// Show an invoice with its payments, credits and totals
    ShowInvoice {
        /// Invoice number
        number: String,
    },

    /// Record a payment against an invoice
    RecordPayment {
        /// Invoice number
        invoice: String,
        /// Payment amount
        amount: Decimal,
        /// Payment method (bank_transfer, card, cash, cheque, other)
        #[arg(long, default_value = "bank_transfer")]
        method: String,
        /// External reference, e.g. a bank statement line
        #[arg(long)]
        reference: Option<String>,
    },

    /// Remove a recorded payment
    RemovePayment {
        /// Payment number (PAY-YYYY-NNNNN)
        number: String,
    },

    /// Issue a credit memo against an invoice
    IssueCredit {
        /// Invoice number
        invoice: String,
        /// Credit amount
        amount: Decimal,
        /// Reason (overcharge, return, damage, goodwill, correction)
        #[arg(long, default_value = "correction")]
        reason: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    // === Risk and audit ===
    /// Submit a risk assessment for a client
    Assess {
        /// Client id
        client: String,
        /// Factors as a JSON array of {category, score, weight}
        factors: String,
        /// Claimed overall score (0-100)
        score: Decimal,
        /// Claimed risk tier (low, medium, high)
        level: String,
    },

    /// Verify the audit journal hash chain
    Audit,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let actor = parse_actor(&cli.actor, &cli.roles)?;

    // Create application context
    let mut ctx = AppContext::new(&cli.data)?;

    match cli.command {
        Commands::RegisterClient { name, country } => {
            commands::register_client(&mut ctx, &actor, &name, &country)?;
        }

        Commands::SetClientStatus { client, status } => {
            commands::set_client_status(&mut ctx, &actor, &client, &status)?;
        }

        Commands::RegisterAsset {
            client,
            name,
            value,
            kind,
            currency,
        } => {
            commands::register_asset(&mut ctx, &actor, &client, &name, &kind, value, &currency)?;
        }

        Commands::CreateReceipt { client, asset } => {
            commands::create_receipt(&mut ctx, &actor, &client, &asset)?;
        }

        Commands::AdvanceReceipt { number, to } => {
            commands::advance_receipt(&mut ctx, &actor, &number, &to)?;
        }

        Commands::DeleteReceipt { number } => {
            commands::delete_receipt(&mut ctx, &actor, &number)?;
        }

        Commands::VerifyReceipt { number, hash } => {
            commands::verify_receipt(&ctx, &number, hash.as_deref())?;
        }

        Commands::CreateInvoice {
            client,
            amount,
            currency,
            receipt,
            due,
        } => {
            commands::create_invoice(
                &mut ctx,
                &actor,
                &client,
                amount,
                &currency,
                receipt.as_deref(),
                due.as_deref(),
            )?;
        }

        Commands::SetInvoiceStatus { number, to } => {
            commands::set_invoice_status(&mut ctx, &actor, &number, &to)?;
        }

        Commands::ShowInvoice { number } => {
            commands::show_invoice(&ctx, &number)?;
        }

        Commands::RecordPayment {
            invoice,
            amount,
            method,
            reference,
        } => {
            commands::record_payment(
                &mut ctx,
                &actor,
                &invoice,
                amount,
                &method,
                reference.as_deref(),
            )?;
        }

        Commands::RemovePayment { number } => {
            commands::remove_payment(&mut ctx, &actor, &number)?;
        }

        Commands::IssueCredit {
            invoice,
            amount,
            reason,
            notes,
        } => {
            commands::issue_credit(
                &mut ctx,
                &actor,
                &invoice,
                amount,
                &reason,
                notes.as_deref(),
            )?;
        }

        Commands::Assess {
            client,
            factors,
            score,
            level,
        } => {
            commands::assess(&mut ctx, &actor, &client, &factors, score, &level)?;
        }

        Commands::Audit => {
            commands::audit(&ctx)?;
        }
    }

    Ok(())
}

fn parse_actor(id: &str, raw_roles: &[String]) -> anyhow::Result<Actor> {
    let mut roles = Vec::new();
    for raw in raw_roles {
        let role = Role::from_str(raw.trim())
            .map_err(|_| anyhow::anyhow!("Unknown role: '{raw}'"))?;
        roles.push(role);
    }
    Ok(Actor::new(id, roles))
}
