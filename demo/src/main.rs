//! QUAESTOR — Admin Audit Chain Demo CLI
//!
//! Builds tamper-evident audit chains from realistic admin-console actions
//! using the real QUAESTOR components (digest backend, chain log, diagnostic
//! sink) and demonstrates chain verification, tamper detection, and segment
//! re-seeding.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- chain
//!   cargo run -p demo -- tamper
//!   cargo run -p demo -- reseed

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quaestor_audit::{select_backend, verify_chain, AuditChainLog, Sha256Backend, TracingSink};
use quaestor_contracts::{ActorRole, AuditEvent, AuditEventInput, AuditResult};

// ── CLI definition ────────────────────────────────────────────────────────────

/// QUAESTOR — tamper-evident audit chain demo.
///
/// Each subcommand exercises the audit chain the way the admin console's
/// backend does: build records for privileged actions, verify the chain,
/// and show how any retroactive alteration is detected.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "QUAESTOR admin audit chain demo",
    long_about = "Builds hash-chained audit records for administrative actions and\n\
                  demonstrates chain verification, tamper detection, and re-seeding."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Build a chain of admin actions and verify it.
    Chain,
    /// Tamper with a stored record and watch verification fail.
    Tamper,
    /// Continue a chain segment from an externally persisted tip.
    Reseed,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging for the TracingSink output. RUST_LOG=debug for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Chain => run_chain(),
        Command::Tamper => run_tamper(),
        Command::Reseed => run_reseed(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> AuditResult<()> {
    run_chain()?;
    run_tamper()?;
    run_reseed()?;
    Ok(())
}

// ── Sample actions ────────────────────────────────────────────────────────────

/// A realistic slice of one afternoon in the admin console.
fn sample_actions() -> Vec<AuditEventInput> {
    vec![
        AuditEventInput {
            actor_id: "u-100".to_string(),
            actor_role: ActorRole::SystemAdmin,
            action: "vendor.suspend".to_string(),
            resource: "vendor_42".to_string(),
            actor_email: Some("root@platform.example".to_string()),
            metadata: Some(json!({ "reason": "chargeback fraud", "ticket": "T-5513" })),
        },
        AuditEventInput {
            actor_id: "u-214".to_string(),
            actor_role: ActorRole::ComplianceOfficer,
            action: "vendor.reinstate".to_string(),
            resource: "vendor_42".to_string(),
            actor_email: Some("compliance@platform.example".to_string()),
            metadata: Some(json!({ "case": "CASE-881", "note": "appeal upheld" })),
        },
        AuditEventInput {
            actor_id: "u-307".to_string(),
            actor_role: ActorRole::AiManager,
            action: "pricing.override".to_string(),
            resource: "sku_9913".to_string(),
            actor_email: None,
            metadata: Some(json!({ "old_price": 1999, "new_price": 1499 })),
        },
        AuditEventInput {
            actor_id: "u-118".to_string(),
            actor_role: ActorRole::OpsAnalyst,
            action: "kyc.approve".to_string(),
            resource: "vendor_57".to_string(),
            actor_email: None,
            metadata: None,
        },
        AuditEventInput {
            actor_id: "u-521".to_string(),
            actor_role: ActorRole::SupportAgent,
            action: "order.refund".to_string(),
            resource: "order_7741".to_string(),
            actor_email: Some("support@platform.example".to_string()),
            metadata: Some(json!({ "amount_cents": 3250 })),
        },
    ]
}

fn print_event(index: usize, event: &AuditEvent) {
    println!(
        "  [{}] {:<18} {:<12} prev={}..  hash={}..",
        index,
        event.action,
        event.resource,
        &event.previous_hash[..8],
        &event.hash[..8],
    );
}

// ── Scenario 1: chain building + verification ─────────────────────────────────

fn run_chain() -> AuditResult<()> {
    println!("Scenario: chain");
    println!("---------------");

    let log = AuditChainLog::new(select_backend()?, Box::new(TracingSink));
    println!("  digest backend: {}", log.digest_name());

    let mut events = Vec::new();
    for action in sample_actions() {
        let event = log.record_event(&action)?;
        print_event(events.len(), &event);
        events.push(event);
    }

    let valid = verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events);
    info!(events = events.len(), valid, "chain verification complete");
    println!("  chain of {} events verified: {}", events.len(), valid);
    println!();
    Ok(())
}

// ── Scenario 2: tamper detection ──────────────────────────────────────────────

fn run_tamper() -> AuditResult<()> {
    println!("Scenario: tamper");
    println!("----------------");

    let log = AuditChainLog::new(select_backend()?, Box::new(TracingSink));
    let mut events = Vec::new();
    for action in sample_actions() {
        events.push(log.build_event(&action)?);
    }

    println!(
        "  before tampering: valid = {}",
        verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events)
    );

    // A dishonest admin rewrites history: the suspension becomes a reinstate.
    events[0].action = "vendor.reinstate".to_string();
    println!("  rewrote event [0] action to \"vendor.reinstate\"");

    let valid = verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events);
    println!("  after tampering:  valid = {}", valid);
    println!();
    Ok(())
}

// ── Scenario 3: segment re-seeding ────────────────────────────────────────────

fn run_reseed() -> AuditResult<()> {
    println!("Scenario: reseed");
    println!("----------------");

    // First process lifetime: build a segment, persist the tip externally.
    let first = AuditChainLog::new(select_backend()?, Box::new(TracingSink));
    for action in sample_actions().into_iter().take(2) {
        first.build_event(&action)?;
    }
    let persisted_tip = first.tip();
    println!("  persisted tip after 2 events: {}..", &persisted_tip[..8]);

    // Next process boot: a fresh log continues the chain from that tip.
    let second =
        AuditChainLog::with_seed(select_backend()?, Box::new(TracingSink), &persisted_tip);
    let continuation = second.build_event(&sample_actions()[2])?;

    print_event(2, &continuation);
    println!(
        "  continuation links to persisted tip: {}",
        continuation.previous_hash == persisted_tip
    );
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("QUAESTOR — Tamper-Evident Admin Audit Chain");
    println!("===========================================");
    println!();
    println!("Every privileged admin action becomes a record that commits to its");
    println!("predecessor's SHA-256 hash. Altering any stored record — even one");
    println!("byte — breaks the chain and is detected by verification.");
    println!();
}
