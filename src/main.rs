use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::prelude::ToPrimitive;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use streakvault::application::engine::{
    CheckInOutcome, CommitmentEngine, CreateCommitment, EngineConfig, RepeatCheckInPolicy,
};
use streakvault::domain::account::{AccountId, Balance};
use streakvault::domain::ports::{Capabilities, Ledger};
use streakvault::error::EscrowError;
use streakvault::infrastructure::clock::ManualClock;
use streakvault::infrastructure::guards::{OwnerGuard, PauseSwitch};
use streakvault::infrastructure::in_memory::{
    InMemoryCommitmentStore, InMemoryLedger, InMemoryLossAccountRegistry, NotificationLog,
};
use streakvault::interfaces::csv::commitment_writer::CommitmentWriter;
use streakvault::interfaces::csv::operation_reader::{OpType, Operation, OperationReader};

/// Well-known ledger accounts of a replay session.
const OWNER: AccountId = 0;
const TREASURY: AccountId = 1;
const VAULT: AccountId = 2;

/// Replays a commitment-escrow operation script against a fresh in-memory
/// engine on a manual clock (the `at` column drives time) and prints the
/// final commitment table. Account 0 is the owner, 1 the treasury, 2 the
/// escrow vault.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Rake rate applied at engine start, in basis points
    #[arg(long, default_value_t = 250)]
    rake_basis_points: u32,
}

async fn dispatch(
    engine: &CommitmentEngine,
    ledger: &InMemoryLedger,
    op: Operation,
) -> streakvault::error::Result<()> {
    match op.op {
        OpType::Fund => {
            let amount = require(op.amount, "amount")?;
            ledger.credit(op.caller, Balance::new(amount)).await
        }
        OpType::Register => {
            let account = require(op.account, "account")?;
            engine.add_loss_account(op.caller, account).await
        }
        OpType::Rake => {
            let basis_points = require(op.amount, "amount")?
                .to_u32()
                .ok_or_else(|| EscrowError::validation("amount", "not a basis-point value"))?;
            engine.set_rake_basis_points(op.caller, basis_points).await
        }
        OpType::Create => {
            let request = CreateCommitment {
                target_days: require(op.days, "days")?,
                loss_account: require(op.account, "account")?,
                start_date: require(op.start, "start")?,
                title: require(op.title, "title")?,
                deposit: require(op.amount, "amount")?,
            };
            engine.create_commitment(op.caller, request).await.map(|_| ())
        }
        OpType::Checkin => {
            let id = require(op.id, "id")?;
            let outcome = engine.check_in(op.caller, id).await?;
            if outcome == CheckInOutcome::Failed {
                tracing::warn!(commitment = id, "check-in detected a missed day");
            }
            Ok(())
        }
        OpType::Finalize => engine.finalize(require(op.id, "id")?).await,
        OpType::Claim => engine.claim_all(op.caller).await.map(|_| ()),
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> streakvault::error::Result<T> {
    value.ok_or_else(|| EscrowError::validation(field, "column is required for this operation"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let ledger = InMemoryLedger::new();
    let clock = ManualClock::new(0);
    let engine = CommitmentEngine::new(
        Box::new(InMemoryCommitmentStore::new()),
        Box::new(ledger.clone()),
        Box::new(InMemoryLossAccountRegistry::new()),
        Box::new(NotificationLog::new()),
        Capabilities {
            clock: Box::new(clock.clone()),
            pause: Box::new(PauseSwitch::new()),
            access: Box::new(OwnerGuard::new(OWNER)),
        },
        VAULT,
        EngineConfig {
            rake_basis_points: cli.rake_basis_points,
            treasury: TREASURY,
            repeat_check_in: RepeatCheckInPolicy::default(),
        },
    );

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Some(at) = op.at {
                    clock.set(at);
                }
                if let Err(e) = dispatch(&engine, &ledger, op).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state
    let commitments = engine.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = CommitmentWriter::new(stdout.lock());
    writer.write_commitments(commitments).into_diagnostic()?;

    Ok(())
}
