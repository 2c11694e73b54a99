//! onboarding-runner: headless driver for an onboarding session.
//!
//! Usage:
//!   onboarding-runner --scenario applicant.json [--seed 42] [--config risk.json]
//!   onboarding-runner --ipc-mode [--seed 42] [--config risk.json]
//!
//! Compliance decisions come from the in-process local desk.

use anyhow::Result;
use onboarding_core::{
    CustomerIdGenerator, LocalComplianceService, OnboardingSession, RiskConfig, RiskModel,
    SeededCustomerIds, SessionSnapshot, StepData, StepId, StepSequencer, SubmitOutcome,
    UuidCustomerIds,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetAccountType {
        account_type: onboarding_core::AccountType,
    },
    Update {
        payload: StepData,
    },
    Next,
    Previous,
    GoTo {
        step: StepId,
    },
    Submit,
    Restart,
    Quit,
}

#[derive(serde::Serialize)]
struct Reply<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    submit: Option<&'a str>,
    state: SessionSnapshot,
}

/// Everything needed to build a fresh session on restart.
struct SessionFactory {
    model: RiskModel,
    seed:  Option<u64>,
    ids:   Arc<dyn CustomerIdGenerator>,
}

impl SessionFactory {
    fn new(config: RiskConfig, seed: Option<u64>) -> Self {
        let ids: Arc<dyn CustomerIdGenerator> = match seed {
            Some(seed) => Arc::new(SeededCustomerIds::new(seed)),
            None       => Arc::new(UuidCustomerIds),
        };
        Self {
            model: RiskModel::new(config),
            seed,
            ids,
        }
    }

    fn session(&self) -> OnboardingSession {
        OnboardingSession::new(
            StepSequencer::new(self.model.clone()),
            Arc::new(LocalComplianceService::new(self.model.clone())),
            Arc::clone(&self.ids),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg::<u64>(&args, "--seed");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = string_arg(&args, "--config");
    let scenario = string_arg(&args, "--scenario");

    let config = match config_path {
        Some(path) => RiskConfig::load(path)?,
        None       => RiskConfig::default(),
    };
    let factory = SessionFactory::new(config, seed);

    if ipc_mode {
        return run_ipc_loop(&factory).await;
    }

    let Some(path) = scenario else {
        eprintln!("usage: onboarding-runner (--scenario PATH | --ipc-mode) [--seed N] [--config PATH]");
        std::process::exit(2);
    };

    println!("onboarding-runner");
    println!("  scenario: {path}");
    println!("  seed:     {}", seed.map(|s| s.to_string()).unwrap_or_else(|| "random".into()));
    println!("  config:   {}", config_path.unwrap_or("built-in"));
    println!();

    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let commands: Vec<IpcCommand> = serde_json::from_str(&content)?;

    let mut session = factory.session();
    for command in commands {
        if matches!(command, IpcCommand::Quit) {
            break;
        }
        if let Err(e) = handle_command(&factory, &mut session, command).await {
            log::warn!("command failed: {e}");
        }
    }
    print_summary(&session);
    Ok(())
}

async fn run_ipc_loop(factory: &SessionFactory) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut session = factory.session();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(factory, &mut session, cmd).await {
            Ok(submit) => {
                let reply = Reply {
                    submit,
                    state: session.snapshot(),
                };
                writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
            }
            Err(e) => {
                let err_json = serde_json::json!({
                    "error": e.to_string(),
                    "state": session.snapshot(),
                });
                writeln!(stdout, "{}", err_json)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Apply one command. Returns the submit outcome label for `submit`.
async fn handle_command(
    factory: &SessionFactory,
    session: &mut OnboardingSession,
    cmd: IpcCommand,
) -> Result<Option<&'static str>> {
    match cmd {
        IpcCommand::GetState | IpcCommand::Quit => {}
        IpcCommand::SetAccountType { account_type } => session.set_account_type(account_type),
        IpcCommand::Update { payload } => session.update(payload),
        IpcCommand::Next => {
            session.next();
        }
        IpcCommand::Previous => {
            session.previous();
        }
        IpcCommand::GoTo { step } => {
            session.go_to(step);
        }
        IpcCommand::Submit => {
            let label = match session.submit().await? {
                SubmitOutcome::Submitted(_)     => "submitted",
                SubmitOutcome::AlreadyCompleted => "already_completed",
                SubmitOutcome::AlreadyInFlight  => "already_in_flight",
            };
            return Ok(Some(label));
        }
        IpcCommand::Restart => {
            log::info!("restarting onboarding (seed={:?})", factory.seed);
            *session = factory.session();
        }
    }
    Ok(None)
}

fn print_summary(session: &OnboardingSession) {
    let snapshot = session.snapshot();
    let assessment = &snapshot.risk_assessment;

    println!("=== SESSION SUMMARY ===");
    println!("  account type:  {}", snapshot.account_type.as_str());
    println!("  current step:  {}", snapshot.current_step);
    println!("  progress:      {}%", snapshot.progress);
    println!(
        "  sequence:      {}",
        snapshot
            .sequence
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    );
    let missing: Vec<&str> = snapshot
        .sequence
        .iter()
        .copied()
        .filter(|s| !matches!(s, StepId::Review | StepId::Completed))
        .filter(|s| !snapshot.data.has(*s))
        .map(|s| s.as_str())
        .collect();
    println!(
        "  missing data:  {}",
        if missing.is_empty() { "(none)".to_string() } else { missing.join(", ") }
    );
    println!("  customer id:   {}", snapshot.customer_id.as_deref().unwrap_or("(none)"));
    if let Some(error) = &snapshot.error {
        println!("  error:         {error}");
    }

    println!();
    println!("=== RISK ASSESSMENT ===");
    println!(
        "  score: {} | level: {} | auto-approved: {}",
        assessment.overall_score,
        assessment.risk_level.as_str(),
        assessment.auto_approved
    );
    for factor in &assessment.factors {
        println!("  {:<22} {:>3}  {}", factor.label, factor.score, factor.description);
    }

    if let Some(result) = &snapshot.compliance_result {
        println!();
        println!("=== COMPLIANCE ===");
        println!("  status: {:?}", result.status);
        if let Some(message) = &result.message {
            println!("  message: {message}");
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    string_arg(args, flag).and_then(|v| v.parse().ok())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
