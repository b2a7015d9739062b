//! hrsync: HR/Payroll sync command-line client
//!
//! Commands:
//!   employees [--department <id>] [--search <text>]  - list employees
//!   employee <id>                                    - show one employee
//!   departments                                      - list departments
//!   sync check                                       - compare HR and Payroll
//!   sync execute <id>... | --all                     - push HR records to Payroll
//!   config show                                      - display current configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use hrsync_core::config::{HrSyncConfig, LogConfig};
use hrsync_core::types::{
    Department, Employee, EmployeeDetail, EmployeeFilters, EmployeeId, SyncResult,
    SyncStatusSummary,
};
use hrsync_gateway::{HrGateway, HttpGateway, MemoryGateway};
use hrsync_state::{CheckOutcome, EmployeeDirectory, FetchOutcome, SyncCenter, SyncWorkflow};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "hrsync",
    version,
    about = "HR/Payroll sync client",
    long_about = "hrsync: browse the HR employee directory and reconcile it with Payroll"
)]
struct Cli {
    /// Path to hrsync.toml configuration file
    #[arg(long, short = 'c', env = "HRSYNC_CONFIG", default_value = "/etc/hrsync/config.toml")]
    config: PathBuf,

    /// Override api.base_url from the config file
    #[arg(long, env = "HRSYNC_BASE_URL")]
    base_url: Option<String>,

    /// Run against built-in sample data instead of a backend
    #[arg(long)]
    demo: bool,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); overrides log.level
    #[arg(long, env = "HRSYNC_LOG")]
    log: Option<String>,

    /// Log format (json, text); overrides log.format
    #[arg(long, env = "HRSYNC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List employees, optionally filtered
    Employees {
        /// Only employees of this department id
        #[arg(long, short = 'd')]
        department: Option<i64>,
        /// Case-insensitive name search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show the full record of one employee
    Employee {
        /// Employee id
        id: EmployeeId,
    },

    /// List departments with their employee counts
    Departments,

    /// HR to Payroll synchronization
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum SyncAction {
    /// Compare HR with Payroll and list the employees that differ
    Check,

    /// Push the given employees from HR to Payroll, then re-check
    Execute {
        /// Employee ids to sync
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<EmployeeId>,
        /// Sync every employee the check reports as pending
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = HrSyncConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;
    let (level, format) = log_settings(&cli, loaded.as_ref().map(|c| &c.log));
    init_logging(&level, &format);
    if loaded.is_none() {
        warn!("config file not found: {}  (using defaults)", cli.config.display());
    }

    let mut config = loaded.unwrap_or_default();
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
        config.validate().context("invalid --base-url")?;
    }

    let backend = if cli.demo { "demo" } else { config.api.base_url.as_str() };
    info!(version = env!("CARGO_PKG_VERSION"), backend, "hrsync starting");
    let gateway = || build_gateway(&config, cli.demo);

    match cli.command {
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
        Commands::Employees { department, search } => {
            let filters = EmployeeFilters {
                department_id: department,
                search: search.unwrap_or_default(),
            };
            cmd_employees(gateway()?, filters, cli.json).await
        }
        Commands::Employee { id } => cmd_employee(gateway()?, id, cli.json).await,
        Commands::Departments => cmd_departments(gateway()?, cli.json).await,
        Commands::Sync { action: SyncAction::Check } => cmd_sync_check(gateway()?, cli.json).await,
        Commands::Sync { action: SyncAction::Execute { ids, all } } => {
            cmd_sync_execute(gateway()?, &config, ids, all, cli.json).await
        }
    }
}

fn build_gateway(config: &HrSyncConfig, demo: bool) -> Result<Arc<dyn HrGateway>> {
    if demo {
        return Ok(Arc::new(MemoryGateway::demo()));
    }
    let gw = HttpGateway::new(&config.api).context("building HTTP client")?;
    Ok(Arc::new(gw))
}

/// Flags win over the config file. Without either the CLI stays at `warn`
/// so stderr is quiet next to command output.
fn log_settings(cli: &Cli, file: Option<&LogConfig>) -> (String, LogFormat) {
    let level = cli
        .log
        .clone()
        .or_else(|| file.map(|l| l.level.clone()))
        .unwrap_or_else(|| "warn".into());
    let format = cli.log_format.clone().unwrap_or_else(|| match file {
        Some(l) if l.format == "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    (level, format)
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output, logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Progress helpers ──────────────────────────────────────────────────────────

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serializing output")?
    );
    Ok(())
}

// ── `hrsync employees` ────────────────────────────────────────────────────────

async fn cmd_employees(
    gateway: Arc<dyn HrGateway>,
    filters: EmployeeFilters,
    json: bool,
) -> Result<()> {
    let directory = EmployeeDirectory::new(gateway);
    let pb = make_spinner("employees");
    pb.set_message("loading…");
    let outcome = directory.fetch_employees(filters).await;
    pb.finish_and_clear();

    if let FetchOutcome::Failed(err) = outcome {
        anyhow::bail!("listing employees: {err}");
    }
    let state = directory.snapshot();
    if json {
        return print_json(&state.employees);
    }

    if state.employees.is_empty() {
        println!("No employees match the given filters.");
        return Ok(());
    }
    println!("{}", employee_header());
    for e in &state.employees {
        println!("{}", employee_row(e));
    }
    println!();
    println!(
        "{} employees, {} synced, {} need sync",
        state.employees.len(),
        state.count_with_status(hrsync_core::types::SyncStatus::Synced),
        state.count_with_status(hrsync_core::types::SyncStatus::NeedsSync),
    );
    Ok(())
}

fn employee_header() -> String {
    format!(
        "{:>6}  {:<24} {:<18} {:<20} {:<10} {:<11} {}",
        "ID", "NAME", "DEPARTMENT", "POSITION", "STATUS", "SYNC", "HIRED"
    )
}

fn employee_row(e: &Employee) -> String {
    format!(
        "{:>6}  {:<24} {:<18} {:<20} {:<10} {:<11} {}",
        e.employee_id,
        truncate(&e.full_name, 24),
        truncate(e.department_label(), 18),
        truncate(e.position_label(), 20),
        e.status.as_str(),
        e.sync_status.as_str(),
        e.hire_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

// ── `hrsync employee` ─────────────────────────────────────────────────────────

async fn cmd_employee(gateway: Arc<dyn HrGateway>, id: EmployeeId, json: bool) -> Result<()> {
    let detail = gateway
        .get_employee(id)
        .await
        .with_context(|| format!("fetching employee {id}"))?;
    if json {
        return print_json(&detail);
    }
    print_detail(&detail);
    Ok(())
}

fn print_detail(d: &EmployeeDetail) {
    fn opt<T: ToString>(v: &Option<T>) -> String {
        v.as_ref()
            .map(|x| x.to_string())
            .unwrap_or_else(|| "-".into())
    }

    println!("Employee #{}: {}", d.employee_id, d.full_name);
    println!("  department:  {}", opt(&d.department_name));
    println!("  position:    {}", opt(&d.position_name));
    println!("  status:      {}", d.status.as_str());
    println!("  sync:        {}", d.sync_status.as_str());
    println!("  hired:       {}", opt(&d.hire_date));
    println!("  born:        {}", opt(&d.date_of_birth));
    println!("  gender:      {}", opt(&d.gender));
    println!("  phone:       {}", opt(&d.phone_number));
    println!("  email:       {}", opt(&d.email));
    println!("  updated:     {}", opt(&d.updated_at));
}

// ── `hrsync departments` ──────────────────────────────────────────────────────

async fn cmd_departments(gateway: Arc<dyn HrGateway>, json: bool) -> Result<()> {
    let departments: Vec<Department> = gateway
        .list_departments()
        .await
        .context("listing departments")?;
    if json {
        return print_json(&departments);
    }
    println!("{:>6}  {:<30} {:>9}", "ID", "DEPARTMENT", "EMPLOYEES");
    for d in &departments {
        println!(
            "{:>6}  {:<30} {:>9}",
            d.department_id,
            truncate(&d.department_name, 30),
            d.employee_count
        );
    }
    Ok(())
}

// ── `hrsync sync check` ───────────────────────────────────────────────────────

async fn cmd_sync_check(gateway: Arc<dyn HrGateway>, json: bool) -> Result<()> {
    let workflow = SyncWorkflow::new(gateway);
    let pb = make_spinner("sync");
    pb.set_message("checking HR against Payroll…");
    let outcome = workflow.check_sync().await;
    pb.finish_and_clear();

    if let CheckOutcome::Failed(err) = outcome {
        anyhow::bail!("sync check failed: {err}");
    }
    let Some(summary) = workflow.snapshot().summary else {
        anyhow::bail!("sync check returned no summary");
    };
    if json {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SyncStatusSummary) {
    println!("Total employees: {}", summary.total_employees);
    println!("  need sync:     {}", summary.need_sync);
    println!("  synced:        {}", summary.already_synced);
    if let Some(at) = summary.checked_at {
        println!("  checked at:    {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    if !summary.is_consistent() {
        println!("  WARNING: need sync + synced does not equal the total");
    }

    if summary.sync_needs.is_empty() {
        println!();
        println!("All records are in sync.");
        return;
    }
    println!();
    println!("{:>6}  {:<24} {:<7} {}", "ID", "NAME", "ACTION", "REASON");
    for n in &summary.sync_needs {
        println!(
            "{:>6}  {:<24} {:<7} {}",
            n.employee_id,
            truncate(&n.full_name, 24),
            n.action.as_str(),
            n.reason
        );
    }
}

// ── `hrsync sync execute` ─────────────────────────────────────────────────────

async fn cmd_sync_execute(
    gateway: Arc<dyn HrGateway>,
    config: &HrSyncConfig,
    ids: Vec<EmployeeId>,
    all: bool,
    json: bool,
) -> Result<()> {
    let workflow = Arc::new(SyncWorkflow::new(gateway));
    let center = SyncCenter::new(workflow.clone(), config.ui.recheck_delay());
    let pb = make_spinner("sync");

    if all {
        pb.set_message("checking HR against Payroll…");
        match center.refresh().await {
            CheckOutcome::Failed(err) => {
                pb.finish_and_clear();
                anyhow::bail!("sync check failed: {err}");
            }
            CheckOutcome::AllSynced => {
                pb.finish_and_clear();
                println!("All records are in sync, nothing to do.");
                return Ok(());
            }
            outcome => debug!(?outcome, "pre-execution check"),
        }
        center.select_all();
    } else {
        for id in ids {
            if !center.snapshot().selection.contains(id) {
                center.toggle(id);
            }
        }
    }

    let count = center.snapshot().selection.len();
    pb.set_message(format!("syncing {count} employee(s)…"));
    let result = center.execute_selected().await;
    pb.finish_and_clear();
    let result = result.context("sync execution failed")?;

    if json {
        print_json(&result)?;
    } else {
        print_result(&result);
        if let Some(summary) = workflow.snapshot().summary {
            println!();
            println!(
                "After re-check: {} need sync, {} synced of {}",
                summary.need_sync, summary.already_synced, summary.total_employees
            );
        }
    }

    if result.has_failures() {
        anyhow::bail!("{} employee(s) failed to sync", result.failed_count);
    }
    Ok(())
}

fn print_result(result: &SyncResult) {
    println!("{}", result.message);
    println!("  synced: {}", result.synced_count);
    println!("  failed: {}", result.failed_count);
    for d in &result.details {
        let id = d
            .employee_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        let action = d.action.map(|a| a.as_str()).unwrap_or("-");
        println!("  {id:>6}  {:<8} {action:<7} {}", d.status, d.message);
    }
}

// ── `hrsync config show` ──────────────────────────────────────────────────────

fn cmd_config_show(config: &HrSyncConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
