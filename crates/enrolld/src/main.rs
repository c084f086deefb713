//! enrolld - time-boxed course enrollment service
//!
//! This is the main entry point for enrolld. It wires together:
//! - Configuration loading
//! - Store initialization
//! - The enrollment service with the LMS adapter
//! - The periodic expiration sweep
//!
//! Besides the long-running `run` mode, it exposes one-shot operator
//! commands for sweeping, batch enrollment, revocation, and listing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use enroll_config::{load_config, Settings};
use enroll_core::EnrollmentService;
use enroll_lms::LmsClient;
use enroll_store::{EnrollmentStatus, EnrollmentStore, SqliteStore};
use enroll_util::{CourseId, EnrollmentId, UserId};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// enrolld - time-boxed course enrollment service
#[derive(Parser, Debug)]
#[command(name = "enrolld")]
#[command(about = "Time-boxed course enrollment service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/enrolld/config.toml")]
    config: PathBuf,

    /// Data directory override (or set ENROLLD_DATA_DIR env var)
    #[arg(short, long, env = "ENROLLD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Run the service with the periodic expiration sweep
    Run,

    /// Run a single expiration sweep and exit
    Sweep,

    /// Enroll a batch of users by email, one address per line
    Enroll {
        /// Course to enroll into
        #[arg(long)]
        course: i64,

        /// Enrollment duration in days (default: from config)
        #[arg(long)]
        days: Option<i64>,

        /// File with email addresses; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Revoke an enrollment by id
    Revoke {
        /// Enrollment id
        id: i64,
    },

    /// List enrollments
    List {
        /// Only this user's active enrollments
        #[arg(long, conflicts_with_all = ["course", "status"])]
        user: Option<i64>,

        /// Only this course's active enrollments
        #[arg(long, conflicts_with = "status")]
        course: Option<i64>,

        /// Filter by status: active or expired
        #[arg(long, default_value = "active")]
        status: String,

        /// Maximum rows to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

/// Main service state
struct Service {
    settings: Settings,
    enrollments: EnrollmentService,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        // Load configuration
        let mut settings = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        if let Some(data_dir) = &args.data_dir {
            settings.service.data_dir = data_dir.clone();
        }

        info!(
            config_path = %args.config.display(),
            data_dir = %settings.service.data_dir.display(),
            sweep_interval_secs = settings.service.sweep_interval.as_secs(),
            "Configuration loaded"
        );

        // Create data directory
        std::fs::create_dir_all(&settings.service.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {:?}",
                settings.service.data_dir
            )
        })?;

        // Initialize store
        let db_path = settings.service.data_dir.join("enrolld.db");
        let store: Arc<dyn EnrollmentStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        // Initialize the LMS adapter; one client serves as both the
        // access gateway and the directory
        let lms = Arc::new(LmsClient::new(settings.lms.as_ref())?);

        let enrollments = EnrollmentService::new(store, lms.clone(), lms);

        Ok(Self {
            settings,
            enrollments,
        })
    }

    /// Run the periodic sweep loop until a shutdown signal arrives
    async fn run(self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        let mut sweep_timer = tokio::time::interval(self.settings.service.sweep_interval);
        sweep_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!("Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                // Sweep timer; the first tick fires immediately on startup
                _ = sweep_timer.tick() => {
                    if let Err(e) = self.enrollments.sweep(enroll_util::now()).await {
                        warn!(error = %e, "Expiration sweep failed");
                    }
                }
            }
        }

        info!("Shutdown complete");
        Ok(())
    }

    async fn sweep_once(&self) -> Result<()> {
        let outcome = self.enrollments.sweep(enroll_util::now()).await?;
        println!(
            "Sweep complete: {} due, {} revoked",
            outcome.due, outcome.revoked
        );
        Ok(())
    }

    async fn enroll_batch(
        &self,
        course: i64,
        days: Option<i64>,
        file: Option<&PathBuf>,
    ) -> Result<()> {
        let emails = match file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read email list from {:?}", path))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read email list from stdin")?;
                buf
            }
        };

        let days = days.unwrap_or(self.settings.service.default_duration_days);
        let outcome = self
            .enrollments
            .enroll_batch(&emails, CourseId::new(course), days, enroll_util::now())
            .await;

        println!(
            "Enrolled {} user(s), {} error(s)",
            outcome.success_count, outcome.error_count
        );
        for error in &outcome.errors {
            println!("  - {}", error);
        }

        if outcome.error_count > 0 {
            anyhow::bail!("{} of the batch lines failed", outcome.error_count);
        }
        Ok(())
    }

    async fn revoke(&self, id: i64) -> Result<()> {
        self.enrollments.revoke(EnrollmentId::new(id)).await?;
        println!("Enrollment {} revoked", id);
        Ok(())
    }

    fn list(&self, user: Option<i64>, course: Option<i64>, status: &str, limit: usize) -> Result<()> {
        let now = enroll_util::now();

        let views = if let Some(user) = user {
            self.enrollments.list_for_user(UserId::new(user), now)?
        } else if let Some(course) = course {
            self.enrollments.list_for_course(CourseId::new(course), now)?
        } else {
            let status = EnrollmentStatus::parse(status)
                .with_context(|| format!("Unknown status '{}', expected active or expired", status))?;
            self.enrollments.list_by_status(status, limit, now)?
        };

        if views.is_empty() {
            println!("No enrollments");
            return Ok(());
        }

        for view in &views {
            println!(
                "{:>6}  user {:>6}  course {:>6}  {:<8} expires {}  ({})",
                view.id,
                view.user_id,
                view.course_id,
                view.status,
                view.expires_at.to_rfc3339(),
                view.remaining
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_command() {
        let args = Args::try_parse_from(["enrolld", "run"]).unwrap();
        assert!(matches!(args.command, CliCommand::Run));
        assert_eq!(args.config, PathBuf::from("/etc/enrolld/config.toml"));
    }

    #[test]
    fn parse_enroll_command() {
        let args =
            Args::try_parse_from(["enrolld", "enroll", "--course", "10", "--days", "7"]).unwrap();
        match args.command {
            CliCommand::Enroll { course, days, file } => {
                assert_eq!(course, 10);
                assert_eq!(days, Some(7));
                assert!(file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn list_filters_are_exclusive() {
        let result = Args::try_parse_from([
            "enrolld", "list", "--user", "1", "--course", "10",
        ]);
        assert!(result.is_err());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "enrolld starting");

    if enroll_util::is_mock_time_active() {
        warn!("Mock time is active; timestamps do not reflect the wall clock");
    }

    let service = Service::new(&args)?;

    match args.command {
        CliCommand::Run => service.run().await,
        CliCommand::Sweep => service.sweep_once().await,
        CliCommand::Enroll { course, days, file } => {
            service.enroll_batch(course, days, file.as_ref()).await
        }
        CliCommand::Revoke { id } => service.revoke(id).await,
        CliCommand::List {
            user,
            course,
            status,
            limit,
        } => service.list(user, course, &status, limit),
    }
}
