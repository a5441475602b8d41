//! Sequential host dispatcher with per-host fault isolation.

use async_trait::async_trait;
use tracing::{error, info, info_span, warn, Instrument};

use ph_api::{ApplianceClient, Session};
use ph_core::error::{display_chain, PhError, PhResult};
use ph_core::validation::ValidatedConfig;

/// Work performed inside one authenticated session.
#[async_trait]
pub trait HostTask: Send + Sync {
    /// Value produced for a host on success.
    type Output: Send;

    /// Human-readable name used in log lines, e.g. "backup and gravity update".
    fn name(&self) -> &str;

    /// Run the task against an authenticated session.
    async fn run(&self, session: &Session) -> PhResult<Self::Output>;
}

/// What happened to the session at the end of a host iteration.
#[derive(Debug)]
pub enum LogoutOutcome {
    /// The appliance accepted the logout.
    Completed,
    /// Logout was attempted and failed. Never changes the task outcome.
    Failed(PhError),
    /// No session was established, so there was nothing to log out of.
    Skipped,
}

impl LogoutOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of one host iteration.
#[derive(Debug)]
pub struct HostReport<T> {
    pub host: String,
    /// Login or task outcome.
    pub outcome: PhResult<T>,
    pub logout: LogoutOutcome,
}

impl<T> HostReport<T> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Reports for every host of a run, in configured order.
#[derive(Debug)]
pub struct RunSummary<T> {
    pub reports: Vec<HostReport<T>>,
}

impl<T> RunSummary<T> {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Drives a [`HostTask`] across every validated host.
///
/// Hosts are processed one at a time. Sessions are never shared between
/// iterations.
pub struct HostDispatcher {
    client: ApplianceClient,
}

impl HostDispatcher {
    pub fn new(client: ApplianceClient) -> Self {
        Self { client }
    }

    /// Run `task` for each host. Per-host errors are captured in the
    /// returned summary and never abort the run.
    pub async fn run<T: HostTask>(&self, config: &ValidatedConfig, task: &T) -> RunSummary<T::Output> {
        let mut reports = Vec::with_capacity(config.hosts().len());

        for host in config.hosts() {
            let span = info_span!("host", %host);
            let report = self
                .process_host(host, config.password(), task)
                .instrument(span)
                .await;
            reports.push(report);
        }

        let summary = RunSummary { reports };
        info!(
            "{} finished: {} succeeded, {} failed",
            task.name(),
            summary.succeeded(),
            summary.failed()
        );
        summary
    }

    async fn process_host<T: HostTask>(
        &self,
        host: &str,
        password: &str,
        task: &T,
    ) -> HostReport<T::Output> {
        info!("[{host}] starting {}", task.name());

        let session = match self.client.login(host, password).await {
            Ok(session) => session,
            Err(err) => {
                error!("[{host}] {} - failed: {}", task.name(), display_chain(&err));
                return HostReport {
                    host: host.to_string(),
                    outcome: Err(err),
                    logout: LogoutOutcome::Skipped,
                };
            }
        };

        let outcome = task.run(&session).await;
        match &outcome {
            Ok(_) => info!("[{host}] {} - successful", task.name()),
            Err(err) => error!("[{host}] {} - failed: {}", task.name(), display_chain(err)),
        }

        let logout = match session.logout().await {
            Ok(_) => LogoutOutcome::Completed,
            Err(err) => {
                warn!("[{host}] logout failed: {}", display_chain(&err));
                LogoutOutcome::Failed(err)
            }
        };

        HostReport {
            host: host.to_string(),
            outcome,
            logout,
        }
    }
}
