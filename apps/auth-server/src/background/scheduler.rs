//! Cron-style job scheduler using tokio-cron-scheduler.

use std::sync::Arc;

use sentra_core::service::AccountService;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler.
    pub enabled: bool,
    /// Cron expression for the unverified-account purge sweep.
    pub purge_schedule: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // Every 30 minutes, matching the verification window.
            purge_schedule: "0 */30 * * * *".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            purge_schedule: std::env::var("PURGE_SCHEDULE").unwrap_or(defaults.purge_schedule),
        }
    }
}

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a new scheduler.
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, config })
    }

    /// Add a cron job.
    pub async fn add_cron<F, Fut>(
        &self,
        schedule: &str,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }
}

/// Register and start the periodic purge of unverified accounts whose
/// verification deadline has passed.
pub async fn start_purge_job(
    accounts: Arc<AccountService>,
    config: SchedulerConfig,
) -> Result<Scheduler, JobSchedulerError> {
    let scheduler = Scheduler::new(config.clone()).await?;

    scheduler
        .add_cron(&config.purge_schedule, move || {
            let accounts = accounts.clone();
            async move {
                match accounts.purge_unverified_expired().await {
                    Ok(purged) => {
                        tracing::debug!(purged, "Purge sweep finished");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Purge sweep failed");
                    }
                }
            }
        })
        .await?;

    scheduler.start().await?;
    Ok(scheduler)
}
