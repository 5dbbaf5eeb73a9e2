//! Scheduler for periodic asset cache maintenance.
//!
//! A cron-based job scheduler that deletes expired asset snapshots and keeps the assets of
//! configured owners warm, so reads for those owners are served from a fresh cache entry.

use std::sync::Arc;

use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::Error, esi::assets::AssetOwner, service::owners::OwnerServices};

pub mod cache;
pub mod config;

use self::cache::{prune_asset_snapshots, refresh_stale_owners};
use self::config::{owner_refresh as owner_refresh_config, snapshot_prune as snapshot_prune_config};

/// Job scheduler for asset cache maintenance.
pub struct Scheduler {
    services: OwnerServices,
    owners: Arc<[AssetOwner]>,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Arguments
    /// - `services` - Asset services whose shared cache the jobs maintain
    /// - `owners` - Owners kept warm by the refresh job
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(services: OwnerServices, owners: Vec<AssetOwner>) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            services,
            owners: owners.into(),
            sched,
        })
    }

    /// Registers all scheduled jobs and starts the scheduler.
    ///
    /// The following jobs are registered:
    /// - Asset snapshot pruning
    /// - Refresh of configured owners, when any are configured
    ///
    /// # Returns
    /// - `Ok(JobScheduler)` - Started scheduler, which keeps running until shut down
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<JobScheduler, Error> {
        self.schedule_job(
            snapshot_prune_config::CRON_EXPRESSION,
            "asset snapshot prune",
            prune_asset_snapshots,
        )
        .await?;

        if !self.owners.is_empty() {
            self.schedule_job(
                owner_refresh_config::CRON_EXPRESSION,
                "asset owner refresh",
                refresh_stale_owners,
            )
            .await?;
        }

        self.sched.start().await?;

        Ok(self.sched)
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The function receives clones of the asset services and configured owners. On
    /// execution, the job logs the count it returns or the error it failed with.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run (e.g., "0 0 * * * *" for hourly)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async job returning the number of entries it acted on
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(OwnerServices, Arc<[AssetOwner]>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let services = self.services.clone();
        let owners = Arc::clone(&self.owners);
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let services = services.clone();
                let owners = Arc::clone(&owners);
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(services, owners).await {
                        Ok(count) => tracing::debug!("Ran {} job on {} entries", name, count),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
