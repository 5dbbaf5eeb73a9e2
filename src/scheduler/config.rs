pub mod snapshot_prune {
    /// Cron expression for deleting expired asset snapshots
    /// Runs every hour at the top of the hour
    pub const CRON_EXPRESSION: &str = "0 0 * * * *";
}

pub mod owner_refresh {
    /// Cron expression for refreshing configured owners
    /// Runs every 15 minutes (00:00, 00:15, 00:30, 00:45)
    pub const CRON_EXPRESSION: &str = "0 */15 * * * *";
}
