use std::{sync::Arc, time::Duration};

use tokio::{task, time::interval};

use crate::{app::util::time::current_time_in_secs, jobs::queue::JobQueue};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn spawn(queue: Arc<JobQueue>, retention_secs: u64) {
    tracing::debug!("janitor spawned");

    task::spawn(async move {
        let mut interval = interval(SWEEP_INTERVAL);

        loop {
            interval.tick().await;
            cleanup_jobs(&queue, retention_secs).await;
        }
    });
}

async fn cleanup_jobs(queue: &JobQueue, retention_secs: u64) {
    let cutoff = current_time_in_secs().saturating_sub(retention_secs);
    let purged = queue.purge_finished(cutoff).await;

    if purged > 0 {
        tracing::debug!("purged {} finished job(s)", purged);
    }
}
