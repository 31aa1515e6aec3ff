use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, info_span, Instrument};
use crate::domain::services::event_cache::EventCache;

/// Periodically drops expired entries from the event cache. Runs until the runtime shuts down.
pub async fn start_cache_sweeper(cache: Arc<EventCache>, period: Duration) {
    info!("Starting event cache sweeper (every {:?})...", period);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let cache = cache.clone();
        async move {
            let removed = cache.sweep().await;
            if removed > 0 {
                info!(removed, "Evicted expired cache entries");
            } else {
                debug!("Nothing to evict");
            }
        }
        .instrument(info_span!("cache_sweep"))
        .await;
    }
}
