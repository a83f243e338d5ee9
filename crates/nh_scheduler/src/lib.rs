pub mod timers;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

use nh_collectors::CollectionManager;
use nh_core::{DailySummary, ReportStore, ReportTransport, Result, ScheduleConfig};

use crate::timers::next_daily_occurrence;

/// Drives the collection manager on a periodic cadence and the daily
/// summary on a wall-clock cadence, from a single coarse polling loop.
///
/// One scheduler owns one loop; cycles are serialized by construction.
/// Stopping is terminal: a stopped scheduler is discarded, not restarted.
pub struct Scheduler {
    manager: CollectionManager,
    store: Arc<dyn ReportStore>,
    transport: Option<Arc<dyn ReportTransport>>,
    subject_prefix: String,
    schedule: ScheduleConfig,
    summary_time: NaiveTime,
    state: SchedulerState,
}

struct SchedulerState {
    running: AtomicBool,
    stopped: AtomicBool,
    collection_count: AtomicU64,
    last_collection: Mutex<Option<DateTime<Utc>>>,
    next_collection_at: Mutex<Option<DateTime<Utc>>>,
    next_summary_at: Mutex<Option<NaiveDateTime>>,
}

#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    pub running: bool,
    pub last_collection: Option<DateTime<Utc>>,
    pub collection_count: u64,
    pub next_collection_due: Option<DateTime<Utc>>,
    pub next_summary_due: Option<NaiveDateTime>,
}

impl Scheduler {
    pub fn new(
        manager: CollectionManager,
        store: Arc<dyn ReportStore>,
        transport: Option<Arc<dyn ReportTransport>>,
        subject_prefix: String,
        schedule: ScheduleConfig,
    ) -> Result<Self> {
        let summary_time = schedule.summary_time()?;
        Ok(Self {
            manager,
            store,
            transport,
            subject_prefix,
            schedule,
            summary_time,
            state: SchedulerState {
                running: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                collection_count: AtomicU64::new(0),
                last_collection: Mutex::new(None),
                next_collection_at: Mutex::new(None),
                next_summary_at: Mutex::new(None),
            },
        })
    }

    /// The scheduling loop. Returns when [`Scheduler::stop`] is observed.
    ///
    /// Starting an already-running scheduler is a safe no-op, as is
    /// starting one that has already stopped.
    pub async fn run(&self) -> Result<()> {
        if self.state.stopped.load(Ordering::SeqCst) {
            warn!("scheduler has stopped; construct a new one to run again");
            return Ok(());
        }
        if self.state.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler is already running");
            return Ok(());
        }

        info!(
            interval_hours = self.schedule.collection_interval_hours,
            summary_time = %self.summary_time,
            "scheduler started"
        );

        // Arm both timers before the eager first cycle. The collection
        // timer is checked first on every tick, which is also the
        // tie-break when both come due in the same tick.
        *self.state.next_collection_at.lock().unwrap() = Some(Utc::now() + self.interval());
        *self.state.next_summary_at.lock().unwrap() = Some(next_daily_occurrence(
            Local::now().naive_local(),
            self.summary_time,
        ));

        // first cycle runs immediately, not after the first interval
        self.run_collection_cycle().await;

        while self.state.running.load(Ordering::SeqCst) {
            self.tick().await;
            sleep(self.schedule.poll_interval()).await;
        }

        self.state.stopped.store(true, Ordering::SeqCst);
        info!("scheduler loop exited");
        Ok(())
    }

    /// Host the scheduling loop on its own task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }

    /// Ask the loop to exit after its current tick. An in-flight cycle
    /// always runs to completion.
    pub fn stop(&self) {
        self.state.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    pub fn collection_count(&self) -> u64 {
        self.state.collection_count.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.state.running.load(Ordering::SeqCst),
            last_collection: *self.state.last_collection.lock().unwrap(),
            collection_count: self.state.collection_count.load(Ordering::SeqCst),
            next_collection_due: *self.state.next_collection_at.lock().unwrap(),
            next_summary_due: *self.state.next_summary_at.lock().unwrap(),
        }
    }

    async fn tick(&self) {
        let collection_due = {
            let next = self.state.next_collection_at.lock().unwrap();
            next.map_or(false, |at| Utc::now() >= at)
        };
        if collection_due {
            *self.state.next_collection_at.lock().unwrap() = Some(Utc::now() + self.interval());
            self.run_collection_cycle().await;
        }

        let summary_due = {
            let next = self.state.next_summary_at.lock().unwrap();
            next.map_or(false, |at| Local::now().naive_local() >= at)
        };
        if summary_due {
            {
                let mut next = self.state.next_summary_at.lock().unwrap();
                if let Some(at) = *next {
                    *next = Some(at + ChronoDuration::days(1));
                }
            }
            if let Err(e) = self.run_daily_summary().await {
                error!(error = %e, "daily summary failed");
            }
        }
    }

    /// One collection cycle. Failures are contained here so the polling
    /// loop never dies; scheduler state advances only on completion.
    pub async fn run_collection_cycle(&self) {
        let started = Utc::now();
        let articles = self.manager.collect_all().await;

        if articles.is_empty() {
            warn!("collection cycle produced no articles");
        } else {
            match self.store.persist(&articles).await {
                Ok(paths) => {
                    info!(
                        articles = articles.len(),
                        files = paths.len(),
                        "collection persisted"
                    );
                }
                Err(e) => {
                    error!(error = %e, "failed to persist collection");
                    return;
                }
            }
        }

        *self.state.last_collection.lock().unwrap() = Some(started);
        self.state.collection_count.fetch_add(1, Ordering::SeqCst);
        info!(
            duration_secs = (Utc::now() - started).num_seconds(),
            count = self.collection_count(),
            "collection cycle complete"
        );
    }

    /// Recompute the daily summary from the most recent collection output.
    /// Missing or unreadable prior output is a benign no-op.
    pub async fn run_daily_summary(&self) -> Result<()> {
        let latest = match self.store.find_latest_collection().await {
            Ok(Some(path)) => path,
            Ok(None) => {
                warn!("no prior collection output; skipping daily summary");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "could not look up prior collection output");
                return Ok(());
            }
        };

        let articles = match self.store.load_collection(&latest).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(path = %latest.display(), error = %e, "could not load prior collection output");
                return Ok(());
            }
        };
        if articles.is_empty() {
            warn!(path = %latest.display(), "latest collection output is empty; skipping daily summary");
            return Ok(());
        }

        let summary = DailySummary::from_records(&articles);
        let path = self.store.persist_summary(&summary).await?;
        info!(path = %path.display(), "daily summary generated");

        if let Some(transport) = &self.transport {
            let body = self.store.render_report(&summary);
            let subject = format!("{} {}", self.subject_prefix, Local::now().format("%d/%m/%Y"));
            if let Err(e) = transport.deliver(&subject, &body).await {
                error!(error = %e, "report delivery failed");
            }
        }
        Ok(())
    }

    fn interval(&self) -> ChronoDuration {
        ChronoDuration::hours(self.schedule.collection_interval_hours as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use nh_collectors::NewsCollector;
    use nh_core::{ArticleRecord, CollectionConfig, Error};

    struct StaticCollector {
        articles: Vec<ArticleRecord>,
    }

    #[async_trait]
    impl NewsCollector for StaticCollector {
        fn source_name(&self) -> &str {
            "static"
        }

        async fn collect(&self) -> Vec<ArticleRecord> {
            self.articles.clone()
        }
    }

    #[derive(Default)]
    struct MockStore {
        latest: Option<PathBuf>,
        records: Vec<ArticleRecord>,
        fail_persist: bool,
        fail_load: bool,
        persisted: Mutex<usize>,
        summaries: Mutex<Vec<DailySummary>>,
    }

    #[async_trait]
    impl ReportStore for MockStore {
        async fn persist(&self, articles: &[ArticleRecord]) -> Result<Vec<PathBuf>> {
            if self.fail_persist {
                return Err(Error::Report("disk full".to_string()));
            }
            *self.persisted.lock().unwrap() += 1;
            Ok(vec![PathBuf::from(format!("collection-{}", articles.len()))])
        }

        async fn persist_summary(&self, summary: &DailySummary) -> Result<PathBuf> {
            self.summaries.lock().unwrap().push(summary.clone());
            Ok(PathBuf::from("summary.json"))
        }

        async fn find_latest_collection(&self) -> Result<Option<PathBuf>> {
            Ok(self.latest.clone())
        }

        async fn load_collection(&self, _path: &Path) -> Result<Vec<ArticleRecord>> {
            if self.fail_load {
                return Err(Error::Report("corrupt file".to_string()));
            }
            Ok(self.records.clone())
        }

        fn render_report(&self, summary: &DailySummary) -> String {
            format!("report with {} articles", summary.total_articles)
        }
    }

    struct MockTransport {
        deliveries: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ReportTransport for MockTransport {
        async fn deliver(&self, subject: &str, _body: &str) -> Result<()> {
            self.deliveries.lock().unwrap().push(subject.to_string());
            Ok(())
        }
    }

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord::new(title, "http://u", "static", None, None, None)
    }

    fn test_manager(articles: Vec<ArticleRecord>) -> CollectionManager {
        let config = CollectionConfig {
            sources: Vec::new(),
            keywords: vec!["tecnologia".to_string()],
            inter_source_delay_ms: 0,
            ..CollectionConfig::default()
        };
        CollectionManager::with_collectors(config, vec![Box::new(StaticCollector { articles })])
    }

    fn fast_schedule() -> ScheduleConfig {
        ScheduleConfig {
            collection_interval_hours: 1_000,
            daily_summary_time: "13:00".to_string(),
            poll_interval_ms: 10,
        }
    }

    fn scheduler_with(store: Arc<MockStore>) -> Scheduler {
        Scheduler::new(
            test_manager(vec![record("Tecnologia em alta hoje")]),
            store,
            None,
            "[Test]".to_string(),
            fast_schedule(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn start_runs_one_eager_cycle_and_is_idempotent() {
        let store = Arc::new(MockStore::default());
        let scheduler = Arc::new(scheduler_with(store.clone()));

        let handle = scheduler.clone().spawn();
        tokio::time::sleep(Duration::from_millis(100)).await;

        // second start while running is a no-op, not a second eager cycle
        scheduler.run().await.unwrap();
        assert_eq!(scheduler.collection_count(), 1);
        assert_eq!(*store.persisted.lock().unwrap(), 1);
        assert!(scheduler.is_running());

        scheduler.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn a_stopped_scheduler_cannot_be_restarted() {
        let store = Arc::new(MockStore::default());
        let scheduler = Arc::new(scheduler_with(store.clone()));

        let handle = scheduler.clone().spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        // terminal state: no new loop, no new cycle
        scheduler.run().await.unwrap();
        assert_eq!(scheduler.collection_count(), 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn benign_empty_cycle_still_counts_as_completed() {
        let store = Arc::new(MockStore::default());
        let scheduler = Scheduler::new(
            test_manager(Vec::new()),
            store.clone(),
            None,
            "[Test]".to_string(),
            fast_schedule(),
        )
        .unwrap();

        scheduler.run_collection_cycle().await;
        assert_eq!(scheduler.collection_count(), 1);
        // nothing to persist on an empty cycle
        assert_eq!(*store.persisted.lock().unwrap(), 0);
        assert!(scheduler.status().last_collection.is_some());
    }

    #[tokio::test]
    async fn failed_persist_leaves_scheduler_state_untouched() {
        let store = Arc::new(MockStore {
            fail_persist: true,
            ..MockStore::default()
        });
        let scheduler = scheduler_with(store);

        scheduler.run_collection_cycle().await;
        assert_eq!(scheduler.collection_count(), 0);
        assert!(scheduler.status().last_collection.is_none());
    }

    #[tokio::test]
    async fn daily_summary_without_prior_output_is_a_benign_no_op() {
        let store = Arc::new(MockStore::default());
        let scheduler = scheduler_with(store.clone());

        scheduler.run_daily_summary().await.unwrap();
        assert!(store.summaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn daily_summary_with_unreadable_output_is_a_benign_no_op() {
        let store = Arc::new(MockStore {
            latest: Some(PathBuf::from("collection.json")),
            fail_load: true,
            ..MockStore::default()
        });
        let scheduler = scheduler_with(store.clone());

        scheduler.run_daily_summary().await.unwrap();
        assert!(store.summaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn daily_summary_reuses_reconstructed_records_and_delivers() {
        let store = Arc::new(MockStore {
            latest: Some(PathBuf::from("collection.json")),
            records: vec![record("IA avança"), record("IA e robótica")],
            ..MockStore::default()
        });
        let deliveries = Arc::new(Mutex::new(Vec::new()));
        let transport = Arc::new(MockTransport {
            deliveries: deliveries.clone(),
        });

        let scheduler = Scheduler::new(
            test_manager(Vec::new()),
            store.clone(),
            Some(transport),
            "[Test]".to_string(),
            fast_schedule(),
        )
        .unwrap();

        scheduler.run_daily_summary().await.unwrap();

        let summaries = store.summaries.lock().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_articles, 2);

        let delivered = deliveries.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].starts_with("[Test]"));
    }

    #[tokio::test]
    async fn status_reports_the_armed_timers_while_running() {
        let store = Arc::new(MockStore::default());
        let scheduler = Arc::new(scheduler_with(store));

        let handle = scheduler.clone().spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let status = scheduler.status();
        assert!(status.running);
        assert_eq!(status.collection_count, 1);
        assert!(status.next_collection_due.is_some());
        assert!(status.next_summary_due.is_some());

        scheduler.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
