use anyhow::Result;
use chrono::DateTime;
use chrono_tz::Tz;
use cron::Schedule;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const POLL_WHEN_EMPTY_SEC: u64 = 30;
const MIN_SLEEP_MS: i64 = 1000;
const MAX_SLEEP_MS: u64 = 30000;

/// Normalize a cron expression to 6+ fields (prepend "0 " for seconds if 5-field).
/// Then validate it parses. Returns Ok(normalized) or Err with a message.
pub fn validate_cron_expr(expr: &str) -> Result<String> {
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {}", expr)
    } else {
        expr.to_string()
    };
    normalized
        .parse::<Schedule>()
        .map_err(|e| anyhow::anyhow!("Invalid cron expression '{}': {}", expr, e))?;
    Ok(normalized)
}

/// Detect the system's IANA timezone (e.g. "`America/New_York`").
/// Returns None if detection fails.
pub fn detect_system_timezone() -> Option<String> {
    iana_time_zone::get_timezone().ok()
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}

/// Compute the next fire time (ms since epoch) for a cron expression in the
/// given timezone. Invalid timezones fall back to UTC with a warning.
pub(crate) fn next_run_ms(expr: &str, tz: Option<&str>, now_ms: i64) -> Option<i64> {
    let normalized = validate_cron_expr(expr).ok()?;
    let sched = normalized.parse::<Schedule>().ok()?;
    let now_sec = now_ms / 1000;
    let now_dt: Option<DateTime<Tz>> = if let Some(tz_str) = tz {
        if let Ok(tz_val) = tz_str.parse::<Tz>() {
            DateTime::from_timestamp(now_sec, 0).map(|dt| dt.with_timezone(&tz_val))
        } else {
            warn!("Invalid timezone '{}', falling back to UTC", tz_str);
            DateTime::from_timestamp(now_sec, 0).map(|dt| dt.with_timezone(&Tz::UTC))
        }
    } else {
        DateTime::from_timestamp(now_sec, 0).map(|dt| dt.with_timezone(&Tz::UTC))
    };
    now_dt.and_then(|dt| sched.after(&dt).next().map(|next| next.timestamp_millis()))
}

/// Async callback fired when a job is due. Returns an optional result string
/// used only for logging.
pub type JobCallback = Arc<
    dyn Fn() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Option<String>>> + Send>>
        + Send
        + Sync,
>;

pub struct ScheduledJob {
    pub name: String,
    pub expr: String,
    /// IANA timezone; `None` uses the system timezone (UTC if undetectable).
    pub timezone: Option<String>,
    pub callback: JobCallback,
}

#[derive(Clone)]
pub struct Scheduler {
    jobs: Arc<Vec<ScheduledJob>>,
    running: Arc<Mutex<bool>>,
    handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl Scheduler {
    pub fn new(jobs: Vec<ScheduledJob>) -> Self {
        Self {
            jobs: Arc::new(jobs),
            running: Arc::new(Mutex::new(false)),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        for job in self.jobs.iter() {
            validate_cron_expr(&job.expr)?;
        }

        *self.running.lock().await = true;
        let jobs = self.jobs.clone();
        let running = self.running.clone();

        let handle = tokio::spawn(async move {
            let now = now_ms();
            let mut next_runs: Vec<Option<i64>> = jobs
                .iter()
                .map(|job| next_run_ms(&job.expr, job.timezone.as_deref(), now))
                .collect();

            for (job, next) in jobs.iter().zip(&next_runs) {
                match next {
                    Some(at) => info!(
                        "Scheduled job '{}' next fires in {}s",
                        job.name,
                        (at - now) / 1000
                    ),
                    None => warn!("Scheduled job '{}' has no next fire time", job.name),
                }
            }

            loop {
                if !*running.lock().await {
                    break;
                }

                let now = now_ms();
                let mut min_next: Option<i64> = None;

                for (i, job) in jobs.iter().enumerate() {
                    let Some(due) = next_runs[i] else { continue };

                    if due <= now {
                        info!("Firing scheduled job '{}'", job.name);
                        let callback = job.callback.clone();
                        let name = job.name.clone();
                        tokio::spawn(async move {
                            match callback().await {
                                Ok(Some(result)) => {
                                    info!("Scheduled job '{}' completed: {}", name, result);
                                }
                                Ok(None) => {
                                    info!("Scheduled job '{}' completed (no output)", name);
                                }
                                Err(e) => {
                                    error!("Scheduled job '{}' failed: {}", name, e);
                                }
                            }
                        });
                        // Advance past the fire we just dispatched so the job
                        // won't re-fire on the next tick
                        next_runs[i] = next_run_ms(&job.expr, job.timezone.as_deref(), now);
                    }

                    if let Some(next) = next_runs[i] {
                        min_next = Some(min_next.map_or(next, |n| n.min(next)));
                    }
                }

                let delay = if let Some(next) = min_next {
                    (next - now).max(MIN_SLEEP_MS) as u64
                } else {
                    POLL_WHEN_EMPTY_SEC * 1000
                };

                tokio::time::sleep(tokio::time::Duration::from_millis(delay.min(MAX_SLEEP_MS)))
                    .await;
            }
        });

        *self.handle.lock().await = Some(handle);
        info!("Scheduler started ({} job(s))", self.jobs.len());
        Ok(())
    }

    pub async fn stop(&self) {
        *self.running.lock().await = false;
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
        }
    }
}
