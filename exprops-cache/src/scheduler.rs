//! Process-wide expiry worker.
//!
//! One daemon thread drives a single-threaded tokio runtime. Every scheduled
//! job becomes a task that sleeps for its lifetime, runs once, then exits.

use std::sync::OnceLock;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

pub(crate) type ExpiryTask = Box<dyn FnOnce() + Send + 'static>;

struct ExpiryJob {
    lifetime: Duration,
    task: ExpiryTask,
}

static SCHEDULER: OnceLock<Option<UnboundedSender<ExpiryJob>>> = OnceLock::new();

/// Run `task` once after `lifetime`.
pub(crate) fn schedule(lifetime: Duration, task: ExpiryTask) {
    let job = ExpiryJob { lifetime, task };
    let job = match SCHEDULER.get_or_init(start) {
        Some(sender) => match sender.send(job) {
            Ok(()) => return,
            Err(rejected) => rejected.0,
        },
        None => job,
    };
    // Worker unavailable: fall back to a dedicated sleeper thread.
    let spawned = std::thread::Builder::new()
        .name("exprops-cache-expiry-fallback".into())
        .spawn(move || {
            std::thread::sleep(job.lifetime);
            (job.task)();
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "unable to schedule cache expiry, entry will not expire");
    }
}

fn start() -> Option<UnboundedSender<ExpiryJob>> {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build cache expiry runtime");
            return None;
        }
    };
    let (sender, mut receiver) = unbounded_channel::<ExpiryJob>();
    let spawned = std::thread::Builder::new()
        .name("exprops-cache-expiry".into())
        .spawn(move || {
            runtime.block_on(async move {
                while let Some(job) = receiver.recv().await {
                    tokio::spawn(async move {
                        tokio::time::sleep(job.lifetime).await;
                        (job.task)();
                    });
                }
            });
        });
    match spawned {
        Ok(_) => {
            tracing::debug!("cache expiry worker started");
            Some(sender)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to spawn cache expiry worker");
            None
        }
    }
}
