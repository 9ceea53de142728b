//! Detail-page worker pool and completion aggregation
//!
//! The discovered references go into a shared queue from which a fixed
//! number of workers pull until it is exhausted, so every reference is
//! claimed exactly once and slow fetches do not starve a pre-assigned
//! slice. Workers report through a single tagged-event channel; the
//! aggregator tallies counters and terminates exactly when every worker
//! has reported completion.

use crate::config::CrawlConfig;
use crate::crawler::detail::extract_player;
use crate::crawler::fetcher::fetch_page;
use crate::model::{Player, PlayerRef};
use crate::Result;
use reqwest::Client;
use scraper::Html;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A completion signal from a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One reference was processed; `success` is false when the fetch or
    /// the extraction failed
    ItemDone { success: bool },

    /// A worker exhausted the queue
    WorkerDone,
}

/// Running counters for one crawl, reported after every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub workers: usize,
    pub workers_done: usize,
}

impl Progress {
    fn new(total: usize, workers: usize) -> Self {
        Progress {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            workers,
            workers_done: 0,
        }
    }

    fn record(&mut self, event: Event) {
        match event {
            Event::ItemDone { success } => {
                self.completed += 1;
                if success {
                    self.succeeded += 1;
                } else {
                    self.failed += 1;
                }
            }
            Event::WorkerDone => self.workers_done += 1,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {}, completed {}, failed {}, workers {} ({} done)",
            self.total, self.completed, self.failed, self.workers, self.workers_done
        )
    }
}

/// Shared queue of pending references with an atomic claim cursor.
struct WorkQueue {
    items: Vec<PlayerRef>,
    cursor: AtomicUsize,
}

impl WorkQueue {
    fn new(items: Vec<PlayerRef>) -> Self {
        WorkQueue {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Claims the next unprocessed reference, or `None` when exhausted.
    /// Each index is handed out to exactly one caller.
    fn claim(&self) -> Option<(usize, &PlayerRef)> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.items.get(index).map(|item| (index, item))
    }
}

/// Fetches and extracts every discovered reference with a pool of
/// `config.workers` parallel workers, returning the records in discovery
/// order alongside the final counters.
///
/// Per-item fetch and extraction failures are counted and logged but do
/// not stop the crawl; the partially-filled record is kept.
pub async fn crawl_details(
    client: &Client,
    players: Vec<PlayerRef>,
    config: &CrawlConfig,
) -> Result<(Vec<Player>, Progress)> {
    let total = players.len();
    let queue = Arc::new(WorkQueue::new(players));
    let (events_tx, events_rx) = mpsc::channel::<Event>(64);

    let mut handles = Vec::with_capacity(config.workers);
    for worker_id in 0..config.workers {
        let queue = Arc::clone(&queue);
        let client = client.clone();
        let events = events_tx.clone();
        handles.push(tokio::spawn(run_worker(worker_id, queue, client, events)));
    }
    drop(events_tx);

    let progress = aggregate(events_rx, total, config.workers).await;

    // Reassemble the per-worker results into discovery order.
    let mut slots: Vec<Option<Player>> = Vec::new();
    slots.resize_with(total, || None);
    for handle in handles {
        for (index, player) in handle.await? {
            slots[index] = Some(player);
        }
    }
    let records: Vec<Player> = slots.into_iter().flatten().collect();

    Ok((records, progress))
}

/// Consumes worker events until every worker has reported completion.
///
/// Termination depends only on the worker-done count, not on the item
/// counters.
async fn aggregate(mut events: mpsc::Receiver<Event>, total: usize, workers: usize) -> Progress {
    let mut progress = Progress::new(total, workers);
    while progress.workers_done < workers {
        match events.recv().await {
            Some(event) => {
                progress.record(event);
                tracing::debug!("{}", progress);
            }
            None => break,
        }
    }
    progress
}

async fn run_worker(
    worker_id: usize,
    queue: Arc<WorkQueue>,
    client: Client,
    events: mpsc::Sender<Event>,
) -> Vec<(usize, Player)> {
    let mut results = Vec::new();
    while let Some((index, player_ref)) = queue.claim() {
        let mut player = Player::from_ref(player_ref);
        let success = process_item(&client, player_ref, &mut player).await;
        results.push((index, player));
        if events.send(Event::ItemDone { success }).await.is_err() {
            break;
        }
    }
    tracing::debug!("Worker {} finished", worker_id);
    let _ = events.send(Event::WorkerDone).await;
    results
}

/// Fetches one detail page and extracts it into `player`. Returns false
/// on fetch or extraction failure; the record keeps whatever was assigned
/// before the failure.
async fn process_item(client: &Client, player_ref: &PlayerRef, player: &mut Player) -> bool {
    let page = match fetch_page(client, &player_ref.url, player_ref.referer.as_deref()).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Fetch failed for {}: {}", player_ref.url, e);
            return false;
        }
    };

    // Html is not Send; parse and extract within one non-async scope.
    let extracted = {
        let document = Html::parse_document(&page.body);
        extract_player(&document, player)
    };

    match extracted {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Extraction failed for {}: {}", player_ref.url, e);
            false
        }
    }
}
