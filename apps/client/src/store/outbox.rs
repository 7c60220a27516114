//! Outbox for best-effort remote writes.
//!
//! Every optimistic mutation enqueues one [`RemoteWrite`]. A single worker
//! delivers them strictly in enqueue order, so an older write can never land
//! after a newer one. Each write is stamped with a version from one increasing
//! sequence, so versions on any record only grow; a supersedable write is
//! skipped when a newer queued write on the same record covers every field it
//! would have sent.
//!
//! Failures are retried with exponential backoff when the error is transient
//! and are otherwise logged and dropped. Local state is never rolled back.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, RemoteGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): base, 2×base, 4×base, …
    pub fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteVerb {
    Post,
    Put,
}

/// A remote write mirroring one local mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteWrite {
    /// Short human label for logs, e.g. `"like post"`.
    pub label: &'static str,
    pub verb: WriteVerb,
    pub path: String,
    pub body: Value,
    /// Record the write targets, e.g. `user:u1`. Versions are counted per record.
    pub record: String,
    /// The body overwrites the listed fields of the record (PUT semantics),
    /// so a later write covering the same fields makes this one redundant.
    pub supersedable: bool,
}

impl RemoteWrite {
    pub fn post(label: &'static str, record: String, path: String, body: Value) -> Self {
        Self {
            label,
            verb: WriteVerb::Post,
            path,
            body,
            record,
            supersedable: false,
        }
    }

    pub fn replace(label: &'static str, record: String, path: String, body: Value) -> Self {
        Self {
            label,
            verb: WriteVerb::Put,
            path,
            body,
            record,
            supersedable: true,
        }
    }

    fn fields(&self) -> BTreeSet<String> {
        self.body
            .as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct Envelope {
    write: RemoteWrite,
    version: u64,
}

#[derive(Debug, Default)]
struct VersionTable {
    /// Last version handed out.
    sequence: u64,
    /// Supersedable writes still queued, per record: version → fields they
    /// send. A record is only present while it has one.
    pending: HashMap<String, Vec<(u64, BTreeSet<String>)>>,
}

type SharedVersions = Arc<Mutex<VersionTable>>;

/// Producer side. Cheap to clone; every store holds one.
#[derive(Clone)]
pub struct Outbox {
    sender: UnboundedSender<Envelope>,
    versions: SharedVersions,
}

impl Outbox {
    /// Creates a connected outbox and worker pair.
    pub fn channel(gateway: Arc<dyn RemoteGateway>, policy: RetryPolicy) -> (Outbox, OutboxWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let versions: SharedVersions = Arc::default();
        (
            Outbox {
                sender,
                versions: versions.clone(),
            },
            OutboxWorker {
                receiver,
                gateway,
                policy,
                versions,
            },
        )
    }

    /// Queues a write and returns the version stamped on it. Never blocks and
    /// never fails from the caller's point of view.
    pub fn enqueue(&self, write: RemoteWrite) -> u64 {
        let version = {
            let mut table = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
            table.sequence += 1;
            let version = table.sequence;
            if write.supersedable {
                table
                    .pending
                    .entry(write.record.clone())
                    .or_default()
                    .push((version, write.fields()));
            }
            version
        };

        debug!("Queued {} ({}) v{}", write.label, write.record, version);
        if let Err(e) = self.sender.send(Envelope { write, version }) {
            warn!(
                "Outbox worker is gone, dropping {} for {}",
                e.0.write.label, e.0.write.record
            );
        }
        version
    }

    /// Version of the newest supersedable write on `record` still waiting for
    /// delivery, 0 if none is queued.
    pub fn pending_version(&self, record: &str) -> u64 {
        let table = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .pending
            .get(record)
            .and_then(|queued| queued.last())
            .map_or(0, |(version, _)| *version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Superseded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub delivered: usize,
    pub superseded: usize,
    pub failed: usize,
}

impl DrainReport {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.delivered += 1,
            Delivery::Superseded => self.superseded += 1,
            Delivery::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.delivered + self.superseded + self.failed
    }
}

/// Consumer side. Exactly one exists per outbox, which is what serialises
/// delivery.
pub struct OutboxWorker {
    receiver: UnboundedReceiver<Envelope>,
    gateway: Arc<dyn RemoteGateway>,
    policy: RetryPolicy,
    versions: SharedVersions,
}

impl OutboxWorker {
    /// Delivers writes until every [`Outbox`] handle has been dropped and the
    /// queue is empty.
    pub async fn run(mut self) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(envelope) = self.receiver.recv().await {
            report.record(self.deliver(envelope).await);
        }
        info!(
            "Outbox closed: {} delivered, {} superseded, {} failed",
            report.delivered, report.superseded, report.failed
        );
        report
    }

    /// Delivers everything queued right now and returns.
    pub async fn drain(&mut self) -> DrainReport {
        let mut report = DrainReport::default();
        while let Ok(envelope) = self.receiver.try_recv() {
            report.record(self.deliver(envelope).await);
        }
        report
    }

    async fn deliver(&self, envelope: Envelope) -> Delivery {
        let Envelope { write, version } = envelope;

        if write.supersedable && self.settle(&write, version) {
            debug!(
                "Skipping {} ({}) v{}: superseded by a newer write",
                write.label, write.record, version
            );
            return Delivery::Superseded;
        }

        let mut attempt = 1;
        loop {
            match self.send(&write).await {
                Ok(_) => {
                    debug!("Delivered {} ({}) v{}", write.label, write.record, version);
                    return Delivery::Delivered;
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_before(attempt);
                    warn!(
                        "{} ({}) attempt {} failed: {e}; retrying after {}ms",
                        write.label,
                        write.record,
                        attempt,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        "API Error: failed to {} ({}) after {} attempt(s): {e}",
                        write.label, write.record, attempt
                    );
                    return Delivery::Failed;
                }
            }
        }
    }

    /// Removes `version` from the pending set of its record and reports
    /// whether a newer pending write covers all of its fields. The record is
    /// forgotten once nothing is queued for it.
    fn settle(&self, write: &RemoteWrite, version: u64) -> bool {
        let mut table = self.versions.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queued) = table.pending.get_mut(&write.record) else {
            return false;
        };
        let Some(position) = queued.iter().position(|(v, _)| *v == version) else {
            return false;
        };
        let (_, fields) = queued.remove(position);
        let superseded = queued
            .iter()
            .any(|(newer, newer_fields)| *newer > version && fields.is_subset(newer_fields));
        if queued.is_empty() {
            table.pending.remove(&write.record);
        }
        superseded
    }

    async fn send(&self, write: &RemoteWrite) -> Result<Option<Value>, GatewayError> {
        match write.verb {
            WriteVerb::Post => self.gateway.post(&write.path, &write.body).await,
            WriteVerb::Put => self.gateway.put(&write.path, &write.body).await,
        }
    }
}
