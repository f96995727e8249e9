use crate::models::{InventoryItem, ItemDraft};
use std::collections::HashMap;

/// A local write that the store has not acknowledged yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PendingKind {
    Create(InventoryItem),
    Update { id: String, draft: ItemDraft },
    Delete { id: String },
}

impl PendingKind {
    pub fn id(&self) -> &str {
        match self {
            PendingKind::Create(item) => &item.id,
            PendingKind::Update { id, .. } | PendingKind::Delete { id } => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingOp {
    pub op_id: u64,
    pub kind: PendingKind,
}

/// Identifies one collection read. Issued before the request goes out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PollTicket {
    pub seq: u64,
    pub epoch: u64,
}

/// Document-level differences between two confirmed snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    pub fn between(old: &[InventoryItem], new: &[InventoryItem]) -> Self {
        let old_by_id: HashMap<&str, &InventoryItem> =
            old.iter().map(|i| (i.id.as_str(), i)).collect();
        let new_by_id: HashMap<&str, &InventoryItem> =
            new.iter().map(|i| (i.id.as_str(), i)).collect();

        let mut out = ChangeSet::default();
        for item in new {
            match old_by_id.get(item.id.as_str()) {
                None => out.added.push(item.id.clone()),
                Some(prev) if *prev != item => out.modified.push(item.id.clone()),
                Some(_) => {}
            }
        }
        for item in old {
            if !new_by_id.contains_key(item.id.as_str()) {
                out.removed.push(item.id.clone());
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SnapshotOutcome {
    Applied(ChangeSet),
    /// Dropped: a newer read was applied already, or a write was acknowledged
    /// after this read was issued.
    Stale,
}

/// Local mirror of the `inventory` collection.
///
/// `confirmed` is what the store last told us; `pending` are optimistic writes
/// layered on top when rendering. The two are kept apart so a failed write can
/// be rolled back without refetching.
#[derive(Clone, Debug, Default)]
pub(crate) struct InventoryMirror {
    confirmed: Vec<InventoryItem>,
    pending: Vec<PendingOp>,
    next_op_id: u64,
    next_seq: u64,
    applied_seq: Option<u64>,
    epoch: u64,
    has_snapshot: bool,
}

impl InventoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a server read (not just the local cache) has been applied.
    pub fn has_snapshot(&self) -> bool {
        self.has_snapshot
    }

    pub fn confirmed(&self) -> &[InventoryItem] {
        &self.confirmed
    }

    /// Fills the mirror from the local cache so the first paint has data.
    /// Ignored once a live snapshot arrived.
    pub fn seed_from_cache(&mut self, items: Vec<InventoryItem>) -> bool {
        if self.has_snapshot || !self.confirmed.is_empty() {
            return false;
        }
        self.confirmed = items;
        true
    }

    pub fn begin_poll(&mut self) -> PollTicket {
        self.next_seq += 1;
        PollTicket {
            seq: self.next_seq,
            epoch: self.epoch,
        }
    }

    pub fn apply_snapshot(
        &mut self,
        ticket: PollTicket,
        items: Vec<InventoryItem>,
    ) -> SnapshotOutcome {
        if self.applied_seq.is_some_and(|applied| ticket.seq <= applied) {
            return SnapshotOutcome::Stale;
        }
        if ticket.epoch < self.epoch {
            return SnapshotOutcome::Stale;
        }

        let changes = ChangeSet::between(&self.confirmed, &items);
        self.confirmed = items;
        self.applied_seq = Some(ticket.seq);
        self.has_snapshot = true;
        SnapshotOutcome::Applied(changes)
    }

    fn push_pending(&mut self, kind: PendingKind) -> u64 {
        self.next_op_id += 1;
        let op_id = self.next_op_id;
        self.pending.push(PendingOp { op_id, kind });
        op_id
    }

    pub fn stage_create(&mut self, item: InventoryItem) -> u64 {
        self.push_pending(PendingKind::Create(item))
    }

    pub fn stage_update(&mut self, id: &str, draft: ItemDraft) -> u64 {
        self.push_pending(PendingKind::Update {
            id: id.to_string(),
            draft,
        })
    }

    pub fn stage_delete(&mut self, id: &str) -> u64 {
        self.push_pending(PendingKind::Delete { id: id.to_string() })
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.iter().any(|op| op.kind.id() == id)
    }

    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .pending
            .iter()
            .map(|op| op.kind.id().to_string())
            .collect();
        ids.dedup();
        ids
    }

    fn take_pending(&mut self, op_id: u64) -> Option<PendingOp> {
        let pos = self.pending.iter().position(|op| op.op_id == op_id)?;
        Some(self.pending.remove(pos))
    }

    /// A create or update was stored; `item` is the stored version.
    pub fn ack_upsert(&mut self, op_id: u64, item: InventoryItem) {
        if self.take_pending(op_id).is_none() {
            return;
        }
        match self.confirmed.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.confirmed.push(item),
        }
        self.epoch += 1;
    }

    pub fn ack_delete(&mut self, op_id: u64) {
        let Some(op) = self.take_pending(op_id) else {
            return;
        };
        let id = op.kind.id().to_string();
        self.confirmed.retain(|i| i.id != id);
        self.epoch += 1;
    }

    /// Drops a failed write. Returns false if the op was unknown.
    pub fn rollback(&mut self, op_id: u64) -> bool {
        self.take_pending(op_id).is_some()
    }

    /// What the UI renders: confirmed items with pending writes applied in order.
    pub fn visible(&self) -> Vec<InventoryItem> {
        let mut out = self.confirmed.clone();
        for op in &self.pending {
            match &op.kind {
                PendingKind::Create(item) => match out.iter_mut().find(|i| i.id == item.id) {
                    // The store already has it (read raced the ack).
                    Some(existing) => existing.apply_draft(&item.draft()),
                    None => out.push(item.clone()),
                },
                PendingKind::Update { id, draft } => {
                    if let Some(existing) = out.iter_mut().find(|i| &i.id == id) {
                        existing.apply_draft(draft);
                    }
                }
                PendingKind::Delete { id } => out.retain(|i| &i.id != id),
            }
        }
        out
    }

    /// Forgets all data. Counters stay monotonic and the epoch advances, so
    /// reads and writes issued before the reset can no longer land.
    pub fn reset(&mut self) {
        *self = Self {
            next_op_id: self.next_op_id,
            next_seq: self.next_seq,
            epoch: self.epoch + 1,
            ..Self::default()
        };
    }
}
