pub(crate) mod inventory_snapshot;

pub(crate) use inventory_snapshot::{load_inventory_snapshot, save_inventory_snapshot};
