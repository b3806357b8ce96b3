mod store;

pub use store::{SNAPSHOT_FILE_NAME, Snapshot, SnapshotStore};
