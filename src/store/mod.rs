//! Store Module
//!
//! In-memory key-value mapping shared by every connection.
//!
//! ## Responsibilities
//! - Hold string keys and string values for the life of the process
//! - Serialize all access behind one coarse mutex
//! - Apply multi-field writes as a single atomic batch
//!
//! ## Data Structure Choice
//! Using BTreeMap wrapped in a parking_lot Mutex:
//! - One lock for readers and writers, so a batch written by `set_many` is
//!   never observed half-applied
//! - Ordered keys make `get_all` snapshots deterministic
//! - No durability: the store starts empty at every process start

mod table;

pub use table::Store;
