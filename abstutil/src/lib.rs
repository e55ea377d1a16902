//! Utilities shared by every crate in the workspace: tag maps, deterministic collections, JSON
//! I/O, logging setup, and a hierarchial `Timer`.

#[macro_use]
extern crate log;

mod collections;
mod io;
pub mod logger;
mod tags;
mod time;
mod utils;

pub use crate::collections::{Counter, MultiMap};
pub use crate::io::{
    deserialize_btreemap, maybe_read_json, read_json, serialize_btreemap, to_json, write_json,
};
pub use crate::tags::Tags;
pub use crate::time::{elapsed_seconds, Timer};
pub use crate::utils::{prettyprint_time, prettyprint_usize};

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
