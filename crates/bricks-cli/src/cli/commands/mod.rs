//! CLI command handlers, one per file.

mod can_fetch;
mod checksum;
mod fetch;
mod headers;
mod meta;
mod process;

pub use can_fetch::run_can_fetch;
pub use checksum::run_checksum;
pub use fetch::run_fetch;
pub use headers::run_headers;
pub use meta::run_meta;
pub use process::run_process;
