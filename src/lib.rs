// Library root
// -----------
// A small blocking client for the ThunderDrive web service plus the pieces
// the interactive CLI (`main.rs`) is built from.
//
// Module responsibilities:
// - `config`: where the service lives and how far listings may paginate.
// - `error`: the `DriveError` taxonomy returned by every operation.
// - `models`: JSON shapes exchanged with the service.
// - `paging`: the page-walking loop behind full folder listings.
// - `api`: `DriveSession`, the authenticated session and its operations.
// - `ui`: terminal menu flows that delegate to `api`.
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod paging;
pub mod ui;

pub use api::DriveSession;
pub use config::DriveConfig;
pub use error::{DriveError, Result};
