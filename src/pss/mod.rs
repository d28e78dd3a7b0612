//! # Game data layer
//!
//! Everything between the remote game API and a finished reply text lives
//! here. The command layer in [crate::bot] only decides *which* of these
//! pieces to call.
//!
//! ## Components
//!
//! - [`api`] - endpoint URLs and the [`api::Fetcher`] transport seam
//! - [`cache`] - raw XML payloads on disk with reuse and half-day policies
//! - [`xml`] - flattening nested XML into attribute tables and typed records
//! - [`resolver`] - fuzzy name matching shared by every lookup
//! - [`paginate`] - packing reply lines under the 2000 character cap
//! - [`data`] - immutable [`data::GameData`] snapshots and the [`data::DataStore`]
//! - [`character`], [`prestige`], [`item`], [`research`], [`room`],
//!   [`collection`], [`market`] - typed records and their formatters
//!
//! Formatters return `Option`: `None` means the query matched nothing and the
//! caller chooses the "could not find" wording.

pub mod api;
pub mod cache;
pub mod character;
pub mod collection;
pub mod data;
pub mod errors;
pub mod item;
pub mod market;
pub mod paginate;
pub mod prestige;
pub mod research;
pub mod resolver;
pub mod room;
pub mod xml;

pub use data::{DataStore, GameData};
pub use errors::{PssError, PssResult};
