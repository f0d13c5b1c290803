//! Asset model: kinds, the store, and reference sites.

mod kind;
mod site;
mod store;

pub use kind::AssetKind;
pub use site::{RawReference, ReferenceSite, UrlStyle};
pub use store::{Asset, AssetId, AssetStore};
