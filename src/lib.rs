pub mod catalog;
pub mod controller;
pub mod error;
pub mod list_record;
pub mod list_store;
pub mod preset;
pub mod query_links;
pub mod range_compress;
pub mod unique_name;

pub use catalog::{CatalogEntry, ItemStyle, ListCatalog, ListOrigin, ListPanelView};
pub use controller::{ListController, PanelState, RequestToken};
pub use error::{ListError, ListErrorCode};
pub use list_record::{ListKind, ListRecord};
pub use list_store::ListStore;
pub use preset::{HttpPresetProvider, PresetList, PresetProvider};
