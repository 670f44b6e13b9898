//! Time-aware views over cached data.

mod debounce;
mod vendor_list;

pub use debounce::Debouncer;
pub use vendor_list::{VendorControls, VendorListView};
