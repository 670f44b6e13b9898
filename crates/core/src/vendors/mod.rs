mod error;
mod operations;
mod sorting;
mod types;

pub use error::VendorError;
pub use operations::{
    filter_vendors, validate_new_vendor, validate_vendor_patch, vendor_categories, VendorFilter,
};
pub use sorting::{arrange_vendors, sort_vendors, SortDirection, VendorSortKey};
pub use types::{NewVendor, Vendor, VendorPatch, VendorStatus};
