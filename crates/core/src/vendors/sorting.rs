use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::operations::{filter_vendors, VendorFilter};
use super::types::{Vendor, VendorStatus};
use crate::format::finite_or_zero;

/// Secondary sort key applied after the booked-first grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorSortKey {
    #[default]
    Name,
    Category,
    Status,
    Cost,
}

/// Sort direction for the secondary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Flips the direction, as clicking the same column header twice does.
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_by_key(a: &Vendor, b: &Vendor, key: VendorSortKey) -> Ordering {
    match key {
        VendorSortKey::Name => compare_text(&a.name, &b.name),
        VendorSortKey::Category => compare_text(&a.category, &b.category),
        VendorSortKey::Status => status_rank(a).cmp(&status_rank(b)),
        VendorSortKey::Cost => finite_or_zero(a.cost).total_cmp(&finite_or_zero(b.cost)),
    }
}

fn status_rank(vendor: &Vendor) -> u8 {
    if vendor.booked() {
        VendorStatus::Booked.rank()
    } else {
        vendor.status.rank()
    }
}

/// Sorts vendors in place: booked vendors always come first, then the
/// chosen key in the chosen direction. The sort is stable, so vendors that
/// compare equal keep their incoming order.
pub fn sort_vendors(vendors: &mut [Vendor], key: VendorSortKey, direction: SortDirection) {
    vendors.sort_by(|a, b| {
        let booked_cmp = b.booked().cmp(&a.booked());
        if booked_cmp != Ordering::Equal {
            return booked_cmp;
        }
        direction.apply(compare_by_key(a, b, key))
    });
}

/// Filters, then sorts: the list a vendor table shows.
pub fn arrange_vendors(
    vendors: &[Vendor],
    filter: &VendorFilter,
    key: VendorSortKey,
    direction: SortDirection,
) -> Vec<Vendor> {
    let mut selected: Vec<Vendor> = filter_vendors(vendors, filter).into_iter().cloned().collect();
    sort_vendors(&mut selected, key, direction);
    selected
}
