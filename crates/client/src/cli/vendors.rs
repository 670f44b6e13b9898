//! Vendor CLI commands.

use clap::{Parser, Subcommand, ValueEnum};
use planhaus_core::vendors::{
    SortDirection as CoreSortDirection, VendorSortKey, VendorStatus as CoreVendorStatus,
};
use uuid::Uuid;

/// Vendor management commands.
#[derive(Debug, Parser)]
pub struct VendorsCommand {
    #[command(subcommand)]
    pub action: VendorsAction,
}

/// CLI vendor status (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VendorStatus {
    Researching,
    Contacted,
    Quoted,
    Booked,
    Declined,
}

impl From<VendorStatus> for CoreVendorStatus {
    fn from(s: VendorStatus) -> Self {
        match s {
            VendorStatus::Researching => CoreVendorStatus::Researching,
            VendorStatus::Contacted => CoreVendorStatus::Contacted,
            VendorStatus::Quoted => CoreVendorStatus::Quoted,
            VendorStatus::Booked => CoreVendorStatus::Booked,
            VendorStatus::Declined => CoreVendorStatus::Declined,
        }
    }
}

/// Column to sort by.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortBy {
    #[default]
    Name,
    Category,
    Status,
    Cost,
}

impl From<SortBy> for VendorSortKey {
    fn from(s: SortBy) -> Self {
        match s {
            SortBy::Name => VendorSortKey::Name,
            SortBy::Category => VendorSortKey::Category,
            SortBy::Status => VendorSortKey::Status,
            SortBy::Cost => VendorSortKey::Cost,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for CoreSortDirection {
    fn from(d: SortDirection) -> Self {
        match d {
            SortDirection::Asc => CoreSortDirection::Asc,
            SortDirection::Desc => CoreSortDirection::Desc,
        }
    }
}

/// Available vendor actions.
#[derive(Debug, Subcommand)]
pub enum VendorsAction {
    /// List vendors, booked first.
    List {
        /// Project ID.
        project_id: Uuid,
        /// Case-insensitive search over name, category and contact.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<VendorStatus>,
        #[arg(long, default_value = "name")]
        sort: SortBy,
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },
    /// Add a vendor.
    Add {
        /// Project ID.
        project_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "researching")]
        status: VendorStatus,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Quoted cost.
        #[arg(long)]
        cost: Option<f64>,
    },
    /// Delete a vendor.
    Delete {
        /// Project ID.
        project_id: Uuid,
        /// Vendor ID.
        id: Uuid,
    },
}
