use std::sync::Arc;
use std::time::Duration;

use planhaus_core::vendors::{
    arrange_vendors, SortDirection, Vendor, VendorFilter, VendorSortKey, VendorStatus,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;

/// Table controls that apply without delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorControls {
    pub category: Option<String>,
    pub status: Option<VendorStatus>,
    pub sort_key: VendorSortKey,
    pub direction: SortDirection,
}

/// Live vendor table: search is debounced, the other controls and source
/// refreshes recompute at once. The arranged list is published on a
/// `watch` channel.
#[derive(Debug)]
pub struct VendorListView {
    source: watch::Sender<Arc<Vec<Vendor>>>,
    controls: watch::Sender<VendorControls>,
    search: Debouncer<String>,
    output: watch::Receiver<Arc<Vec<Vendor>>>,
    task: JoinHandle<()>,
}

impl VendorListView {
    pub fn new(vendors: Arc<Vec<Vendor>>, search_delay: Duration) -> Self {
        let controls = VendorControls::default();
        let initial = Arc::new(arrange(&vendors, "", &controls));

        let (source, mut source_rx) = watch::channel(vendors);
        let (controls, mut controls_rx) = watch::channel(controls);
        let search = Debouncer::new(String::new(), search_delay);
        let mut search_rx = search.subscribe();
        let (output_tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = source_rx.changed() => if res.is_err() { break },
                    res = controls_rx.changed() => if res.is_err() { break },
                    res = search_rx.changed() => if res.is_err() { break },
                }
                let vendors = source_rx.borrow_and_update().clone();
                let controls = controls_rx.borrow_and_update().clone();
                let term = search_rx.borrow_and_update().clone();
                output_tx.send_replace(Arc::new(arrange(&vendors, &term, &controls)));
            }
        });

        Self {
            source,
            controls,
            search,
            output,
            task,
        }
    }

    /// Replaces the source list, e.g. after the cache refetched it.
    pub fn set_vendors(&self, vendors: Arc<Vec<Vendor>>) {
        self.source.send_replace(vendors);
    }

    /// Updates the search term; the list follows after the debounce delay.
    pub fn set_search(&self, term: impl Into<String>) {
        self.search.push(term.into());
    }

    pub fn set_category(&self, category: Option<String>) {
        self.controls.send_modify(|c| c.category = category);
    }

    pub fn set_status(&self, status: Option<VendorStatus>) {
        self.controls.send_modify(|c| c.status = status);
    }

    /// Sorts by `key`; choosing the current key again flips the direction.
    pub fn sort_by(&self, key: VendorSortKey) {
        self.controls.send_modify(|c| {
            if c.sort_key == key {
                c.direction = c.direction.toggle();
            } else {
                c.sort_key = key;
                c.direction = SortDirection::Asc;
            }
        });
    }

    pub fn controls(&self) -> VendorControls {
        self.controls.borrow().clone()
    }

    /// The arranged list as last published.
    pub fn current(&self) -> Arc<Vec<Vendor>> {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Vendor>>> {
        self.output.clone()
    }
}

impl Drop for VendorListView {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn arrange(vendors: &[Vendor], term: &str, controls: &VendorControls) -> Vec<Vendor> {
    let filter = VendorFilter {
        search: Some(term.to_string()),
        category: controls.category.clone(),
        status: controls.status,
    };
    arrange_vendors(vendors, &filter, controls.sort_key, controls.direction)
}
