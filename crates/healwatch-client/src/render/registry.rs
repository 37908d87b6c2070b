use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::render::sink::{ChartData, ChartUpdate};

#[derive(Debug)]
struct ChartHandle {
    data: ChartData,
    revision: u64,
}

/// Chart id -> live chart handle. Created lazily on first use.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: DashMap<String, ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self {
            charts: DashMap::new(),
        }
    }

    /// Create the chart on first use, otherwise replace its data in place.
    pub fn upsert(&self, id: &str, data: ChartData) -> ChartUpdate {
        match self.charts.entry(id.to_string()) {
            Entry::Occupied(mut e) => {
                let handle = e.get_mut();
                handle.data = data;
                handle.revision += 1;
                ChartUpdate::Updated {
                    revision: handle.revision,
                }
            }
            Entry::Vacant(e) => {
                e.insert(ChartHandle { data, revision: 0 });
                ChartUpdate::Created
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<ChartData> {
        self.charts.get(id).map(|h| h.data.clone())
    }

    pub fn revision(&self, id: &str) -> Option<u64> {
        self.charts.get(id).map(|h| h.revision)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
