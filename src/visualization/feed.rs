use std::collections::BTreeMap;

use crate::buffers::ChannelBufferStore;
use crate::core::{ChannelId, Point};

/// Consumer side of the channel store: one `drain_all` per render tick
#[derive(Clone)]
pub struct ChartFeed {
    store: ChannelBufferStore,
}

impl ChartFeed {
    pub fn new(store: ChannelBufferStore) -> Self {
        Self { store }
    }

    pub fn drain(&self, channel: &str) -> Vec<Point> {
        self.store.drain_points(channel)
    }

    /// Drain every known channel; channels with nothing new map to an empty vec
    pub fn drain_all(&self) -> BTreeMap<ChannelId, Vec<Point>> {
        self.store
            .channels()
            .into_iter()
            .map(|channel| {
                let points = self.store.drain_points(&channel);
                (channel, points)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sample;

    #[test]
    fn test_drain_all_maps_samples_to_points() {
        let store = ChannelBufferStore::new();
        store.append("A", &[Sample::new(1.5, 10.0, 0.0), Sample::new(1.6, 11.0, 1.0)]);
        store.append("B", &[Sample::new(-0.2, 10.0, 0.0)]);

        let feed = ChartFeed::new(store.clone());
        let frame = feed.drain_all();

        assert_eq!(frame["A"], vec![Point { x: 10.0, y: 1.5 }, Point { x: 11.0, y: 1.6 }]);
        assert_eq!(frame["B"], vec![Point { x: 10.0, y: -0.2 }]);

        let next = feed.drain_all();
        assert!(next.values().all(Vec::is_empty));
        assert_eq!(next.len(), 2);
    }
}
