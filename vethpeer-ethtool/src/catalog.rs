//! Counter catalog and counter snapshot buffers

use crate::sys::ETH_GSTRING_LEN;

/// Driver counter names as fixed-width `ETH_GSTRING_LEN` records
///
/// Records are opaque bytes: a name fills its slot up to the first NUL, or the
/// whole slot when the driver did not NUL-terminate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterCatalog {
    data: Vec<u8>,
}

impl CounterCatalog {
    /// Zeroed catalog with room for `n` names
    #[must_use]
    pub fn with_slots(n: usize) -> Self {
        Self {
            data: vec![0; n * ETH_GSTRING_LEN],
        }
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / ETH_GSTRING_LEN
    }

    /// Whether the catalog has no slots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw slot storage, `len() * ETH_GSTRING_LEN` bytes
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Store `name` in slot `index`, truncated to the slot width
    ///
    /// Returns `false` if `index` is out of range.
    pub fn set(&mut self, index: usize, name: &[u8]) -> bool {
        let Some(slot) = self.data.chunks_exact_mut(ETH_GSTRING_LEN).nth(index) else {
            return false;
        };
        let len = name.len().min(ETH_GSTRING_LEN);
        slot.fill(0);
        slot[..len].copy_from_slice(&name[..len]);
        true
    }

    /// Iterate over the raw slots in driver order
    pub fn slots(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(ETH_GSTRING_LEN)
    }

    /// Position of the first slot exactly equal to `name`
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots().position(|slot| slot_matches(slot, name.as_bytes()))
    }
}

/// Exact fixed-width comparison of one record against `name`
fn slot_matches(slot: &[u8], name: &[u8]) -> bool {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    &slot[..end] == name
}

/// Driver counter values, one `u64` per catalog slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    values: Vec<u64>,
}

impl CounterSnapshot {
    /// Zeroed snapshot with room for `n` values
    #[must_use]
    pub fn with_slots(n: usize) -> Self {
        Self { values: vec![0; n] }
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mutable value storage
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.values
    }

    /// Value at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u64> {
        self.values.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&[u8]]) -> CounterCatalog {
        let mut catalog = CounterCatalog::with_slots(names.len());
        for (i, name) in names.iter().enumerate() {
            assert!(catalog.set(i, name));
        }
        catalog
    }

    #[test]
    fn test_position_exact_match() {
        let catalog = catalog(&[b"rx_queue_0_xdp_packets", b"peer_ifindex", b"tx_drops"]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.position("peer_ifindex"), Some(1));
        assert_eq!(catalog.position("tx_drops"), Some(2));
    }

    #[test]
    fn test_position_rejects_prefixes() {
        let catalog = catalog(&[b"peer_ifindex_old", b"peer"]);

        assert_eq!(catalog.position("peer_ifindex"), None);
        assert_eq!(catalog.position("peer_if"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = catalog(&[b"a", b"peer_ifindex", b"peer_ifindex"]);
        assert_eq!(catalog.position("peer_ifindex"), Some(1));
    }

    #[test]
    fn test_full_width_name_without_nul() {
        let name = [b'x'; ETH_GSTRING_LEN];
        let catalog = catalog(&[&name]);

        assert_eq!(catalog.position(&"x".repeat(ETH_GSTRING_LEN)), Some(0));
        assert_eq!(catalog.position(&"x".repeat(ETH_GSTRING_LEN - 1)), None);
    }

    #[test]
    fn test_overlong_name_is_truncated() {
        let long = [b'y'; ETH_GSTRING_LEN + 8];
        let catalog = catalog(&[&long]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.position(&"y".repeat(ETH_GSTRING_LEN)), Some(0));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = CounterCatalog::with_slots(0);

        assert!(catalog.is_empty());
        assert_eq!(catalog.position("peer_ifindex"), None);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut catalog = CounterCatalog::with_slots(1);
        assert!(!catalog.set(1, b"nope"));
    }

    #[test]
    fn test_snapshot_access() {
        let mut snapshot = CounterSnapshot::with_slots(3);
        snapshot.as_mut_slice()[2] = 7;

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get(2), Some(7));
        assert_eq!(snapshot.get(3), None);
    }
}
