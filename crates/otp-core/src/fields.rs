//! Lookup table of live field handles.
//!
//! The controller never owns fields. Hosts attach a handle when a field is
//! rendered and detach it when it goes away; focus and blur commands are only
//! issued for attached slots.

/// Opaque host identifier for one rendered input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldHandle(pub u64);

/// Indexed table of optional field handles, one slot per digit.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    slots: Vec<Option<FieldHandle>>,
}

impl FieldRegistry {
    pub fn new(pin_count: usize) -> Self {
        Self {
            slots: vec![None; pin_count],
        }
    }

    /// Attaches a handle to slot `index`. Out-of-range indices are ignored.
    pub fn attach(&mut self, index: usize, handle: FieldHandle) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(handle);
        }
    }

    pub fn detach(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn detach_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn get(&self, index: usize) -> Option<FieldHandle> {
        self.slots.get(index).copied().flatten()
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Indices of all attached fields, in order.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|_| index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_out_of_range_is_ignored() {
        let mut fields = FieldRegistry::new(2);
        fields.attach(5, FieldHandle(5));
        assert_eq!(fields.live_indices().count(), 0);
    }

    #[test]
    fn test_detach_all() {
        let mut fields = FieldRegistry::new(3);
        fields.attach(0, FieldHandle(10));
        fields.attach(2, FieldHandle(12));
        assert_eq!(fields.live_indices().collect::<Vec<_>>(), vec![0, 2]);
        fields.detach_all();
        assert!(!fields.is_live(0));
        assert!(!fields.is_live(2));
    }
}
