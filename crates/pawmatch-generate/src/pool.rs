use pawmatch_core::{Money, Pet};

/// Pets that have not been adopted yet.
///
/// The pool only ever shrinks: a pet taken once is gone for the rest of the
/// run. Slots are addressed by position in the input pet table, and every
/// query walks them in that order so results are deterministic.
#[derive(Debug, Clone)]
pub struct PetPool<'a> {
    pets: &'a [Pet],
    available: Vec<bool>,
    remaining: usize,
}

impl<'a> PetPool<'a> {
    pub fn new(pets: &'a [Pet]) -> Self {
        Self {
            pets,
            available: vec![true; pets.len()],
            remaining: pets.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove a pet from the pool. Returns `None` if the slot was already
    /// taken or does not exist.
    pub fn take(&mut self, slot: usize) -> Option<&'a Pet> {
        let flag = self.available.get_mut(slot)?;
        if !*flag {
            return None;
        }
        *flag = false;
        self.remaining -= 1;
        self.pets.get(slot)
    }

    /// Available pets with their slots, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Pet)> + '_ {
        let pets = self.pets;
        self.available
            .iter()
            .enumerate()
            .filter(|(_, available)| **available)
            .map(move |(slot, _)| (slot, &pets[slot]))
    }

    /// Slots of available pets satisfying `predicate`.
    pub fn slots_where(&self, mut predicate: impl FnMut(&Pet) -> bool) -> Vec<usize> {
        self.iter()
            .filter(|(_, pet)| predicate(pet))
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn cheapest_fee(&self) -> Option<Money> {
        self.iter().map(|(_, pet)| pet.adoption_fee).min()
    }
}
