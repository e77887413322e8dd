use crate::replacement_policies::ReplacementPolicy;

/// A single cache line. Lines are reused in place for the lifetime of the cache, a line with no
/// tag is free
///
/// Validity is carried by the tag itself being present, so a tag of 0 is an ordinary tag and is
/// never mistaken for a free slot
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct CacheLine {
    tag: Option<u64>,
    dirty: bool,
    /// Replacement policy bookkeeping, see the individual policies for its meaning
    pub metric: u64,
}

impl CacheLine {
    /// A valid line holding `tag`
    pub fn occupied(tag: u64, dirty: bool, metric: u64) -> Self {
        Self { tag: Some(tag), dirty, metric }
    }

    pub fn tag(&self) -> Option<u64> {
        self.tag
    }

    pub fn is_valid(&self) -> bool {
        self.tag.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// The line displaced by [`SetAssociativeStore::overwrite`]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Eviction {
    pub tag: u64,
    pub was_dirty: bool,
}

/// The fixed grid of sets and lines
///
/// Like a real cache this is one flat array, set `n` occupies the `associativity` lines starting
/// at `n * associativity`. Slots are always scanned in ascending order
#[derive(Debug)]
pub struct SetAssociativeStore {
    lines: Vec<CacheLine>,
    associativity: usize,
}

impl SetAssociativeStore {
    pub fn new(num_sets: u64, associativity: u64) -> Self {
        Self {
            lines: vec![CacheLine::default(); (num_sets * associativity) as usize],
            associativity: associativity as usize,
        }
    }

    /// The lines of the set at `index`, `None` past the last set
    pub fn set(&self, index: u64) -> Option<&[CacheLine]> {
        let lower = usize::try_from(index).ok()?.checked_mul(self.associativity)?;
        self.lines.get(lower..lower.checked_add(self.associativity)?)
    }

    pub(crate) fn set_mut(&mut self, index: u64) -> &mut [CacheLine] {
        let lower = index as usize * self.associativity;
        &mut self.lines[lower..lower + self.associativity]
    }

    /// Returns the slot of the first valid line in the set holding `tag`
    pub fn lookup(&self, tag: u64, index: u64) -> Option<usize> {
        self.set(index)?.iter().position(|line| line.tag == Some(tag))
    }

    /// Installs `tag` in the first free slot of the set, returning `None` when the set is full
    pub fn fill_empty<R: ReplacementPolicy>(&mut self, index: u64, tag: u64, dirty: bool, policy: &mut R) -> Option<usize> {
        let set = self.set_mut(index);
        let slot = set.iter().position(|line| !line.is_valid())?;
        set[slot] = CacheLine::occupied(tag, dirty, 0);
        policy.on_insert(set, slot);
        Some(slot)
    }

    /// Replaces the line at `slot`, reporting what was there so the caller can account for dirty
    /// write-backs
    ///
    /// # Arguments
    ///
    /// * `index`: The set
    /// * `slot`: The victim, which must be valid
    /// * `tag`: The incoming tag
    /// * `dirty`: The dirty state of the incoming line
    /// * `policy`: Reinitialises the incoming line's metric
    ///
    /// returns: Eviction
    pub fn overwrite<R: ReplacementPolicy>(&mut self, index: u64, slot: usize, tag: u64, dirty: bool, policy: &mut R) -> Eviction {
        let set = self.set_mut(index);
        let previous = set[slot];
        debug_assert!(previous.is_valid(), "overwrite called on a free slot");
        set[slot] = CacheLine::occupied(tag, dirty, 0);
        policy.on_insert(set, slot);
        Eviction {
            tag: previous.tag.unwrap_or_default(),
            was_dirty: previous.dirty,
        }
    }

    pub(crate) fn line_mut(&mut self, index: u64, slot: usize) -> &mut CacheLine {
        &mut self.set_mut(index)[slot]
    }

    /// Lines which have never been filled. Useful for analysing cache performance or debugging
    pub fn get_uninitialised_line_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.is_valid()).count()
    }
}
