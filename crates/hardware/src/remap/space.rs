//! Remappable index space.
//!
//! A bijection over `0..n` stored as a forward (logical -> physical) and a
//! reverse (physical -> logical) vector. The only mutation is [`RemapSpace::swap`],
//! which exchanges the physical targets of two logical indices and updates both
//! directions together, so the bijection holds after every call.
//!
//! The same type serves vaults, banks and per-row bank redirection.

/// A bijection over `0..len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapSpace {
    forward: Vec<u32>,
    reverse: Vec<u32>,
}

impl RemapSpace {
    /// Creates the identity mapping over `0..len`.
    pub fn new(len: u32) -> Self {
        let identity: Vec<u32> = (0..len).collect();
        Self {
            forward: identity.clone(),
            reverse: identity,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> u32 {
        self.forward.len() as u32
    }

    /// Returns `true` for an empty space.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Physical index of `logical`.
    #[inline]
    pub fn physical(&self, logical: u32) -> Option<u32> {
        self.forward.get(logical as usize).copied()
    }

    /// Logical index currently mapped to `physical`.
    #[inline]
    pub fn logical(&self, physical: u32) -> Option<u32> {
        self.reverse.get(physical as usize).copied()
    }

    /// Returns `true` if `logical` maps to itself.
    pub fn is_home(&self, logical: u32) -> bool {
        self.physical(logical) == Some(logical)
    }

    /// Returns `true` if every index maps to itself.
    pub fn is_identity(&self) -> bool {
        self.forward.iter().enumerate().all(|(l, &p)| l as u32 == p)
    }

    /// Logical indices that do not map to themselves.
    pub fn displaced(&self) -> impl Iterator<Item = u32> + '_ {
        self.forward
            .iter()
            .enumerate()
            .filter(|&(l, &p)| l as u32 != p)
            .map(|(l, _)| l as u32)
    }

    /// Exchanges the physical targets of logical `a` and `b`.
    ///
    /// # Returns
    ///
    /// `false` (and no change) if either index is out of range.
    pub fn swap(&mut self, a: u32, b: u32) -> bool {
        let (Some(pa), Some(pb)) = (self.physical(a), self.physical(b)) else {
            return false;
        };
        self.forward[a as usize] = pb;
        self.forward[b as usize] = pa;
        self.reverse[pb as usize] = a;
        self.reverse[pa as usize] = b;
        debug_assert_eq!(self.logical(pa), Some(b));
        debug_assert_eq!(self.logical(pb), Some(a));
        true
    }

    /// Sends `logical` back to its own physical index.
    ///
    /// The logical index currently occupying that physical slot takes over
    /// `logical`'s old target.
    ///
    /// # Returns
    ///
    /// The displaced logical index that moved, or `None` if `logical` was
    /// already home or out of range.
    pub fn reset(&mut self, logical: u32) -> Option<u32> {
        if self.is_home(logical) {
            return None;
        }
        let occupant = self.logical(logical)?;
        self.swap(logical, occupant).then_some(occupant)
    }

    /// Checks that forward and reverse agree for every index.
    pub fn is_bijection(&self) -> bool {
        self.forward.len() == self.reverse.len()
            && self
                .forward
                .iter()
                .enumerate()
                .all(|(l, &p)| self.reverse.get(p as usize) == Some(&(l as u32)))
    }
}
