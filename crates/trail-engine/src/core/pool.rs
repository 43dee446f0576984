use std::collections::BTreeSet;
use crate::api::types::ElementId;

/// Default number of parked elements kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 50;

/// Where `acquire` found its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// Popped from the parked stack; the surface already knows it.
    Reused(ElementId),
    /// Newly allocated; the surface must construct it.
    Fresh(ElementId),
}

impl Acquired {
    pub fn id(self) -> ElementId {
        match self {
            Acquired::Reused(id) | Acquired::Fresh(id) => id,
        }
    }
}

/// What `release` did with its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// Hidden and pushed onto the parked stack.
    Parked,
    /// The stack was full; the element must be torn down.
    Destroyed,
    /// The element was not active. Nothing changed.
    NotActive,
}

/// Bookkeeping for pooled trail elements.
///
/// Every id handed out is in exactly one of: the active set, the parked
/// stack, or destroyed (never seen again). Membership is tracked per id so
/// a second `release` of the same element cannot corrupt the counts.
#[derive(Debug)]
pub struct ElementPool {
    parked: Vec<ElementId>,
    active: BTreeSet<ElementId>,
    capacity: usize,
    next_id: u32,
    destroyed: usize,
}

impl ElementPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            parked: Vec::with_capacity(capacity),
            active: BTreeSet::new(),
            capacity,
            next_id: 0,
            destroyed: 0,
        }
    }

    /// Take the most recently parked element, or allocate a new one.
    pub fn acquire(&mut self) -> Acquired {
        let acquired = match self.parked.pop() {
            Some(id) => Acquired::Reused(id),
            None => {
                let id = ElementId(self.next_id);
                self.next_id += 1;
                Acquired::Fresh(id)
            }
        };
        self.active.insert(acquired.id());
        acquired
    }

    /// Return an active element. Parks it while below capacity, otherwise
    /// reports it for destruction. Releasing a non-active id is a no-op.
    pub fn release(&mut self, id: ElementId) -> Released {
        if !self.active.remove(&id) {
            return Released::NotActive;
        }
        if self.parked.len() < self.capacity {
            self.parked.push(id);
            Released::Parked
        } else {
            self.destroyed += 1;
            Released::Destroyed
        }
    }

    pub fn is_active(&self, id: ElementId) -> bool {
        self.active.contains(&id)
    }

    pub fn is_parked(&self, id: ElementId) -> bool {
        self.parked.contains(&id)
    }

    /// Active ids in ascending order.
    pub fn active_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.active.iter().copied()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn parked_len(&self) -> usize {
        self.parked.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements ever constructed.
    pub fn constructed(&self) -> usize {
        self.next_id as usize
    }

    /// Number of elements torn down because the pool was full.
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl Default for ElementPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(pool: &ElementPool) {
        for id in pool.active_ids() {
            assert!(!pool.is_parked(id), "{:?} is both active and parked", id);
        }
        assert!(pool.active_len() <= pool.constructed());
        assert_eq!(
            pool.active_len() + pool.parked_len() + pool.destroyed(),
            pool.constructed()
        );
    }

    #[test]
    fn acquire_constructs_when_empty() {
        let mut pool = ElementPool::new(4);
        assert_eq!(pool.acquire(), Acquired::Fresh(ElementId(0)));
        assert_eq!(pool.acquire(), Acquired::Fresh(ElementId(1)));
        assert_eq!(pool.active_len(), 2);
        assert_disjoint(&pool);
    }

    #[test]
    fn reuse_is_lifo() {
        let mut pool = ElementPool::new(4);
        let a = pool.acquire().id();
        let b = pool.acquire().id();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.acquire(), Acquired::Reused(b));
        assert_eq!(pool.acquire(), Acquired::Reused(a));
        assert_eq!(pool.constructed(), 2);
        assert_disjoint(&pool);
    }

    #[test]
    fn capacity_boundary_destroys_exactly_one() {
        let capacity = DEFAULT_POOL_CAPACITY;
        let mut pool = ElementPool::new(capacity);
        let ids: Vec<_> = (0..=capacity).map(|_| pool.acquire().id()).collect();
        let outcomes: Vec<_> = ids.iter().map(|id| pool.release(*id)).collect();

        let destroyed = outcomes.iter().filter(|o| **o == Released::Destroyed).count();
        assert_eq!(destroyed, 1);
        assert_eq!(*outcomes.last().unwrap(), Released::Destroyed);
        assert_eq!(pool.parked_len(), capacity);
        assert_eq!(pool.destroyed(), 1);
        assert_eq!(pool.active_len(), 0);
        assert_disjoint(&pool);
    }

    #[test]
    fn double_release_is_idempotent() {
        let mut pool = ElementPool::new(4);
        let a = pool.acquire().id();
        let _b = pool.acquire().id();

        assert_eq!(pool.release(a), Released::Parked);
        let (active, parked) = (pool.active_len(), pool.parked_len());
        assert_eq!(pool.release(a), Released::NotActive);
        assert_eq!((pool.active_len(), pool.parked_len()), (active, parked));
        assert_disjoint(&pool);
    }

    #[test]
    fn release_of_unknown_id_is_noop() {
        let mut pool = ElementPool::new(4);
        assert_eq!(pool.release(ElementId(77)), Released::NotActive);
        assert_eq!(pool.parked_len(), 0);
    }

    #[test]
    fn zero_capacity_never_parks() {
        let mut pool = ElementPool::new(0);
        let a = pool.acquire().id();
        assert_eq!(pool.release(a), Released::Destroyed);
        assert_eq!(pool.acquire(), Acquired::Fresh(ElementId(1)));
    }

    #[test]
    fn mixed_sequence_keeps_sets_disjoint() {
        let mut pool = ElementPool::new(3);
        let mut live = Vec::new();
        for step in 0..40u32 {
            if step % 3 == 2 && !live.is_empty() {
                let id = live.remove((step as usize * 7) % live.len());
                pool.release(id);
                pool.release(id);
            } else {
                live.push(pool.acquire().id());
            }
            assert_disjoint(&pool);
            assert!(pool.parked_len() <= pool.capacity());
        }
    }
}
