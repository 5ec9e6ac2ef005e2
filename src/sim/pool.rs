//! Fixed-growable object pool
//!
//! Instances are never dropped while the pool lives: `release` flips the
//! active flag and `acquire` reinitializes the first free slot in place.
//! When every slot is busy the pool grows by one; it never shrinks.

/// An entity that can live in a [`Pool`]
pub trait Poolable {
    /// Arguments needed to (re)initialize an instance
    type Init;

    /// A free (inactive) instance used to pre-fill or grow the pool
    fn idle() -> Self;

    /// Overwrite every per-use field and mark the instance active
    fn reinit(&mut self, init: Self::Init);

    fn is_active(&self) -> bool;

    /// Mark free. Fields are left as-is; the next `reinit` overwrites them.
    fn deactivate(&mut self);
}

/// Index of a slot inside a pool. Only meaningful until released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    /// Pre-allocate `capacity` inactive instances
    pub fn new(capacity: usize) -> Self {
        let mut items = Vec::with_capacity(capacity);
        items.resize_with(capacity, T::idle);
        Self { items }
    }

    /// Take the first free instance (growing the pool if none is free)
    pub fn acquire(&mut self, init: T::Init) -> PoolHandle {
        let index = match self.items.iter().position(|item| !item.is_active()) {
            Some(i) => i,
            None => {
                self.items.push(T::idle());
                log::debug!("Pool grew to {} instances", self.items.len());
                self.items.len() - 1
            }
        };
        self.items[index].reinit(init);
        PoolHandle(index)
    }

    /// Return an instance to the pool. Releasing twice is harmless.
    pub fn release(&mut self, handle: PoolHandle) {
        if let Some(item) = self.items.get_mut(handle.0) {
            item.deactivate();
        }
    }

    /// Free every instance, keeping the backing storage
    pub fn release_all(&mut self) {
        for item in &mut self.items {
            item.deactivate();
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.items.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.items.get_mut(handle.0)
    }

    /// Number of backing instances (active or not)
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    /// Active instances with their handles, in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_active())
            .map(|(i, item)| (PoolHandle(i), item))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .filter(|(_, item)| item.is_active())
            .map(|(i, item)| (PoolHandle(i), item))
    }

    /// Handles of the currently active instances (snapshot)
    pub fn active_handles(&self) -> Vec<PoolHandle> {
        self.iter_active().map(|(h, _)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Dummy {
        value: u32,
        active: bool,
    }

    impl Poolable for Dummy {
        type Init = u32;

        fn idle() -> Self {
            Self {
                value: 0,
                active: false,
            }
        }

        fn reinit(&mut self, init: u32) {
            self.value = init;
            self.active = true;
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    #[test]
    fn test_preallocates_inactive() {
        let pool: Pool<Dummy> = Pool::new(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_acquire_reuses_first_free_slot() {
        let mut pool: Pool<Dummy> = Pool::new(3);
        let a = pool.acquire(1);
        let b = pool.acquire(2);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);

        pool.release(a);
        let c = pool.acquire(3);
        assert_eq!(c.index(), 0);
        assert_eq!(pool.get(c).map(|d| d.value), Some(3));
    }

    #[test]
    fn test_grows_when_exhausted() {
        let mut pool: Pool<Dummy> = Pool::new(2);
        pool.acquire(1);
        pool.acquire(2);
        let h = pool.acquire(3);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(h.index(), 2);
    }

    #[test]
    fn test_release_twice_is_harmless() {
        let mut pool: Pool<Dummy> = Pool::new(3);
        let a = pool.acquire(1);
        let b = pool.acquire(2);
        pool.release(a);
        pool.release(a);

        assert!(!pool.get(a).map(|d| d.active).unwrap_or(true));
        let other = pool.get(b).cloned();
        assert!(other.as_ref().is_some_and(|d| d.active && d.value == 2));
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_release_all_keeps_capacity() {
        let mut pool: Pool<Dummy> = Pool::new(2);
        for i in 0..5 {
            pool.acquire(i);
        }
        assert_eq!(pool.capacity(), 5);
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 5);
    }

    proptest! {
        #[test]
        fn prop_release_then_reacquire_never_allocates(n in 1usize..40) {
            let mut pool: Pool<Dummy> = Pool::new(4);
            let handles: Vec<_> = (0..n as u32).map(|i| pool.acquire(i)).collect();
            let size = pool.capacity();
            for h in handles {
                pool.release(h);
            }
            for i in 0..n as u32 {
                pool.acquire(i);
            }
            prop_assert_eq!(pool.capacity(), size);
            prop_assert_eq!(pool.active_count(), n);
        }
    }
}
