//! Reentrant synchronization for event and machine fields.
//!
//! Dispatch needs two logical access levels over the same data: shared
//! sections for transition selection and exclusive sections for appends and
//! whole-dispatch serialization. Both levels are carried by one reentrant
//! mutex, so a thread that holds an exclusive section may open nested shared
//! sections without deadlocking; `Event::call` relies on exactly that when
//! it selects a transition while already serializing the dispatch.
//!
//! # Example
//!
//! ```rust
//! use impel::sync::Synchronized;
//!
//! let field = Synchronized::new(vec![1, 2]);
//!
//! field.exclusive(|items| items.push(3));
//! let len = field.shared(|items| items.len());
//!
//! assert_eq!(len, 3);
//! assert_eq!(field.get(), vec![1, 2, 3]);
//! ```

use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;

/// Thread-safe container for a mutable field.
///
/// All access happens through scoped sections that release the lock on every
/// exit path. The lock is reentrant per owning thread: `entered` followed by
/// a nested `shared` on the same thread is valid, which is the exact shape of
/// an event dispatch. The one forbidden nesting is opening `exclusive` while
/// the same thread is inside `shared` or `exclusive` on the same field; the
/// interior `RefCell` panics on that misuse instead of corrupting data.
pub struct Synchronized<T> {
    inner: ReentrantMutex<RefCell<T>>,
}

impl<T> Synchronized<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(value)),
        }
    }

    /// Run a shared (read) section.
    ///
    /// Blocks until the lock is available. Reentrant: may be opened while the
    /// calling thread already holds `entered` or another `shared` section on
    /// this field.
    pub fn shared<R>(&self, section: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.lock();
        let value = guard.borrow();
        section(&value)
    }

    /// Run an exclusive (write) section.
    ///
    /// Blocks until the lock is available and excludes all other threads for
    /// the duration of `section`.
    pub fn exclusive<R>(&self, section: impl FnOnce(&mut T) -> R) -> R {
        let guard = self.inner.lock();
        let mut value = guard.borrow_mut();
        section(&mut value)
    }

    /// Hold the exclusive level for the duration of `section` without
    /// borrowing the value.
    ///
    /// Used when an operation must serialize against writers but performs its
    /// reads through nested `shared` sections on the same thread.
    pub fn entered<R>(&self, section: impl FnOnce() -> R) -> R {
        let _guard = self.inner.lock();
        section()
    }
}

impl<T: Clone> Synchronized<T> {
    /// Atomically read a copy of the value.
    pub fn get(&self) -> T {
        self.shared(T::clone)
    }

    /// Atomically replace the value.
    pub fn set(&self, value: T) {
        self.exclusive(|slot| *slot = value);
    }
}

impl<T: Default> Default for Synchronized<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Synchronized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.shared(|value| f.debug_tuple("Synchronized").field(value).finish())
    }
}
