//! Object pooling utilities for allocation reuse.
//!
//! Frame-based schedulers create a large number of short-lived objects every
//! frame (render commands, pass orders). This module provides two ways of
//! keeping those allocations alive across frames:
//!
//! - [`RecyclePool<T>`] - a bounded free list. Values are handed back after
//!   use and handed out again on the next frame. Anything recycled past the
//!   pool's watermark is dropped, so retained memory never grows unbounded.
//! - [`Pooled<T>`] - a single slot that keeps its value's capacity while the
//!   value is not in use.
//!
//! # Example
//!
//! ```
//! use framepass_core::pool::{Poolable, RecyclePool};
//!
//! #[derive(Debug, Default)]
//! struct Command {
//!     payload: Vec<u8>,
//! }
//!
//! impl Poolable for Command {
//!     fn new_empty() -> Self {
//!         Self::default()
//!     }
//!     fn reset(&mut self) {
//!         self.payload.clear();
//!     }
//! }
//!
//! let mut pool = RecyclePool::<Command>::with_capacity(2);
//! let retained = pool.recycle((0..3).map(|_| Command::new_empty()));
//! assert_eq!(retained, 2);
//! assert_eq!(pool.len(), 2);
//!
//! let cmd = pool.acquire();
//! assert!(cmd.payload.is_empty());
//! assert_eq!(pool.len(), 1);
//! ```

/// Default number of entries a [`RecyclePool`] retains.
pub const DEFAULT_POOL_CAPACITY: usize = 1024;

/// Trait for types that can be pooled and reused.
///
/// Implementors must be able to create an empty instance and clear their
/// contents while preserving allocated capacity.
pub trait Poolable {
    /// Create a new empty instance for pool initialization.
    fn new_empty() -> Self;

    /// Reset the value to an empty state, preserving allocated capacity.
    ///
    /// For example, call `Vec::clear()` rather than replacing with a new `Vec`.
    fn reset(&mut self);
}

/// A bounded free list of reusable values.
///
/// Values are reset when they are taken out of the pool with
/// [`acquire`](Self::acquire), never when they are put back, so a recycled
/// value keeps its state until someone reuses it.
#[derive(Debug)]
pub struct RecyclePool<T: Poolable> {
    free: Vec<T>,
    capacity: usize,
}

impl<T: Poolable> RecyclePool<T> {
    /// Create a pool retaining at most [`DEFAULT_POOL_CAPACITY`] values.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create a pool retaining at most `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
        }
    }

    /// Maximum number of values the pool retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values currently available for reuse.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Check if the pool holds no values.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Check if the pool reached its watermark.
    pub fn is_full(&self) -> bool {
        self.free.len() >= self.capacity
    }

    /// Take a value out of the pool, or create a new one if the pool is empty.
    ///
    /// Pooled values are reset before being returned.
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(mut value) => {
                value.reset();
                value
            }
            None => T::new_empty(),
        }
    }

    /// Hand values back to the pool.
    ///
    /// Values are retained until the pool reaches its capacity; the remainder
    /// are dropped. Returns the number of values retained.
    pub fn recycle<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut retained = 0;
        let mut dropped = 0;
        for value in values {
            if self.free.len() < self.capacity {
                self.free.push(value);
                retained += 1;
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            log::debug!(
                "RecyclePool: watermark of {} reached, dropped {} values",
                self.capacity,
                dropped
            );
        }
        crate::profile_plot!("pooled_values", self.free.len());

        retained
    }

    /// Drop every pooled value.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl<T: Poolable> Default for RecyclePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A slot that keeps its value's allocation while the value is not in use.
///
/// - [`Active`](Pooled::Active) - the value contains valid data and is in use
/// - [`Pooled`](Pooled::Pooled) - the value is cleared but its allocation is kept
#[derive(Debug)]
pub enum Pooled<T: Poolable> {
    /// The value is active and contains valid data.
    Active(T),
    /// The value is cleared but its allocation is preserved for reuse.
    Pooled(T),
}

impl<T: Poolable> Pooled<T> {
    /// Check if the value is active (contains valid data).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Check if the value is pooled (cleared, available for reuse).
    pub fn is_pooled(&self) -> bool {
        matches!(self, Self::Pooled(_))
    }

    /// Get the active value, or `None` if pooled.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Active(t) => Some(t),
            Self::Pooled(_) => None,
        }
    }

    /// Reset the value and mark the slot pooled. No-op if already pooled.
    pub fn release(&mut self) {
        if let Self::Active(t) = self {
            t.reset();
            let value = std::mem::replace(t, T::new_empty());
            *self = Self::Pooled(value);
        }
    }

    /// Mark the slot active and return the (cleared) value to fill in.
    pub fn activate(&mut self) -> &mut T {
        if let Self::Pooled(t) = self {
            let value = std::mem::replace(t, T::new_empty());
            *self = Self::Active(value);
        }
        match self {
            Self::Active(t) | Self::Pooled(t) => t,
        }
    }

    /// Get the inner value regardless of state.
    pub fn inner(&self) -> &T {
        match self {
            Self::Active(t) | Self::Pooled(t) => t,
        }
    }
}

impl<T: Poolable> Default for Pooled<T> {
    fn default() -> Self {
        Self::Pooled(T::new_empty())
    }
}
