use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::{AcqRel, Acquire};
use log::warn;
#[cfg(test)]
use mockall::automock;
use crate::errors::observer_error::ObserverError;

/// Listener told when a park attempt finds no free slot.
#[cfg_attr(test, automock)]
pub trait CapacityObserver {
    fn capacity_full(&self) -> Result<(), ObserverError>;
}

impl<F> CapacityObserver for F
where
    F: Fn() -> Result<(), ObserverError>,
{
    fn capacity_full(&self) -> Result<(), ObserverError> {
        self()
    }
}

/// Observers in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn CapacityObserver + Send + Sync>>,
}

impl ObserverRegistry {
    pub fn register(&mut self, observer: Box<dyn CapacityObserver + Send + Sync>) {
        self.observers.push(observer);
    }

    /// Calls every observer once. A failing observer is logged and skipped over.
    pub fn notify_capacity_full(&self) {
        for (idx, observer) in self.observers.iter().enumerate() {
            if let Err(e) = observer.capacity_full() {
                warn!("observer #{idx} failed on capacity full: {e}");
            }
        }
    }
}

/// Counts full-lot events. Clones share the same counter.
#[derive(Clone)]
pub struct FullLotCounter {
    count: Arc<AtomicU32>,
}

impl FullLotCounter {
    pub fn new() -> Self {
        Self { count: Arc::new(AtomicU32::new(0)) }
    }

    pub fn count(&self) -> u32 {
        self.count.load(Acquire)
    }
}

impl CapacityObserver for FullLotCounter {
    fn capacity_full(&self) -> Result<(), ObserverError> {
        self.count.fetch_add(1, AcqRel);
        Ok(())
    }
}
