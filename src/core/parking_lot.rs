use std::hash::Hash;
use ahash::AHashMap;
use log::{debug, warn};
use crate::core::driver::DriverType;
use crate::core::observer::{CapacityObserver, ObserverRegistry};
use crate::errors::parking_lot_error::ParkingLotError;

/// Fixed-size lot of numbered slots. Slot 0 is closest to the entrance.
///
/// `slots` and `index` always describe the same occupancy: `index[v] == i`
/// exactly when `slots[i]` holds `v`.
pub struct ParkingLot<V> {
    slots: Vec<Option<V>>,
    index: AHashMap<V, usize>,
    observers: ObserverRegistry,
}

impl<V> ParkingLot<V>
where
    V: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            index: AHashMap::with_capacity(capacity),
            observers: ObserverRegistry::default(),
        }
    }

    /// Throws away every slot and starts over with `capacity` empty ones.
    /// Registered observers are kept.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        debug!("resetting lot to {capacity} slots, dropping {} parked vehicles", self.index.len());
        self.slots = vec![None; capacity];
        self.index = AHashMap::with_capacity(capacity);
        self.slots.len()
    }

    pub fn register_observer<O>(&mut self, observer: O)
    where
        O: CapacityObserver + Send + Sync + 'static,
    {
        self.observers.register(Box::new(observer));
    }

    /// Parks `vehicle` and returns the slot it was given.
    ///
    /// Handicapped drivers get the lowest free slot, everyone else the
    /// highest. When the lot is full every observer is notified once before
    /// `ParkingLotFull` is returned.
    pub fn park(&mut self, vehicle: V, driver: DriverType) -> Result<usize, ParkingLotError> {
        if self.index.contains_key(&vehicle) {
            return Err(ParkingLotError::VehicleAlreadyParked);
        }
        let slot = match self.free_slot_for(driver) {
            Some(slot) => slot,
            None => {
                warn!("park refused, all {} slots taken", self.slots.len());
                self.observers.notify_capacity_full();
                return Err(ParkingLotError::ParkingLotFull);
            }
        };
        debug!("{:?} driver placed at slot {slot}", driver);
        self.slots[slot] = Some(vehicle.clone());
        self.index.insert(vehicle, slot);
        Ok(slot)
    }

    /// Frees the slot held by `vehicle` and returns its index.
    pub fn unpark(&mut self, vehicle: &V) -> Result<usize, ParkingLotError> {
        let slot = self.index.remove(vehicle).ok_or(ParkingLotError::VehicleNotFound)?;
        self.slots[slot] = None;
        debug!("slot {slot} released");
        Ok(slot)
    }

    pub fn find_vehicle(&self, vehicle: &V) -> Result<usize, ParkingLotError> {
        self.index.get(vehicle).copied().ok_or(ParkingLotError::VehicleNotFound)
    }

    pub fn is_vehicle_parked(&self, vehicle: &V) -> bool {
        self.index.contains_key(vehicle)
    }

    /// Free slot indices, ascending.
    pub fn empty_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, occupant)| occupant.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.index.len()
    }

    pub fn is_full(&self) -> bool {
        self.index.len() == self.slots.len()
    }

    fn free_slot_for(&self, driver: DriverType) -> Option<usize> {
        match driver {
            DriverType::Handicap => self.slots.iter().position(Option::is_none),
            DriverType::Normal => self.slots.iter().rposition(Option::is_none),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use crate::core::driver::DriverType::{Handicap, Normal};
    use crate::core::observer::{FullLotCounter, MockCapacityObserver};
    use crate::core::parking_lot::ParkingLot;
    use crate::errors::observer_error::ObserverError;
    use crate::errors::parking_lot_error::ParkingLotError;

    #[test]
    fn test_fresh_lot_is_all_empty() {
        for capacity in [0, 1, 3, 17] {
            let lot: ParkingLot<&str> = ParkingLot::new(capacity);
            assert_eq!((0..capacity).collect::<Vec<_>>(), lot.empty_slots());
            assert_eq!(capacity, lot.capacity());
            assert_eq!(0, lot.occupied());
        }
    }

    #[test]
    fn test_duplicate_park_is_rejected() {
        let mut lot = ParkingLot::new(4);
        assert_eq!(Ok(3), lot.park("KA-01", Normal));
        assert_eq!(Err(ParkingLotError::VehicleAlreadyParked), lot.park("KA-01", Handicap));
        assert_eq!(Ok(3), lot.find_vehicle(&"KA-01"));
        assert_eq!(vec![0, 1, 2], lot.empty_slots());
    }

    #[test]
    fn test_duplicate_park_on_full_lot_does_not_notify() {
        let mut observer = MockCapacityObserver::new();
        observer.expect_capacity_full().times(0);
        let mut lot = ParkingLot::new(1);
        lot.register_observer(observer);
        lot.park("A", Normal).unwrap();
        assert_eq!(Err(ParkingLotError::VehicleAlreadyParked), lot.park("A", Normal));
    }

    #[test]
    fn test_full_lot_notifies_every_observer_once() {
        let mut first = MockCapacityObserver::new();
        first.expect_capacity_full().times(1).returning(|| Ok(()));
        let mut second = MockCapacityObserver::new();
        second.expect_capacity_full().times(1).returning(|| Ok(()));

        let mut lot = ParkingLot::new(5);
        lot.register_observer(first);
        lot.register_observer(second);
        for i in 0..5 {
            assert!(lot.park(i, Normal).is_ok());
        }
        assert!(lot.is_full());
        assert_eq!(Err(ParkingLotError::ParkingLotFull), lot.park(5, Normal));
        assert!(!lot.is_vehicle_parked(&5));
    }

    #[test]
    fn test_every_full_attempt_notifies_again() {
        let counter = FullLotCounter::new();
        let mut lot = ParkingLot::new(1);
        lot.register_observer(counter.clone());
        lot.park("A", Handicap).unwrap();
        assert_eq!(0, counter.count());
        assert!(lot.park("B", Handicap).is_err());
        assert!(lot.park("C", Normal).is_err());
        assert_eq!(2, counter.count());
    }

    #[test]
    fn test_zero_capacity_is_always_full() {
        let counter = FullLotCounter::new();
        let mut lot = ParkingLot::new(0);
        lot.register_observer(counter.clone());
        assert_eq!(Err(ParkingLotError::ParkingLotFull), lot.park("A", Handicap));
        assert_eq!(1, counter.count());
        assert!(lot.empty_slots().is_empty());
    }

    #[test]
    fn test_failing_observer_still_reports_full() {
        let counter = FullLotCounter::new();
        let mut lot = ParkingLot::new(0);
        lot.register_observer(|| -> Result<(), ObserverError> { Err(ObserverError::new("sms gateway down")) });
        lot.register_observer(counter.clone());
        assert_eq!(Err(ParkingLotError::ParkingLotFull), lot.park("A", Normal));
        assert_eq!(1, counter.count());
    }

    #[test]
    fn test_placement_by_driver_type() {
        let mut lot = ParkingLot::new(4);
        lot.park("x", Handicap).unwrap();
        lot.park("y", Handicap).unwrap();
        lot.unpark(&"x").unwrap();
        // free: {0, 2, 3}
        assert_eq!(vec![0, 2, 3], lot.empty_slots());
        assert_eq!(Ok(0), lot.park("handicap", Handicap));
        lot.unpark(&"handicap").unwrap();
        assert_eq!(Ok(3), lot.park("normal", Normal));
    }

    #[test]
    fn test_unpark_frees_slot_for_reuse() {
        let mut lot = ParkingLot::new(2);
        lot.park("A", Normal).unwrap();
        lot.park("B", Normal).unwrap();
        assert_eq!(Ok(1), lot.unpark(&"A"));
        assert_eq!(Ok(1), lot.park("C", Handicap));
    }

    #[test]
    fn test_unpark_unknown_vehicle() {
        let mut lot = ParkingLot::new(2);
        assert_eq!(Err(ParkingLotError::VehicleNotFound), lot.unpark(&"ghost"));
        lot.park("A", Normal).unwrap();
        lot.unpark(&"A").unwrap();
        assert_eq!(Err(ParkingLotError::VehicleNotFound), lot.unpark(&"A"));
    }

    #[test]
    fn test_find_follows_park_and_unpark() {
        let mut lot = ParkingLot::new(6);
        let slot = lot.park("A", Handicap).unwrap();
        assert_eq!(Ok(slot), lot.find_vehicle(&"A"));
        lot.unpark(&"A").unwrap();
        assert_eq!(Err(ParkingLotError::VehicleNotFound), lot.find_vehicle(&"A"));
    }

    #[test]
    fn test_park_find_unpark_round_trip() {
        let mut lot = ParkingLot::new(3);
        lot.park("other", Normal).unwrap();
        let first = lot.park("A", Normal).unwrap();
        assert_eq!(Ok(first), lot.find_vehicle(&"A"));
        assert_eq!(Ok(first), lot.unpark(&"A"));
        assert!(!lot.is_vehicle_parked(&"A"));
        assert_eq!(Ok(0), lot.park("A", Handicap));
        assert!(lot.is_vehicle_parked(&"A"));
    }

    #[test]
    fn test_three_slot_scenario() {
        let mut observer = MockCapacityObserver::new();
        observer.expect_capacity_full().times(1).returning(|| Ok(()));
        let mut lot = ParkingLot::new(3);
        lot.register_observer(observer);

        assert_eq!(Ok(2), lot.park("A", Normal));
        assert_eq!(Ok(0), lot.park("B", Handicap));
        assert_eq!(Ok(1), lot.park("C", Normal));
        assert_eq!(Err(ParkingLotError::ParkingLotFull), lot.park("D", Normal));
    }

    #[test]
    fn test_set_capacity_discards_occupancy_and_keeps_observers() {
        let counter = FullLotCounter::new();
        let mut lot = ParkingLot::new(2);
        lot.register_observer(counter.clone());
        lot.park("A", Normal).unwrap();
        lot.park("B", Normal).unwrap();

        assert_eq!(1, lot.set_capacity(1));
        assert!(!lot.is_vehicle_parked(&"A"));
        assert_eq!(vec![0], lot.empty_slots());
        assert_eq!(Ok(0), lot.park("B", Normal));
        assert!(lot.park("C", Normal).is_err());
        assert_eq!(1, counter.count());
    }

    #[test]
    fn test_random_operations_keep_slots_and_index_in_sync() {
        let mut rng = rand::thread_rng();
        let capacity = 8;
        let mut lot = ParkingLot::new(capacity);
        for _ in 0..2_000 {
            let vehicle: u32 = rng.gen_range(0..12);
            if rng.gen_bool(0.6) {
                let driver = if rng.gen_bool(0.5) { Handicap } else { Normal };
                let expected = match driver {
                    Handicap => lot.empty_slots().first().copied(),
                    Normal => lot.empty_slots().last().copied(),
                };
                match lot.park(vehicle, driver) {
                    Ok(slot) => assert_eq!(expected, Some(slot)),
                    Err(ParkingLotError::VehicleAlreadyParked) => assert!(lot.is_vehicle_parked(&vehicle)),
                    Err(ParkingLotError::ParkingLotFull) => assert!(expected.is_none()),
                    Err(e) => panic!("unexpected error {e}"),
                }
            } else {
                let was_parked = lot.is_vehicle_parked(&vehicle);
                assert_eq!(was_parked, lot.unpark(&vehicle).is_ok());
            }
            assert_eq!(capacity, lot.capacity());
            assert_eq!(capacity, lot.occupied() + lot.empty_slots().len());
        }
    }
}
