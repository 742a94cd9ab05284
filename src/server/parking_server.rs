use std::net::SocketAddr;
use std::sync::Arc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};
use crate::config::ServerConfig;
use crate::core::driver::DriverType;
use crate::core::observer::FullLotCounter;
use crate::core::parking_lot::ParkingLot;
use crate::errors::observer_error::ObserverError;
use crate::errors::parking_lot_error::ParkingLotError;

/// One lock around the whole lot, held for the duration of each request.
pub type SharedLot = Arc<Mutex<ParkingLot<String>>>;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParkRequest {
    vehicle: String,
    driver_type: DriverType,
}

impl ParkRequest {
    pub fn new(vehicle: String, driver_type: DriverType) -> Self {
        Self { vehicle, driver_type }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UnparkRequest {
    vehicle: String,
}

impl UnparkRequest {
    pub fn new(vehicle: String) -> Self {
        Self { vehicle }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CapacityRequest {
    capacity: usize,
}

impl CapacityRequest {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

/// Answer to park, unpark and find.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParkingResponse {
    success: bool,
    message: String,
    slot: Option<usize>,
    error: Option<ParkingLotError>,
}

impl ParkingResponse {
    fn from_result(result: Result<usize, ParkingLotError>, ok_message: &str) -> Self {
        match result {
            Ok(slot) => Self {
                success: true,
                message: ok_message.to_string(),
                slot: Some(slot),
                error: None,
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                slot: None,
                error: Some(e),
            },
        }
    }

    pub fn is_success(&self) -> bool { self.success }
    pub fn get_slot(&self) -> Option<usize> { self.slot }
    pub fn get_error(&self) -> Option<ParkingLotError> { self.error }
    pub fn get_msg(&self) -> &str { &self.message }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParkedResponse {
    pub parked: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmptySlotsResponse {
    pub slots: Vec<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CapacityResponse {
    pub success: bool,
    pub slots: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub capacity: usize,
    pub occupied: usize,
    pub full_events: u32,
}

async fn handle_park(req: ParkRequest, lot: SharedLot) -> Result<impl Reply, Rejection> {
    let result = lot.lock().await.park(req.vehicle.clone(), req.driver_type);
    let resp = ParkingResponse::from_result(result, "Vehicle parked");
    debug!("park -> {:?} : {:?}", req, resp);
    Ok(warp::reply::json(&resp))
}

async fn handle_unpark(req: UnparkRequest, lot: SharedLot) -> Result<impl Reply, Rejection> {
    let result = lot.lock().await.unpark(&req.vehicle);
    let resp = ParkingResponse::from_result(result, "Vehicle unparked");
    debug!("unpark -> {:?} : {:?}", req, resp);
    Ok(warp::reply::json(&resp))
}

/// Path segments arrive percent-encoded; vehicles are stored as sent in JSON bodies.
fn decode_vehicle(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|v| v.into_owned())
}

async fn handle_find(raw: String, lot: SharedLot) -> Result<impl Reply, Rejection> {
    // A segment that is not valid UTF-8 once decoded can't name a parked vehicle.
    let result = match decode_vehicle(&raw) {
        Some(vehicle) => lot.lock().await.find_vehicle(&vehicle),
        None => Err(ParkingLotError::VehicleNotFound),
    };
    Ok(warp::reply::json(&ParkingResponse::from_result(result, "Vehicle found")))
}

async fn handle_parked(raw: String, lot: SharedLot) -> Result<impl Reply, Rejection> {
    let parked = match decode_vehicle(&raw) {
        Some(vehicle) => lot.lock().await.is_vehicle_parked(&vehicle),
        None => false,
    };
    Ok(warp::reply::json(&ParkedResponse { parked }))
}

async fn handle_empty_slots(lot: SharedLot) -> Result<impl Reply, Rejection> {
    let slots = lot.lock().await.empty_slots();
    Ok(warp::reply::json(&EmptySlotsResponse { slots }))
}

async fn handle_capacity(req: CapacityRequest, max_capacity: usize, lot: SharedLot) -> Result<impl Reply, Rejection> {
    let mut lot = lot.lock().await;
    if req.capacity > max_capacity {
        warn!("capacity reset to {} refused, limit is {max_capacity}", req.capacity);
        let resp = CapacityResponse { success: false, slots: lot.capacity() };
        return Ok(warp::reply::with_status(warp::reply::json(&resp), StatusCode::BAD_REQUEST));
    }
    let slots = lot.set_capacity(req.capacity);
    info!("lot capacity reset to {slots}");
    Ok(warp::reply::with_status(warp::reply::json(&CapacityResponse { success: true, slots }), StatusCode::OK))
}

async fn handle_status(lot: SharedLot, counter: FullLotCounter) -> Result<impl Reply, Rejection> {
    let lot = lot.lock().await;
    let resp = StatusResponse {
        capacity: lot.capacity(),
        occupied: lot.occupied(),
        full_events: counter.count(),
    };
    Ok(warp::reply::json(&resp))
}

fn json_body<T>() -> impl Filter<Extract=(T, ), Error=Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(1024 * 16).and(warp::body::json())
}

/// Builds a lot of `capacity` slots with the service's full-lot observers attached.
pub fn new_shared_lot(capacity: usize, counter: FullLotCounter) -> SharedLot {
    let mut lot: ParkingLot<String> = ParkingLot::new(capacity);
    lot.register_observer(|| -> Result<(), ObserverError> {
        warn!("parking lot is full");
        Ok(())
    });
    lot.register_observer(counter);
    Arc::new(Mutex::new(lot))
}

/// `max_capacity` bounds what `POST /capacity` may ask for.
pub fn routes(lot: SharedLot, counter: FullLotCounter, max_capacity: usize) -> impl Filter<Extract=(impl Reply, ), Error=Rejection> + Clone {
    let lot_filter = warp::any().map(move || Arc::clone(&lot));
    let counter_filter = warp::any().map(move || counter.clone());

    // POST /park
    let route_park = warp::post()
        .and(warp::path("park"))
        .and(warp::path::end())
        .and(json_body::<ParkRequest>())
        .and(lot_filter.clone())
        .and_then(handle_park);

    // POST /unpark
    let route_unpark = warp::post()
        .and(warp::path("unpark"))
        .and(warp::path::end())
        .and(json_body::<UnparkRequest>())
        .and(lot_filter.clone())
        .and_then(handle_unpark);

    let route_find = warp::get()
        .and(warp::path!("find" / String))
        .and(lot_filter.clone())
        .and_then(handle_find);

    let route_parked = warp::get()
        .and(warp::path!("parked" / String))
        .and(lot_filter.clone())
        .and_then(handle_parked);

    let route_empty = warp::get()
        .and(warp::path!("slots" / "empty"))
        .and(lot_filter.clone())
        .and_then(handle_empty_slots);

    // POST /capacity
    let route_capacity = warp::post()
        .and(warp::path("capacity"))
        .and(warp::path::end())
        .and(json_body::<CapacityRequest>())
        .and(warp::any().map(move || max_capacity))
        .and(lot_filter.clone())
        .and_then(handle_capacity);

    let route_status = warp::get()
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(lot_filter.clone())
        .and(counter_filter)
        .and_then(handle_status);

    route_park
        .or(route_unpark)
        .or(route_find)
        .or(route_parked)
        .or(route_empty)
        .or(route_capacity)
        .or(route_status)
}

#[tokio::main]
pub async fn run(config: ServerConfig) {
    let counter = FullLotCounter::new();
    let lot = new_shared_lot(config.capacity, counter.clone());
    let addr = SocketAddr::from((config.host, config.port));

    let (bound, server) = warp::serve(routes(lot, counter, config.max_capacity))
        .bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {e}");
            }
        });
    info!("Starting parking lot server at {bound} with {} slots", config.capacity);
    server.await;
    info!("Server stopped");
}
