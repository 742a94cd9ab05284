use std::sync::Arc;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use crate::core::driver::DriverType;
use crate::errors::client_error::ClientError;
use crate::server::parking_server::{
    CapacityRequest, CapacityResponse, EmptySlotsResponse, ParkRequest, ParkedResponse, ParkingResponse, StatusResponse,
    UnparkRequest,
};

#[async_trait]
pub trait ParkingLotInteractions {
    async fn park(&self, vehicle: String, driver: DriverType) -> Result<usize, ClientError>;
    async fn unpark(&self, vehicle: String) -> Result<usize, ClientError>;
    async fn find(&self, vehicle: String) -> Result<usize, ClientError>;
    async fn is_parked(&self, vehicle: String) -> Result<bool, ClientError>;
    async fn empty_slots(&self) -> Result<Vec<usize>, ClientError>;
    async fn set_capacity(&self, capacity: usize) -> Result<usize, ClientError>;
    async fn status(&self) -> Result<StatusResponse, ClientError>;
}

#[derive(Clone)]
pub struct ParkingLotClient {
    client: Arc<Client>,
    address: String,
}

impl ParkingLotClient {
    pub fn new(client: Arc<Client>, address: String) -> Self {
        Self { client, address }
    }
}

fn slot_from(resp: ParkingResponse) -> Result<usize, ClientError> {
    if resp.is_success() {
        return resp
            .get_slot()
            .ok_or_else(|| ClientError::Unexpected("successful response without a slot".to_string()));
    }
    match resp.get_error() {
        Some(e) => Err(ClientError::Rejected(e)),
        None => Err(ClientError::Unexpected(resp.get_msg().to_string())),
    }
}

#[async_trait]
impl ParkingLotInteractions for ParkingLotClient {
    async fn park(&self, vehicle: String, driver: DriverType) -> Result<usize, ClientError> {
        let request_url = format!("{}/park", self.address);
        debug!("POST {request_url}");
        let resp = self.client
            .post(request_url)
            .json(&ParkRequest::new(vehicle, driver))
            .send().await?;
        slot_from(resp.json().await?)
    }

    async fn unpark(&self, vehicle: String) -> Result<usize, ClientError> {
        let request_url = format!("{}/unpark", self.address);
        debug!("POST {request_url}");
        let resp = self.client
            .post(request_url)
            .json(&UnparkRequest::new(vehicle))
            .send().await?;
        slot_from(resp.json().await?)
    }

    async fn find(&self, vehicle: String) -> Result<usize, ClientError> {
        let request_url = format!("{}/find/{}", self.address, urlencoding::encode(&vehicle));
        debug!("GET {request_url}");
        let resp = self.client.get(request_url).send().await?;
        slot_from(resp.json().await?)
    }

    async fn is_parked(&self, vehicle: String) -> Result<bool, ClientError> {
        let request_url = format!("{}/parked/{}", self.address, urlencoding::encode(&vehicle));
        let data: ParkedResponse = self.client.get(request_url).send().await?.json().await?;
        Ok(data.parked)
    }

    async fn empty_slots(&self) -> Result<Vec<usize>, ClientError> {
        let request_url = format!("{}/slots/empty", self.address);
        let data: EmptySlotsResponse = self.client.get(request_url).send().await?.json().await?;
        Ok(data.slots)
    }

    async fn set_capacity(&self, capacity: usize) -> Result<usize, ClientError> {
        let request_url = format!("{}/capacity", self.address);
        let resp = self.client
            .post(request_url)
            .json(&CapacityRequest::new(capacity))
            .send().await?;
        let data: CapacityResponse = resp.json().await?;
        if data.success {
            return Ok(data.slots);
        }
        Err(ClientError::Unexpected(format!("capacity reset to {capacity} refused")))
    }

    async fn status(&self) -> Result<StatusResponse, ClientError> {
        let request_url = format!("{}/status", self.address);
        Ok(self.client.get(request_url).send().await?.json().await?)
    }
}
