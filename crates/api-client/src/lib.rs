//! The API Gateway boundary: a mockable async trait plus the REST client
//! that talks to the real care service.

pub mod gateway;
pub mod rest;
pub mod types;

pub use gateway::{CareGateway, NewMessage};
pub use rest::RestCareClient;
