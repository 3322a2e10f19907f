//! Hardware session gateways.

mod visa_gateway;

pub use visa_gateway::{VisaGateway, VisaGatewayBuilder};
