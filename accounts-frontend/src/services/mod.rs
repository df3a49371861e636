pub mod backend_client;
pub mod backend_gateway;
pub mod error;
pub mod metrics;
pub mod resource;

pub use backend_client::BackendClient;
pub use backend_gateway::BackendGateway;
pub use error::{FormError, GatewayError};
