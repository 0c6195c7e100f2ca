mod abort;
mod client;
mod endpoint;
mod error;
mod http;
mod request;

pub mod prelude {
    pub use super::abort::{AbortHandle, abort_on_ctrl_c};
    pub use super::client::ServiceClient;
    pub use super::endpoint::{Endpoint, TimeoutPolicy, TimeoutPolicyBuilder};
    pub use super::error::{GENERIC_FAILURE_MESSAGE, ServiceError, TransportError};
    pub use super::http::HttpTransport;
    pub use super::request::{
        HttpMethod, MockTransport, OutboundRequest, RequestBody, ResponseKind, ResponsePayload,
        Transport,
    };
}

pub(crate) use abort::{AbortSlot, InFlight};
