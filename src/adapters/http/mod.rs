//! HTTP plumbing for the catalog adapter
//!
//! - [`transport`] - single-attempt [`HttpTransport`] seam and its reqwest implementation
//! - [`rate_gate`] - shared minimum-interval gate
//! - [`request`] - retrying [`RequestLayer`] built on both

pub mod rate_gate;
pub mod request;
pub mod transport;

pub use rate_gate::RateGate;
pub use request::{backoff_delay, RequestLayer, RETRYABLE_STATUSES};
pub use transport::{
    HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
