//! Request construction for the Context Broker.
//!
//! Sending requests is left to the caller's HTTP stack; these types only
//! produce the URL, query parameters and FIWARE headers.

pub mod cb;
pub mod header;
pub mod pagination;

pub use cb::{EntityListRequest, ListOption};
pub use header::FiwareHeader;
pub use pagination::{Page, Pagination, MAX_PAGE_SIZE};
