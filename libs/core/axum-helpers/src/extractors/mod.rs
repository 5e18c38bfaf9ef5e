//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the shared [`ErrorResponse`](crate::ErrorResponse)
//! body so clients see one error shape regardless of where a request failed.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
