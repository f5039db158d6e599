//! # InsightX API
//!
//! JSON front door of the engine. Each engine operation is one variant of
//! the closed [`Request`] enum; [`Service`] dispatches it and answers with a
//! `{"success": .., "data": ..}` envelope.
//!
//! ## Example
//!
//! ```rust
//! use insightx_api::Service;
//! use serde_json::json;
//!
//! let body = json!({
//!     "operation": "fieldsSummary",
//!     "dataSource": [{"city": "Rome"}, {"city": "Oslo"}],
//!     "fields": ["city"]
//! });
//!
//! let out = Service::default().handle_json(&body.to_string()).unwrap();
//! let out: serde_json::Value = serde_json::from_str(&out).unwrap();
//! assert_eq!(out["data"][0]["distinctCount"], 2);
//! ```

pub mod request;
pub mod service;

pub use request::{FieldRef, Request, Response, ResponseData};
pub use service::{infer_dimensions, measure_fields, Service};
