//! Client core for a personal health-records service.
//!
//! # Overview
//! `RecordManager` keeps the local record collection and the create/edit
//! form, and reconciles every local edit against the remote store through
//! the `RecordService` capability.
//!
//! # Design
//! - One `RecordManager` per authenticated session; nothing is global.
//! - Every confirmed create, update or delete is followed by an
//!   authoritative refresh. Local patches only hide latency.
//! - `HttpRecordService` implements `RecordService` with the sans-IO
//!   `RecordsClient` (`build_*` / `parse_*`) and a host-supplied
//!   `Transport`, so the core itself never touches the network.

pub mod client;
pub mod collection;
pub mod condition;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod manager;
pub mod progress;
pub mod remote;
pub mod service;
pub mod types;
pub mod validate;

pub use client::RecordsClient;
pub use collection::RecordCollection;
pub use condition::{Completion, Condition, Notice};
pub use config::ClientConfig;
pub use error::ApiError;
pub use form::{FormMode, FormState};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use manager::{Phase, RecordManager};
pub use remote::HttpRecordService;
pub use service::{RecordService, ServiceFailure};
pub use types::{Field, LoginRequest, Record, RecordFields, RecordId, RegisterRequest};
pub use validate::validate;
