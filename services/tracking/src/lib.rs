//! Work-record tracking core
//!
//! Turns a work category plus a few flags into canonical hours and shift
//! counts, keeps those values derived across partial updates, and totals
//! them over date ranges.
//!
//! ```rust,no_run
//! use tracking::config::TrackingConfig;
//! use tracking::models::CreateWorkRecordRequest;
//! use tracking::repositories::InMemoryWorkRecordRepository;
//! use tracking::service::WorkRecordService;
//! use uuid::Uuid;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let engine = TrackingConfig::from_env()?.rule_engine()?;
//! let service = WorkRecordService::new(InMemoryWorkRecordRepository::new(), engine);
//!
//! let user_id = Uuid::new_v4();
//! let record = service
//!     .create(
//!         user_id,
//!         CreateWorkRecordRequest {
//!             work_type: "inbound".into(),
//!             inbound_rule: Some("102".into()),
//!             date: "2024-05-01".into(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! println!("{} hours, {:.2} shifts", record.working_hours, record.working_shifts);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod recalculate;
pub mod repositories;
pub mod rules;
pub mod service;
pub mod summary;

pub use error::{TrackError, TrackResult};
pub use rules::{InboundRuleTable, RuleEngine, RuleSettings};
pub use service::WorkRecordService;
pub use summary::{Summary, summarize};
