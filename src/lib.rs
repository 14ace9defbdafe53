//! Scheduling-conflict validation and enrollment admission for a school
//! timetabling service.
//!
//! The crate covers the two pieces with real correctness content: the
//! meeting conflict validator (teacher/room double-booking, hour budgets,
//! the protected lunch window) and the enrollment pipeline (ordered business
//! rules plus concurrency-safe, optimistically versioned admission to
//! capacity-bounded sections). Transport, persistence internals and entity
//! CRUD live outside, behind the [`gateway`] traits.

pub mod engine;
pub mod gateway;
pub mod limits;
pub mod model;
pub mod observability;
pub mod store;

pub use engine::{AdmissionError, Engine, EnrollmentError, FailureClass, MeetingConflictError};
pub use store::{MemoryStore, StoreError};
