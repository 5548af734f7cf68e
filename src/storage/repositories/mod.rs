//! Repository layer: typed access to the persisted tables.

pub mod audit;
pub mod college;

pub use audit::{AuditEvent, AuditLogRepository};
pub use college::{
    CollegeRecord, CollegeRecordFilter, CollegeRecordRepository, NewCollegeRecord,
    UpdateCollegeRecord,
};
