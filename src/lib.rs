//! **statslog** — launcher event normalization for fixed-schema stats.
//!
//! A launcher event describes *what* was touched (an app, shortcut, widget,
//! task, search action or slice) and *where* it sits (workspace cell,
//! folder, hotseat, search results, …).  The stats pipeline, however, only
//! takes flat rows with a fixed column order.  This crate bridges the two.
//!
//! # Architecture
//!
//! * [`atom`] — the structured vocabulary: payloads, placements, records.
//! * [`normalize`] — pure, total functions from a record to flat fields.
//! * [`row`] — assembles the fixed-order event and snapshot rows.
//! * [`logger`] — the per-event builder; payload/placement exclusivity is
//!   checked by the type system.
//! * [`writer`] — a single background thread that writes rows in
//!   submission order.
//!
//! Two traits keep the pipeline transport-agnostic:
//!
//! * [`traits::StatsSink`] — where rows finally go ([`sink`] has a JSON
//!   lines and an in-memory implementation).
//! * [`traits::RequestSource`] — where requests come from ([`ipc`] has a
//!   Unix-socket implementation).

pub mod atom;
pub mod config;
pub mod event;
pub mod ipc;
pub mod logger;
pub mod normalize;
pub mod row;
pub mod sink;
pub mod traits;
pub mod writer;
