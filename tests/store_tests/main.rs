//! Store test suite
//!
//! - `conformance_tests`: `DbInterface` behavior shared by every backend
//! - `log_store_tests`: persistence, locking, recovery and compaction of `LogStore`

mod log_store_tests;
