//! Workflow sources.
//!
//! Only the filesystem source (`fs` module) exists. A source trait may be
//! introduced once a second source (e.g. a git tree or an API listing) demands it.

pub mod fs;
