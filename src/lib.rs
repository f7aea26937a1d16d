//! students: record and query a list of students kept in an XML file.
//!
//! Layers, innermost first: `domain` (records, filter, XML codec),
//! `application` (store service), `infrastructure` (filesystem, logging,
//! wiring) and `cli` (arguments, dispatch, output).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
