// TRS codec internals

pub mod bytes;
pub mod config;
pub mod constants;
pub mod definition;
pub mod encoding;
pub mod error;
pub mod format;
pub mod header;
pub mod metadata;
pub mod parameter;
pub mod parameter_map;
pub mod tags;
pub mod text;
pub mod trace;
pub mod trace_set;
pub mod traceset_parameters;
pub mod typed;
pub mod varint;

mod reader;
mod writer;
