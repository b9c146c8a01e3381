pub mod aggregate;
pub mod config;
pub mod locale;
pub mod pipeline;
pub mod report;
pub mod selection;
pub mod source;
pub mod writer;
