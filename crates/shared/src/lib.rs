pub mod domain;
pub mod error;
pub mod options;
pub mod protocol;
