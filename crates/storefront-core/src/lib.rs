#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod analytics;
pub mod config;
pub mod error;
pub mod facets;
pub mod theme;
pub mod traits;
pub mod types;
