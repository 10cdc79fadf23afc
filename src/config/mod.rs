//! Configuration module

mod site;

pub use site::HistoryConfig;
pub use site::SiteConfig;
