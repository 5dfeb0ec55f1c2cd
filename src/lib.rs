// Presence records, listings, and the category catalog
pub mod entity;

// Live view synchronizer and its owned state
pub mod sync;

// Inbound snapshot feed and outbound record store contracts
pub mod feed;

// Map surface contract and headless implementation
pub mod map;

// Configuration
pub mod config;
