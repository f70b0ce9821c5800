//! Infrastructure layer: filesystem persistence, configuration loading,
//! and chart file exchange.

pub mod config_service;
pub mod document_store;
pub mod exchange;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use document_store::FileDocumentStore;
pub use exchange::FileExchange;
