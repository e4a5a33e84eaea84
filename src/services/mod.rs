pub mod admin_factory;

pub use admin_factory::AdminClientFactory;
