pub mod bridge;
pub mod config;
pub mod controller;
pub mod setup;
pub mod snapshot;
pub mod watch;

pub use bridge::client::BridgeClient;
pub use bridge::client::BridgeError;
pub use bridge::client::LightingBridge;
pub use bridge::command::LightCommand;
pub use bridge::object::BridgeObject;
pub use bridge::object::LightingState;
pub use bridge::object::ObjectKind;
pub use bridge::object::Registry;
pub use config::Config;
pub use config::ConfigError;
pub use controller::Controller;
pub use snapshot::SnapshotStore;
