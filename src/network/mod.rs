pub mod network;
pub mod saved;

pub use network::Network;
pub use saved::SavedNetwork;
