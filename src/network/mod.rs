pub mod network;
pub mod snapshot;
pub mod topology;

pub use network::Network;
pub use snapshot::NetworkSnapshot;
pub use topology::Topology;
