pub mod descriptor;
pub mod publisher;

pub use descriptor::TrafficLightDescriptor;
pub use publisher::TrafficLightPublisher;
