mod catalog;
mod track;
mod transport;

pub use catalog::Catalog;
pub use track::TrackDescriptor;
pub use transport::TransportEvent;
