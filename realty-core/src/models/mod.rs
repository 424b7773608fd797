mod collection;
mod metrics;
mod property;

pub use collection::PropertyCollection;
pub use metrics::Metrics;
pub use property::Property;
