pub mod node;
pub mod record;

pub use node::{MeasurementNode, RawNode};
pub use record::{AcceptedPoint, AcceptedRecord, CartesianPoint, RenderFrame};
