pub mod coding;
pub mod dictionary;
pub mod instance;
pub mod plan;
pub mod udi;

pub use coding::{CodingMap, CodingMaps};
pub use dictionary::{DataDictionary, UdiRecord};
pub use instance::InstanceMap;
pub use plan::ColumnPlan;
pub use udi::{ParseUdiError, Udi};
