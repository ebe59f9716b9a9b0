pub mod json_export;

use anyhow::Result;

pub use json_export::{read_json, JsonExporter};

/// Writes one kind of output value somewhere.
pub trait Exporter<T: ?Sized> {
    fn export(&self, value: &T) -> Result<()>;
}
