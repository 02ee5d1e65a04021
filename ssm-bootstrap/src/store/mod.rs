pub mod adapters;
pub mod source;

pub use source::{NamedLookup, Parameter, ParameterSource, StoreError};
