//! Query templates, bindings and their translation.

mod binding;
mod executor;
mod translate;
pub mod types;

pub use binding::{Binding, PlaceholderKind};
pub use executor::{Query, QueryExecutor};
pub use translate::{translate, Translation};
pub use types::BindingValue;
