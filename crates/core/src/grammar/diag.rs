pub use sparse_fields_diagnostics::*;
