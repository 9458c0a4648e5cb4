pub use sparse_fields_delimiters::{
    Delimiter, DelimiterError, DelimiterOptions, DelimiterTable, is_selection_whitespace,
    load_delimiters_from_str,
};
