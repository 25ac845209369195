//! Deep import conversion.
//!
//! Rewrites bare specifiers (`@angular/core`) into paths relative to the
//! dependency store that point straight at the resolved entry file
//! (`@angular/core/index`).

mod convert;
mod disambiguate;
mod rewrite;

pub use convert::{convert_to_deep_imports, ConvertReport, FileFailure};
pub use disambiguate::{filter_candidates, select_deep_import};
pub use rewrite::{
    apply_rewrites, convert_source, deep_import_path, process_imports, rewrite_statement,
    splice_rewrites, FileConversion, Rewrite, Unresolved,
};
