//! Proc macros for sieve.
//!
//! ## Derive Macros
//!
//! - [`Record`] - Generate a by-name field accessor for in-memory filtering

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for filterable structs.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Text field (`String`, `&str`, anything `AsRef<str>`) |
/// | `Number` | Numeric field (any primitive integer or float) |
/// | `Timestamp` | Time field - requires a `RecordTimestamp` impl |
/// | `Bool` | Boolean field |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom field name in conditions |
/// | `ty = "..."` | Field kind as a string, e.g. `ty = "text"` |
///
/// Fields of type `Option<T>` read as null when `None`. Fields without a
/// kind are not readable and always evaluate to null.
///
/// # Generated Code
///
/// 1. A `pub const` per readable field (e.g. `Row::NAME = "name"`)
/// 2. An implementation of `Record::field_value()`
///
/// # Example
///
/// ```ignore
/// use sieve::{gte, Conditions, Records};
/// use sieve_macros::Record;
///
/// #[derive(Record)]
/// struct Row {
///     #[sieve(Text)]
///     name: Option<String>,
///
///     #[sieve(Number)]
///     value: Option<i64>,
///
///     #[sieve(Number, rename = "id")]
///     row_id: u32,
///
///     #[sieve(skip)]
///     cache: Vec<u8>,
/// }
///
/// let rows: Vec<Row> = load();
/// let kept = Records::new(&rows)
///     .filter(&Conditions::new().with(Row::VALUE, gte(10)), false)?;
/// ```
#[proc_macro_derive(Record, attributes(sieve))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
