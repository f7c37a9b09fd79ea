//! Scalar parsing shared by the analyzer and the numeric modes.

pub mod date;
pub mod numeric;

pub use date::{parse_date, shared_date_format, DATE_FORMATS};
pub use numeric::{is_float, is_integer, parse_numeric_or_zero, try_parse_numeric, Numeric};
