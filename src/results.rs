//! Result packing: raw backend rows into decoded [`CustomDbRow`]s.

mod result_set;
mod row;

use std::sync::Arc;

pub use result_set::ResultSet;
pub use row::CustomDbRow;

use crate::codec;
use crate::types::RowValues;

/// Pack column names and raw rows into a [`ResultSet`].
///
/// Text values carrying a list/map envelope are decoded back to `List`/`Map`; every other
/// value, including non-text types, passes through unchanged. Row order is preserved.
#[must_use]
pub fn pack<I>(column_names: Vec<String>, rows: I) -> ResultSet
where
    I: IntoIterator<Item = Vec<RowValues>>,
{
    let rows = rows.into_iter();
    let mut result_set = ResultSet::with_capacity(rows.size_hint().0);
    result_set.set_column_names(Arc::new(column_names));
    for raw in rows {
        let decoded = raw.into_iter().map(codec::decode).collect();
        result_set.add_row_values(decoded);
    }
    result_set
}
