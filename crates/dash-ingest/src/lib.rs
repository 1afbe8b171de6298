//! Dataset ingestion for the dashboard: CSV tables, numeric normalization,
//! the memoizing [`CsvDataSource`] and GeoJSON feature collections.

pub mod csv_table;
pub mod geo;
pub mod hash;
pub mod numeric;
pub mod source;

pub use csv_table::{CsvTable, read_csv_from, read_csv_table};
pub use geo::{Feature, FeatureCollection, load_feature_collection, parse_feature_collection};
pub use numeric::{NumericCell, normalize_numeric};
pub use source::{CsvDataSource, DataSource, coerce_table};
