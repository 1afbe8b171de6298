//! Data model shared by the dashboard crates.

pub mod dataset;
pub mod error;
pub mod hover;
pub mod value;
pub mod vocabulary;

pub use dataset::{Dataset, DatasetKind, DatasetSchema, FieldKind, FieldSpec, LoadIssue, fields};
pub use error::{DashError, Result};
pub use hover::{HoverPayload, PanelKind};
pub use value::{Record, Value, format_numeric, format_thousands};
pub use vocabulary::Vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_list_required_fields() {
        let schema = DatasetKind::StateIndicators.schema();
        let names: Vec<&str> = schema.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["country", "variable", "percentile", "year", "value"]
        );
        assert!(schema.field(fields::VALUE).is_some_and(FieldSpec::is_numeric));
        assert!(!schema.field(fields::COUNTRY).is_some_and(FieldSpec::is_numeric));
    }

    #[test]
    fn record_serializes() {
        let record = Record::new()
            .with_text(fields::STATE, "Ohio")
            .with_number(fields::GSP, 812.5);
        let json = serde_json::to_string(&record).expect("serialize record");
        let round: Record = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
    }

    #[test]
    fn empty_domain_is_recognized() {
        let err = DashError::empty_domain("value");
        assert!(err.is_empty_domain());
        assert_eq!(err.to_string(), "no data to plot for 'value'");
    }
}
