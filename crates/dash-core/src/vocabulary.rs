//! Control vocabularies derived from records.

use dash_model::{Record, Vocabulary};

/// Distinct labels of `field` in first-seen order. Records without the field
/// (or with a missing value) contribute nothing.
pub fn extract<'a>(records: impl IntoIterator<Item = &'a Record>, field: &str) -> Vocabulary {
    records
        .into_iter()
        .filter_map(|record| record.label(field))
        .collect()
}

/// Vocabulary of `target_field` restricted to records whose
/// `condition_field` equals `condition_value`.
///
/// This is what makes the percentile options follow the selected metric.
pub fn extract_dependent<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    condition_field: &str,
    condition_value: &str,
    target_field: &str,
) -> Vocabulary {
    extract(
        records
            .into_iter()
            .filter(|record| record.matches(condition_field, condition_value)),
        target_field,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(variable: &str, percentile: &str) -> Record {
        Record::new()
            .with_text("variable", variable)
            .with_text("percentile", percentile)
    }

    #[test]
    fn dependent_vocabulary_follows_condition() {
        let records = vec![
            row("gdp", "p50"),
            row("income", "p90"),
            row("gdp", "p10"),
            row("gdp", "p50"),
        ];
        let gdp = extract_dependent(&records, "variable", "gdp", "percentile");
        assert_eq!(gdp.as_slice(), ["p50", "p10"]);
        let income = extract_dependent(&records, "variable", "income", "percentile");
        assert_eq!(income.as_slice(), ["p90"]);
        let none = extract_dependent(&records, "variable", "wages", "percentile");
        assert!(none.is_empty());
    }

    #[test]
    fn numeric_fields_use_labels() {
        let records = vec![
            Record::new().with_number("year", 2001.0),
            Record::new().with_number("year", 2000.0),
            Record::new().with_number("year", 2001.0),
            Record::new(),
        ];
        assert_eq!(extract(&records, "year").as_slice(), ["2001", "2000"]);
    }
}
