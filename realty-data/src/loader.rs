use std::io::Read;
use std::path::Path;

use realty_core::{FieldError, PropertyCollection, PropertyInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading property data.
#[derive(Debug, Error)]
pub enum PropertyLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid property on row {row}: {}", join_errors(.errors))]
    InvalidRow { row: usize, errors: Vec<FieldError> },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for PropertyLoaderError {
    fn from(err: csv::Error) -> Self {
        PropertyLoaderError::CsvParse(err.to_string())
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single record from a properties CSV file.
///
/// Headers are matched by name, so column order does not matter:
/// - `name`, `address`: identifying text
/// - `image`: optional image URL or path (column may be omitted)
/// - `square_footage`
/// - `purchase_price`, `down_payment`
/// - `interest_rate_percent`: e.g. `6.5`
/// - `loan_term_years`: whole years
/// - `annual_property_tax`, `annual_insurance`, `monthly_maintenance`
/// - `vacancy_percent`: 0 to 20, e.g. `5` for 5%
/// - `expected_monthly_rent`
/// - `annual_appreciation_percent`: may be negative
/// - `hold_period_years`
/// - `rehab_cost`, `target_resale_price`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropertyRecord {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub image: Option<String>,
    pub square_footage: Decimal,
    pub purchase_price: Decimal,
    pub down_payment: Decimal,
    pub interest_rate_percent: Decimal,
    pub loan_term_years: Decimal,
    pub annual_property_tax: Decimal,
    pub annual_insurance: Decimal,
    pub monthly_maintenance: Decimal,
    pub vacancy_percent: Decimal,
    pub expected_monthly_rent: Decimal,
    pub annual_appreciation_percent: Decimal,
    pub hold_period_years: Decimal,
    pub rehab_cost: Decimal,
    pub target_resale_price: Decimal,
}

impl From<PropertyRecord> for PropertyInput {
    fn from(record: PropertyRecord) -> Self {
        PropertyInput {
            name: record.name,
            address: record.address,
            image: record.image,
            square_footage: record.square_footage,
            purchase_price: record.purchase_price,
            down_payment: record.down_payment,
            interest_rate_percent: record.interest_rate_percent,
            loan_term_years: record.loan_term_years,
            annual_property_tax: record.annual_property_tax,
            annual_insurance: record.annual_insurance,
            monthly_maintenance: record.monthly_maintenance,
            vacancy_percent: record.vacancy_percent,
            expected_monthly_rent: record.expected_monthly_rent,
            annual_appreciation_percent: record.annual_appreciation_percent,
            hold_period_years: record.hold_period_years,
            rehab_cost: record.rehab_cost,
            target_resale_price: record.target_resale_price,
        }
    }
}

/// Loader for property data from CSV files.
///
/// Parsing and validation are separate steps: [`PropertyLoader::parse`]
/// only checks structure and number syntax, [`PropertyLoader::load`]
/// applies the input rules and appends to a collection.
pub struct PropertyLoader;

impl PropertyLoader {
    /// Parse property records from a CSV reader.
    ///
    /// Whitespace around values is trimmed. Rows are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PropertyRecord>, PropertyLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: PropertyRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed property records");
        Ok(records)
    }

    /// Validate records and append them to `collection`.
    ///
    /// Either every record is appended or none is: all rows are checked
    /// before the collection is touched. Row numbers in errors are 1-based
    /// data rows (the header is row 0).
    pub fn load(
        collection: &mut PropertyCollection,
        records: Vec<PropertyRecord>,
    ) -> Result<usize, PropertyLoaderError> {
        let properties = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                PropertyInput::from(record)
                    .into_property()
                    .map_err(|errors| PropertyLoaderError::InvalidRow {
                        row: idx + 1,
                        errors,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let loaded = properties.len();
        collection.extend(properties);

        info!(loaded, total = collection.len(), "loaded properties");
        Ok(loaded)
    }

    /// Convenience wrapper: read `path`, parse it and load it into a fresh
    /// collection.
    pub fn load_from_file(path: &Path) -> Result<PropertyCollection, PropertyLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| PropertyLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let records = Self::parse(file)?;
        let mut collection = PropertyCollection::new();
        Self::load(&mut collection, records)?;

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use realty_core::FieldErrorKind;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "name,address,image,square_footage,purchase_price,down_payment,interest_rate_percent,loan_term_years,annual_property_tax,annual_insurance,monthly_maintenance,vacancy_percent,expected_monthly_rent,annual_appreciation_percent,hold_period_years,rehab_cost,target_resale_price";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    const DEFAULT_ROW: &str =
        "Property A,123 Main St,,1500,200000,40000,6.5,30,3600,1200,150,5,1800,3.0,5,30000,275000";

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_single_record() {
        let csv = csv_with(&[DEFAULT_ROW]);

        let records = PropertyLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            PropertyRecord {
                name: "Property A".to_string(),
                address: "123 Main St".to_string(),
                image: None,
                square_footage: dec!(1500),
                purchase_price: dec!(200000),
                down_payment: dec!(40000),
                interest_rate_percent: dec!(6.5),
                loan_term_years: dec!(30),
                annual_property_tax: dec!(3600),
                annual_insurance: dec!(1200),
                monthly_maintenance: dec!(150),
                vacancy_percent: dec!(5),
                expected_monthly_rent: dec!(1800),
                annual_appreciation_percent: dec!(3.0),
                hold_period_years: dec!(5),
                rehab_cost: dec!(30000),
                target_resale_price: dec!(275000),
            }
        );
    }

    #[test]
    fn test_parse_image_column_is_optional() {
        let csv = "name,address,square_footage,purchase_price,down_payment,interest_rate_percent,loan_term_years,annual_property_tax,annual_insurance,monthly_maintenance,vacancy_percent,expected_monthly_rent,annual_appreciation_percent,hold_period_years,rehab_cost,target_resale_price\nB,9 Elm,900,100000,20000,5,15,1200,600,50,0,1000,2,3,0,100000\n";

        let records = PropertyLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].image, None);
        assert_eq!(records[0].name, "B");
    }

    #[test]
    fn test_parse_keeps_image_reference() {
        let csv = csv_with(&[
            "D,2 Oak,https://example.com/d.jpg,1000,150000,30000,7,30,2400,900,100,10,1500,2.5,7,10000,180000",
        ]);

        let records = PropertyLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records[0].image.as_deref(),
            Some("https://example.com/d.jpg")
        );
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let csv = csv_with(&[
            "C,1 Oak,1000,150000,30000,7,30,2400,900,100,10,1500,2.5,7,10000,180000",
        ]);

        let result = PropertyLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(PropertyLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let csv = csv_with(&[
            " Property A , 123 Main St ,, 1500 , 200000 , 40000 , 6.5 , 30 , 3600 , 1200 , 150 , 5 , 1800 , 3.0 , 5 , 30000 , 275000 ",
        ]);

        let records = PropertyLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].name, "Property A");
        assert_eq!(records[0].interest_rate_percent, dec!(6.5));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "name,address\nA,1 Main";

        let result = PropertyLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let PropertyLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = csv_with(&[
            "A,1 Main,,1500,lots,40000,6.5,30,3600,1200,150,5,1800,3.0,5,30000,275000",
        ]);

        let result = PropertyLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(PropertyLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = PropertyLoader::parse(csv_with(&[]).as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // load tests
    // =========================================================================

    #[test]
    fn test_load_appends_in_file_order() {
        let csv = csv_with(&[
            DEFAULT_ROW,
            "Property B,456 Oak Ave,,1200,150000,30000,5.5,15,2400,900,100,10,1500,2.5,7,10000,180000",
        ]);
        let records = PropertyLoader::parse(csv.as_bytes()).unwrap();
        let mut collection = PropertyCollection::new();

        let loaded = PropertyLoader::load(&mut collection, records).expect("Failed to load");

        assert_eq!(loaded, 2);
        let names: Vec<_> = collection.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Property A", "Property B"]);
        assert_eq!(collection.get(1).map(|p| p.vacancy_rate), Some(dec!(0.10)));
    }

    #[test]
    fn test_load_reports_invalid_row_number() {
        let csv = csv_with(&[
            DEFAULT_ROW,
            "Bad,1 Main,,1500,200000,40000,6.5,30,3600,1200,150,35,1800,3.0,5,30000,275000",
        ]);
        let records = PropertyLoader::parse(csv.as_bytes()).unwrap();
        let mut collection = PropertyCollection::new();

        let err = PropertyLoader::load(&mut collection, records).expect_err("row 2 is invalid");

        match err {
            PropertyLoaderError::InvalidRow { row, errors } => {
                assert_eq!(row, 2);
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "vacancy_percent");
                assert!(matches!(errors[0].kind, FieldErrorKind::OutOfRange { .. }));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn test_load_leaves_collection_untouched_on_error() {
        let csv = csv_with(&[
            DEFAULT_ROW,
            "Bad,1 Main,,1500,200000,40000,6.5,0,3600,1200,150,5,1800,3.0,5,30000,275000",
        ]);
        let records = PropertyLoader::parse(csv.as_bytes()).unwrap();
        let mut collection = PropertyCollection::new();

        let result = PropertyLoader::load(&mut collection, records);

        assert!(result.is_err());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_invalid_row_error_message_lists_fields() {
        let err = PropertyLoaderError::InvalidRow {
            row: 3,
            errors: vec![
                FieldError::new("name", FieldErrorKind::Required),
                FieldError::new("rehab_cost", FieldErrorKind::Negative(dec!(-1))),
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid property on row 3: name is required; rehab_cost must not be negative, got -1"
        );
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let result = PropertyLoader::load_from_file(Path::new("/this/path/does/not/exist.csv"));

        assert!(matches!(result, Err(PropertyLoaderError::Io { .. })));
    }
}
