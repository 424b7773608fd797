use realty_core::calculations::common::{format_currency, format_percent};
use realty_data::ExportRow;
use rust_decimal::Decimal;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

const MISSING: &str = "n/a";

/// One display row; same columns as the export, formatted for reading.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ComparisonRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Image")]
    pub image: String,
    #[tabled(rename = "Monthly Cost")]
    pub monthly_cost: String,
    #[tabled(rename = "Net Rent")]
    pub net_rent: String,
    #[tabled(rename = "Cash Flow")]
    pub cash_flow: String,
    #[tabled(rename = "Annual Profit")]
    pub annual_profit: String,
    #[tabled(rename = "ROI (%)")]
    pub roi_percent: String,
    #[tabled(rename = "Flip Profit")]
    pub flip_profit: String,
}

fn currency(value: Option<Decimal>) -> String {
    value.map_or_else(|| MISSING.to_string(), format_currency)
}

impl From<&ExportRow> for ComparisonRow {
    fn from(row: &ExportRow) -> Self {
        Self {
            name: row.name.clone(),
            address: row.address.clone(),
            image: row.image.clone(),
            monthly_cost: currency(row.monthly_cost),
            net_rent: currency(row.net_rent),
            cash_flow: currency(row.cash_flow),
            annual_profit: currency(row.annual_profit),
            roi_percent: row
                .roi_percent
                .map_or_else(|| MISSING.to_string(), format_percent),
            flip_profit: currency(row.flip_profit),
        }
    }
}

/// Renders the comparison as a rounded-border table.
pub fn render_table(rows: &[ExportRow]) -> String {
    let rows: Vec<ComparisonRow> = rows.iter().map(ComparisonRow::from).collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}
