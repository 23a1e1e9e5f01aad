use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The four expense table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    Date,
    Description,
    Merchant,
    Amount,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 4] = [
        ColumnKey::Date,
        ColumnKey::Description,
        ColumnKey::Merchant,
        ColumnKey::Amount,
    ];
}

/// Every editable text label on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LabelKey {
    ReportTitle,
    CompanyName,
    CompanyAddress,
    CompanyCity,
    CompanyCountry,
    ReportTitleLabel,
    SubmittedBy,
    SubmittedOn,
    ReportTo,
    ReportingPeriod,
    BusinessPurpose,
    AddNewExpense,
    Total,
    ExpenseDescPlaceholder,
    MerchantPlaceholder,
}

/// Color roles the side panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorRole {
    HeaderBackground,
    HeaderText,
    ModernHeaderBackground,
    TableRowOdd,
    TableRowEven,
    TableBorder,
    PrimaryText,
    SecondaryText,
    TotalBackground,
    TotalBorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FontKey {
    Family,
    BaseSize,
    HeaderSize,
    TitleSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutKey {
    ContainerMaxWidth,
    BorderRadius,
    Padding,
    TablePadding,
}

/// Header layout variant for the top of the report.
///
/// Unknown persisted values deserialize to `Standard`, so old blobs keep
/// loading when a variant is renamed or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum HeaderStyle {
    Compact,
    #[default]
    Standard,
    Detailed,
    Modern,
    Classic,
    Minimal,
}

impl From<String> for HeaderStyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "compact" => HeaderStyle::Compact,
            "detailed" => HeaderStyle::Detailed,
            "modern" => HeaderStyle::Modern,
            "classic" => HeaderStyle::Classic,
            "minimal" => HeaderStyle::Minimal,
            _ => HeaderStyle::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
    #[serde(rename = "MM/DD/YYYY")]
    Us,
    #[serde(rename = "DD/MM/YYYY")]
    Eu,
    #[serde(rename = "DD.MM.YYYY")]
    Dotted,
}

impl DateFormat {
    /// The literal display pattern, with `YYYY`/`MM`/`DD` placeholders.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Iso => "YYYY-MM-DD",
            DateFormat::Us => "MM/DD/YYYY",
            DateFormat::Eu => "DD/MM/YYYY",
            DateFormat::Dotted => "DD.MM.YYYY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPosition {
    #[default]
    Before,
    After,
}

/// The full customization tree owned by the store.
///
/// Serialized as camelCase JSON so persisted blobs keep the shape written
/// by earlier versions. Every level carries container defaults: fields
/// missing from a saved blob are filled from the built-in defaults
/// key-by-key, so partial or stale blobs always load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub table_headers: TableHeaders,
    pub labels: Labels,
    pub styling: Styling,
    pub currency: Currency,
    pub date_format: DateFormatSettings,
    pub report_settings: ReportSettings,
    pub columns: Columns,
    pub header_style: HeaderStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableHeaders {
    pub date: String,
    pub description: String,
    pub merchant: String,
    pub amount: String,
}

impl Default for TableHeaders {
    fn default() -> Self {
        Self {
            date: "Date".into(),
            description: "Expense Description".into(),
            merchant: "Merchant".into(),
            amount: "Amount".into(),
        }
    }
}

impl TableHeaders {
    pub fn get(&self, key: ColumnKey) -> &str {
        match key {
            ColumnKey::Date => &self.date,
            ColumnKey::Description => &self.description,
            ColumnKey::Merchant => &self.merchant,
            ColumnKey::Amount => &self.amount,
        }
    }

    pub fn set(&mut self, key: ColumnKey, value: String) {
        match key {
            ColumnKey::Date => self.date = value,
            ColumnKey::Description => self.description = value,
            ColumnKey::Merchant => self.merchant = value,
            ColumnKey::Amount => self.amount = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub report_title: String,
    pub company_name: String,
    pub company_address: String,
    pub company_city: String,
    pub company_country: String,
    pub report_title_label: String,
    pub submitted_by: String,
    pub submitted_on: String,
    pub report_to: String,
    pub reporting_period: String,
    pub business_purpose: String,
    pub add_new_expense: String,
    pub total: String,
    pub expense_desc_placeholder: String,
    pub merchant_placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            report_title: "Expense Report".into(),
            company_name: "Your Company Name".into(),
            company_address: "Company's Address".into(),
            company_city: "City, State Zip".into(),
            company_country: "Country".into(),
            report_title_label: "Report Title".into(),
            submitted_by: "Submitted By".into(),
            submitted_on: "Submitted On".into(),
            report_to: "Report To".into(),
            reporting_period: "Reporting Period".into(),
            business_purpose: "Business Purpose".into(),
            add_new_expense: "Add New Expense".into(),
            total: "TOTAL".into(),
            expense_desc_placeholder: "Expense Description".into(),
            merchant_placeholder: "Merchant Name".into(),
        }
    }
}

impl Labels {
    pub fn get(&self, key: LabelKey) -> &str {
        match key {
            LabelKey::ReportTitle => &self.report_title,
            LabelKey::CompanyName => &self.company_name,
            LabelKey::CompanyAddress => &self.company_address,
            LabelKey::CompanyCity => &self.company_city,
            LabelKey::CompanyCountry => &self.company_country,
            LabelKey::ReportTitleLabel => &self.report_title_label,
            LabelKey::SubmittedBy => &self.submitted_by,
            LabelKey::SubmittedOn => &self.submitted_on,
            LabelKey::ReportTo => &self.report_to,
            LabelKey::ReportingPeriod => &self.reporting_period,
            LabelKey::BusinessPurpose => &self.business_purpose,
            LabelKey::AddNewExpense => &self.add_new_expense,
            LabelKey::Total => &self.total,
            LabelKey::ExpenseDescPlaceholder => &self.expense_desc_placeholder,
            LabelKey::MerchantPlaceholder => &self.merchant_placeholder,
        }
    }

    pub fn set(&mut self, key: LabelKey, value: String) {
        match key {
            LabelKey::ReportTitle => self.report_title = value,
            LabelKey::CompanyName => self.company_name = value,
            LabelKey::CompanyAddress => self.company_address = value,
            LabelKey::CompanyCity => self.company_city = value,
            LabelKey::CompanyCountry => self.company_country = value,
            LabelKey::ReportTitleLabel => self.report_title_label = value,
            LabelKey::SubmittedBy => self.submitted_by = value,
            LabelKey::SubmittedOn => self.submitted_on = value,
            LabelKey::ReportTo => self.report_to = value,
            LabelKey::ReportingPeriod => self.reporting_period = value,
            LabelKey::BusinessPurpose => self.business_purpose = value,
            LabelKey::AddNewExpense => self.add_new_expense = value,
            LabelKey::Total => self.total = value,
            LabelKey::ExpenseDescPlaceholder => self.expense_desc_placeholder = value,
            LabelKey::MerchantPlaceholder => self.merchant_placeholder = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Styling {
    pub colors: Colors,
    pub fonts: Fonts,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Colors {
    pub header_background: String,
    pub header_text: String,
    pub modern_header_background: String,
    pub table_row_odd: String,
    pub table_row_even: String,
    pub table_border: String,
    pub primary_text: String,
    pub secondary_text: String,
    pub total_background: String,
    pub total_border: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            header_background: "#6c757d".into(),
            header_text: "#ffffff".into(),
            modern_header_background: "#667eea".into(),
            table_row_odd: "#ffffff".into(),
            table_row_even: "#f8f9fa".into(),
            table_border: "#e9ecef".into(),
            primary_text: "#333333".into(),
            secondary_text: "#666666".into(),
            total_background: "#f8f9fa".into(),
            total_border: "#dddddd".into(),
        }
    }
}

impl Colors {
    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::HeaderBackground => &self.header_background,
            ColorRole::HeaderText => &self.header_text,
            ColorRole::ModernHeaderBackground => &self.modern_header_background,
            ColorRole::TableRowOdd => &self.table_row_odd,
            ColorRole::TableRowEven => &self.table_row_even,
            ColorRole::TableBorder => &self.table_border,
            ColorRole::PrimaryText => &self.primary_text,
            ColorRole::SecondaryText => &self.secondary_text,
            ColorRole::TotalBackground => &self.total_background,
            ColorRole::TotalBorder => &self.total_border,
        }
    }

    pub fn set(&mut self, role: ColorRole, value: String) {
        match role {
            ColorRole::HeaderBackground => self.header_background = value,
            ColorRole::HeaderText => self.header_text = value,
            ColorRole::ModernHeaderBackground => self.modern_header_background = value,
            ColorRole::TableRowOdd => self.table_row_odd = value,
            ColorRole::TableRowEven => self.table_row_even = value,
            ColorRole::TableBorder => self.table_border = value,
            ColorRole::PrimaryText => self.primary_text = value,
            ColorRole::SecondaryText => self.secondary_text = value,
            ColorRole::TotalBackground => self.total_background = value,
            ColorRole::TotalBorder => self.total_border = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fonts {
    pub family: String,
    pub base_size: String,
    pub header_size: String,
    pub title_size: String,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            family: "-apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, Arial, sans-serif"
                .into(),
            base_size: "14px".into(),
            header_size: "36px".into(),
            title_size: "16px".into(),
        }
    }
}

impl Fonts {
    pub fn set(&mut self, key: FontKey, value: String) {
        match key {
            FontKey::Family => self.family = value,
            FontKey::BaseSize => self.base_size = value,
            FontKey::HeaderSize => self.header_size = value,
            FontKey::TitleSize => self.title_size = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub container_max_width: String,
    pub border_radius: String,
    pub padding: String,
    pub table_padding: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            container_max_width: "900px".into(),
            border_radius: "8px".into(),
            padding: "40px".into(),
            table_padding: "16px 20px".into(),
        }
    }
}

impl Layout {
    pub fn set(&mut self, key: LayoutKey, value: String) {
        match key {
            LayoutKey::ContainerMaxWidth => self.container_max_width = value,
            LayoutKey::BorderRadius => self.border_radius = value,
            LayoutKey::Padding => self.padding = value,
            LayoutKey::TablePadding => self.table_padding = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub position: CurrencyPosition,
    pub decimals: u32,
    pub thousand_separator: String,
    pub decimal_separator: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            code: "USD".into(),
            symbol: "$".into(),
            position: CurrencyPosition::Before,
            decimals: 2,
            thousand_separator: ",".into(),
            decimal_separator: ".".into(),
        }
    }
}

/// Partial currency update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CurrencyUpdate {
    pub code: Option<String>,
    pub symbol: Option<String>,
    pub position: Option<CurrencyPosition>,
    pub decimals: Option<u32>,
    pub thousand_separator: Option<String>,
    pub decimal_separator: Option<String>,
}

impl Currency {
    pub fn apply(&mut self, update: CurrencyUpdate) {
        if let Some(code) = update.code {
            self.code = code;
        }
        if let Some(symbol) = update.symbol {
            self.symbol = symbol;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(decimals) = update.decimals {
            self.decimals = decimals;
        }
        if let Some(sep) = update.thousand_separator {
            self.thousand_separator = sep;
        }
        if let Some(sep) = update.decimal_separator {
            self.decimal_separator = sep;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DateFormatSettings {
    pub format: DateFormat,
    pub display: DateFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportSettings {
    pub number_format: String,
    pub number_start: u32,
    pub auto_increment: bool,
    pub show_report_number: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            number_format: "ER-{number}".into(),
            number_start: 10001,
            auto_increment: true,
            show_report_number: true,
        }
    }
}

/// A single report-settings field change.
#[derive(Debug, Clone)]
pub enum ReportSettingUpdate {
    NumberFormat(String),
    NumberStart(u32),
    AutoIncrement(bool),
    ShowReportNumber(bool),
}

impl ReportSettings {
    pub fn apply(&mut self, update: ReportSettingUpdate) {
        match update {
            ReportSettingUpdate::NumberFormat(v) => self.number_format = v,
            ReportSettingUpdate::NumberStart(v) => self.number_start = v,
            ReportSettingUpdate::AutoIncrement(v) => self.auto_increment = v,
            ReportSettingUpdate::ShowReportNumber(v) => self.show_report_number = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSettings {
    pub visible: bool,
    pub order: u32,
    pub width: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            visible: true,
            order: 0,
            width: "auto".into(),
        }
    }
}

/// Partial column update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    pub visible: Option<bool>,
    pub order: Option<u32>,
    pub width: Option<String>,
}

impl ColumnSettings {
    fn new(order: u32, width: &str) -> Self {
        Self {
            visible: true,
            order,
            width: width.into(),
        }
    }

    pub fn apply(&mut self, update: ColumnUpdate) {
        if let Some(visible) = update.visible {
            self.visible = visible;
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Columns {
    pub date: ColumnSettings,
    pub description: ColumnSettings,
    pub merchant: ColumnSettings,
    pub amount: ColumnSettings,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            date: ColumnSettings::new(0, "140px"),
            description: ColumnSettings::new(1, "1fr"),
            merchant: ColumnSettings::new(2, "180px"),
            amount: ColumnSettings::new(3, "120px"),
        }
    }
}

impl Columns {
    pub fn get_mut(&mut self, key: ColumnKey) -> &mut ColumnSettings {
        match key {
            ColumnKey::Date => &mut self.date,
            ColumnKey::Description => &mut self.description,
            ColumnKey::Merchant => &mut self.merchant,
            ColumnKey::Amount => &mut self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_load_expectations() {
        let settings = Settings::default();
        assert_eq!(settings.header_style, HeaderStyle::Standard);
        assert_eq!(settings.currency.symbol, "$");
        assert_eq!(settings.currency.decimals, 2);
        assert_eq!(settings.report_settings.number_start, 10001);
        assert_eq!(settings.labels.total, "TOTAL");
        assert_eq!(settings.styling.colors.header_background, "#6c757d");
        assert_eq!(settings.columns.merchant.width, "180px");
    }

    #[test]
    fn partial_blob_merges_under_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"labels":{"total":"SUM"}}"#).unwrap();
        assert_eq!(settings.labels.total, "SUM");
        assert_eq!(settings.labels.report_title, "Expense Report");
        assert_eq!(settings.labels.company_name, "Your Company Name");
        assert_eq!(settings.table_headers.date, "Date");
        assert_eq!(settings.header_style, HeaderStyle::Standard);
    }

    #[test]
    fn unknown_header_style_falls_back_to_standard() {
        let settings: Settings =
            serde_json::from_str(r#"{"headerStyle":"futuristic"}"#).unwrap();
        assert_eq!(settings.header_style, HeaderStyle::Standard);

        let settings: Settings = serde_json::from_str(r#"{"headerStyle":"modern"}"#).unwrap();
        assert_eq!(settings.header_style, HeaderStyle::Modern);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"tableHeaders\""));
        assert!(json.contains("\"headerStyle\":\"standard\""));
        assert!(json.contains("\"thousandSeparator\""));
        assert!(json.contains("\"numberFormat\":\"ER-{number}\""));
        assert!(json.contains("\"format\":\"YYYY-MM-DD\""));
    }

    #[test]
    fn currency_partial_update_keeps_other_fields() {
        let mut currency = Currency::default();
        currency.apply(CurrencyUpdate {
            symbol: Some("€".into()),
            position: Some(CurrencyPosition::After),
            ..Default::default()
        });
        assert_eq!(currency.symbol, "€");
        assert_eq!(currency.position, CurrencyPosition::After);
        assert_eq!(currency.code, "USD");
        assert_eq!(currency.decimals, 2);
    }
}
