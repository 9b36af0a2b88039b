// src/models/mod.rs

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ───────────────────────────────────────
// Commission record (one aggregated row)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: i32,
    #[serde(rename = "ProductCategoryDescription")]
    pub product_category_description: Option<String>,
    #[serde(rename = "InternalReplacement")]
    pub internal_replacement: bool,
    #[serde(rename = "Type")]
    pub commission_type: Option<String>,
    #[serde(rename = "Personality_To_Use")]
    pub personality_to_use: Option<String>,
    #[serde(rename = "Amount", with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
    #[serde(rename = "NewBusinessMonthlyPremium", with = "rust_decimal::serde::str_option")]
    pub new_business_monthly_premium: Option<Decimal>,
    #[serde(rename = "SalesCount_Client")]
    pub sales_count_client: Option<i64>,
    #[serde(rename = "SalesCount_Product")]
    pub sales_count_product: Option<i64>,
}

/// (Year, Month, ProductCategoryDescription, InternalReplacement, Type, Personality_To_Use)
pub type GroupingKey<'a> = (i32, i32, Option<&'a str>, bool, Option<&'a str>, Option<&'a str>);

impl CommissionRecord {
    pub fn grouping_key(&self) -> GroupingKey<'_> {
        (
            self.year,
            self.month,
            self.product_category_description.as_deref(),
            self.internal_replacement,
            self.commission_type.as_deref(),
            self.personality_to_use.as_deref(),
        )
    }
}

/// Number of records whose grouping key already appeared earlier in the set.
pub fn duplicate_keys(records: &[CommissionRecord]) -> usize {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().filter(|r| !seen.insert(r.grouping_key())).count()
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

// ───────────────────────────────────────
// Summary
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_new_business_premium: Decimal,
    pub total_clients: i64,
    pub total_products: i64,
    pub product_categories_count: usize,
    pub personality_types_count: usize,
    pub total_records: usize,
}

impl CommissionSummary {
    /// Null values are skipped in every sum; empty strings don't count as a
    /// category or personality.
    pub fn from_records(records: &[CommissionRecord]) -> Self {
        let categories: HashSet<&str> =
            records.iter().filter_map(|r| non_empty(&r.product_category_description)).collect();
        let personalities: HashSet<&str> =
            records.iter().filter_map(|r| non_empty(&r.personality_to_use)).collect();

        CommissionSummary {
            total_amount: records.iter().filter_map(|r| r.amount).sum(),
            total_new_business_premium: records
                .iter()
                .filter_map(|r| r.new_business_monthly_premium)
                .sum(),
            total_clients: records.iter().filter_map(|r| r.sales_count_client).sum(),
            total_products: records.iter().filter_map(|r| r.sales_count_product).sum(),
            product_categories_count: categories.len(),
            personality_types_count: personalities.len(),
            total_records: records.len(),
        }
    }
}

// ───────────────────────────────────────
// JSON envelopes
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope {
    pub status: String,
    pub data: Vec<CommissionRecord>,
    pub count: usize,
}

impl DataEnvelope {
    pub fn success(data: Vec<CommissionRecord>) -> Self {
        DataEnvelope { status: "success".into(), count: data.len(), data }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryEnvelope {
    pub status: String,
    pub summary: CommissionSummary,
}

impl SummaryEnvelope {
    pub fn success(summary: CommissionSummary) -> Self {
        SummaryEnvelope { status: "success".into(), summary }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorEnvelope { status: "error".into(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(category: Option<&str>, personality: Option<&str>, amount: Option<&str>) -> CommissionRecord {
        CommissionRecord {
            year: 2026,
            month: 9,
            product_category_description: category.map(String::from),
            internal_replacement: false,
            commission_type: Some("initial".into()),
            personality_to_use: personality.map(String::from),
            amount: amount.map(dec),
            new_business_monthly_premium: Some(dec("100.50")),
            sales_count_client: Some(1),
            sales_count_product: Some(2),
        }
    }

    #[test]
    fn summary_skips_nulls_and_blank_labels() {
        let mut blank = record(Some(""), Some(""), None);
        blank.new_business_monthly_premium = None;
        blank.sales_count_client = None;
        blank.sales_count_product = None;

        let records = vec![
            record(Some("Funeral"), Some("Consultant"), Some("250.25")),
            record(Some("Funeral"), Some("Intermediary"), Some("-50.25")),
            record(Some("Life"), None, Some("10")),
            blank,
        ];
        let s = CommissionSummary::from_records(&records);

        assert_eq!(s.total_amount, dec("210.00"));
        assert_eq!(s.total_new_business_premium, dec("301.50"));
        assert_eq!(s.total_clients, 3);
        assert_eq!(s.total_products, 6);
        assert_eq!(s.product_categories_count, 2);
        assert_eq!(s.personality_types_count, 2);
        assert_eq!(s.total_records, 4);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let s = CommissionSummary::from_records(&[]);
        assert_eq!(s.total_amount, Decimal::ZERO);
        assert_eq!(s.total_records, 0);
        assert_eq!(s.product_categories_count, 0);
    }

    #[test]
    fn record_serializes_with_column_names() {
        let v = serde_json::to_value(record(Some("Funeral"), Some("Consultant"), Some("12.5"))).unwrap();
        assert_eq!(v["Year"], 2026);
        assert_eq!(v["ProductCategoryDescription"], "Funeral");
        assert_eq!(v["Personality_To_Use"], "Consultant");
        assert_eq!(v["InternalReplacement"], false);
        assert_eq!(v["Amount"], "12.5");
        assert_eq!(v["SalesCount_Product"], 2);

        let nulls = serde_json::to_value(record(None, None, None)).unwrap();
        assert!(nulls["Amount"].is_null());
        assert!(nulls["ProductCategoryDescription"].is_null());
    }

    #[test]
    fn grouping_key_ignores_measures() {
        let a = record(Some("Funeral"), Some("Consultant"), Some("1"));
        let mut b = a.clone();
        b.amount = Some(dec("99"));
        b.sales_count_client = Some(7);
        assert_eq!(a.grouping_key(), b.grouping_key());
        b.internal_replacement = true;
        assert_ne!(a.grouping_key(), b.grouping_key());
    }

    #[test]
    fn money_above_f64_precision_stays_exact() {
        let big = record(Some("Funeral"), Some("Consultant"), Some("12345678901234.5678"));
        let v = serde_json::to_value(&big).unwrap();
        assert_eq!(v["Amount"], "12345678901234.5678");
        assert_eq!(v["NewBusinessMonthlyPremium"], "100.50");

        let back: CommissionRecord = serde_json::from_value(v).unwrap();
        assert_eq!(back.amount, Some(dec("12345678901234.5678")));

        let s = CommissionSummary::from_records(&[big.clone(), big]);
        assert_eq!(s.total_amount, dec("24691357802469.1356"));
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["total_amount"], "24691357802469.1356");
        assert_eq!(v["total_new_business_premium"], "201.00");
    }

    #[test]
    fn duplicate_keys_counts_repeats_only() {
        let a = record(Some("Funeral"), Some("Consultant"), Some("1"));
        let mut support = a.clone();
        support.amount = Some(dec("5"));
        support.new_business_monthly_premium = Some(Decimal::ZERO);
        let other = record(Some("Life"), Some("Consultant"), Some("1"));
        assert_eq!(duplicate_keys(&[a.clone(), other.clone()]), 0);
        assert_eq!(duplicate_keys(&[a, other, support]), 1);
        assert_eq!(duplicate_keys(&[]), 0);
    }

    #[test]
    fn data_envelope_counts_records() {
        let env = DataEnvelope::success(vec![record(None, None, None); 3]);
        assert_eq!(env.count, 3);
        assert_eq!(env.status, "success");
    }
}
