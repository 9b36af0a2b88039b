#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use chrono::NaiveDate;
use commission_dashboard::{
    app, config::Settings, db::CommissionSource, models::CommissionRecord, AppState,
};
use rust_decimal::Decimal;
use tokio::net::TcpListener;

/// Returns canned rows, or the failure signal when `records` is `None`.
pub struct StubSource {
    pub records: Option<Vec<CommissionRecord>>,
}

impl CommissionSource for StubSource {
    async fn get_commission_data(
        &self,
        _start_date: NaiveDate,
        _end_date: Option<NaiveDate>,
    ) -> Option<Vec<CommissionRecord>> {
        self.records.clone()
    }
}

pub struct PanickingSource;

impl CommissionSource for PanickingSource {
    async fn get_commission_data(
        &self,
        _start_date: NaiveDate,
        _end_date: Option<NaiveDate>,
    ) -> Option<Vec<CommissionRecord>> {
        panic!("row decoder exploded")
    }
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("decimal literal")
}

#[allow(clippy::too_many_arguments)]
pub fn record(
    month: i32,
    category: Option<&str>,
    replacement: bool,
    kind: &str,
    personality: Option<&str>,
    amount: Option<&str>,
    premium: Option<&str>,
    counts: Option<(i64, i64)>,
) -> CommissionRecord {
    CommissionRecord {
        year: 2026,
        month,
        product_category_description: category.map(String::from),
        internal_replacement: replacement,
        commission_type: Some(kind.to_string()),
        personality_to_use: personality.map(String::from),
        amount: amount.map(dec),
        new_business_monthly_premium: premium.map(dec),
        sales_count_client: counts.map(|c| c.0),
        sales_count_product: counts.map(|c| c.1),
    }
}

/// A small window: primary-source rows plus support-sales rows (zeroed
/// premium and counts) and one row with NULL measures.
pub fn sample_records() -> Vec<CommissionRecord> {
    vec![
        record(8, Some("Funeral"), false, "initial", Some("Consultant"), Some("1200.50"), Some("350.25"), Some((3, 4))),
        record(8, Some("Funeral"), true, "initial", Some("Intermediary"), Some("80.25"), Some("0"), Some((0, 1))),
        record(9, Some("Life"), false, "Clawback", Some("Consultant"), Some("-150.75"), Some("0"), Some((0, 0))),
        record(9, Some("Life"), false, "initial", Some("ABC"), Some("45.5"), Some("0"), Some((0, 0))),
        record(9, Some("Life"), false, "Retention Fee", Some("Retention Officer"), Some("12.25"), Some("0"), Some((0, 0))),
        record(10, Some(""), false, "initial", None, None, None, None),
    ]
}

pub async fn spawn_app<S: CommissionSource>(source: S) -> String {
    spawn_app_with(source, Settings::default()).await
}

pub async fn spawn_app_with<S: CommissionSource>(source: S, settings: Settings) -> String {
    let router = app(AppState::new(source, Arc::new(settings)));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.expect("serve");
    });
    format!("http://{addr}")
}
