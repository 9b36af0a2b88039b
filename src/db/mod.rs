// src/db/mod.rs

use std::{future::Future, sync::Arc};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tiberius::{Client, ColumnData, Row};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use crate::{
    config::Settings,
    error::{DashboardError, DashboardResult},
    models::{duplicate_keys, CommissionRecord},
};

pub mod query;

use query::RESULT_COLUMNS;

/// Anything that can produce the aggregated commission rows.
///
/// `None` means the data could not be fetched; the cause has already been
/// logged by the implementation.
pub trait CommissionSource: Send + Sync + 'static {
    fn get_commission_data(
        &self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> impl Future<Output = Option<Vec<CommissionRecord>>> + Send;
}

/// Runs the aggregation batch against SQL Server, one connection per call.
pub struct SqlServerSource {
    settings: Arc<Settings>,
}

impl SqlServerSource {
    pub fn new(settings: Arc<Settings>) -> Self {
        SqlServerSource { settings }
    }

    pub async fn fetch(&self, end_date: Option<NaiveDate>) -> DashboardResult<Vec<CommissionRecord>> {
        let config = self.settings.tiberius_config()?;
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        let mut client = Client::connect(config, tcp.compat_write()).await?;

        let sql = query::commission_query(end_date);
        let mut stream = client.simple_query(sql).await?;
        let layout = match stream.columns().await? {
            Some(columns) => Some(ColumnLayout::resolve(columns.iter().map(|c| c.name()))?),
            None => None,
        };
        let rows = stream.into_first_result().await?;
        client.close().await?;

        let layout = match layout {
            Some(layout) => layout,
            None if rows.is_empty() => return Ok(Vec::new()),
            None => ColumnLayout::resolve(rows[0].columns().iter().map(|c| c.name()))?,
        };
        rows.into_iter().map(|row| layout.record_from_row(row)).collect()
    }
}

impl CommissionSource for SqlServerSource {
    async fn get_commission_data(
        &self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Option<Vec<CommissionRecord>> {
        // The window always starts two months back; start_date does not reach the query.
        tracing::debug!(%start_date, ?end_date, "fetching commission data");
        match self.fetch(end_date).await {
            Ok(records) => {
                // UNION of the two branches may repeat a grouping key
                tracing::debug!(
                    count = records.len(),
                    duplicate_keys = duplicate_keys(&records),
                    "commission data fetched"
                );
                Some(records)
            }
            Err(e) => {
                tracing::error!(error = %e, server = %self.settings.sql_server, "database error");
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row mapping
// ─────────────────────────────────────────────────────────────────────────────

/// Positions of the expected result columns within a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    positions: [usize; RESULT_COLUMNS.len()],
}

impl ColumnLayout {
    pub fn resolve<'a>(names: impl IntoIterator<Item = &'a str>) -> DashboardResult<Self> {
        let names: Vec<&str> = names.into_iter().collect();
        let mut positions = [0usize; RESULT_COLUMNS.len()];
        for (slot, expected) in positions.iter_mut().zip(RESULT_COLUMNS) {
            *slot = names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(expected))
                .ok_or(DashboardError::MissingColumn(expected))?;
        }
        Ok(ColumnLayout { positions })
    }

    pub fn record_from_row(&self, row: Row) -> DashboardResult<CommissionRecord> {
        let values: Vec<ColumnData<'static>> = row.into_iter().collect();
        self.record_from_values(&values)
    }

    pub fn record_from_values(&self, values: &[ColumnData<'static>]) -> DashboardResult<CommissionRecord> {
        Ok(CommissionRecord {
            year: self.required_i32(values, 0)?,
            month: self.required_i32(values, 1)?,
            product_category_description: self.get(values, 2, text_value)?,
            internal_replacement: required(self.get(values, 3, bit_value)?, RESULT_COLUMNS[3])?,
            commission_type: self.get(values, 4, text_value)?,
            personality_to_use: self.get(values, 5, text_value)?,
            amount: self.get(values, 6, decimal_value)?,
            new_business_monthly_premium: self.get(values, 7, decimal_value)?,
            sales_count_client: self.get(values, 8, int_value)?,
            sales_count_product: self.get(values, 9, int_value)?,
        })
    }

    fn required_i32(&self, values: &[ColumnData<'static>], index: usize) -> DashboardResult<i32> {
        let name = RESULT_COLUMNS[index];
        let n = required(self.get(values, index, int_value)?, name)?;
        i32::try_from(n).map_err(|_| DashboardError::OutOfRange { column: name, value: n })
    }

    fn get<T>(
        &self,
        values: &[ColumnData<'static>],
        index: usize,
        read: fn(&'static str, &ColumnData<'_>) -> DashboardResult<Option<T>>,
    ) -> DashboardResult<Option<T>> {
        let name = RESULT_COLUMNS[index];
        let value = values
            .get(self.positions[index])
            .ok_or(DashboardError::MissingColumn(name))?;
        read(name, value)
    }
}

fn required<T>(value: Option<T>, column: &'static str) -> DashboardResult<T> {
    value.ok_or(DashboardError::UnexpectedNull(column))
}

fn kind(value: &ColumnData<'_>) -> &'static str {
    match value {
        ColumnData::U8(_) => "tinyint",
        ColumnData::I16(_) => "smallint",
        ColumnData::I32(_) => "int",
        ColumnData::I64(_) => "bigint",
        ColumnData::F32(_) => "real",
        ColumnData::F64(_) => "float",
        ColumnData::Bit(_) => "bit",
        ColumnData::String(_) => "string",
        ColumnData::Numeric(_) => "numeric",
        ColumnData::Guid(_) => "uniqueidentifier",
        ColumnData::Binary(_) => "binary",
        _ => "temporal/xml",
    }
}

fn unexpected(column: &'static str, value: &ColumnData<'_>) -> DashboardError {
    DashboardError::UnexpectedType { column, found: kind(value) }
}

fn int_value(column: &'static str, value: &ColumnData<'_>) -> DashboardResult<Option<i64>> {
    match value {
        ColumnData::U8(v) => Ok(v.map(i64::from)),
        ColumnData::I16(v) => Ok(v.map(i64::from)),
        ColumnData::I32(v) => Ok(v.map(i64::from)),
        ColumnData::I64(v) => Ok(*v),
        ColumnData::Bit(v) => Ok(v.map(i64::from)),
        // whole-number decimals, e.g. SUM over a numeric flag
        ColumnData::Numeric(None) => Ok(None),
        ColumnData::Numeric(Some(n)) if n.scale() == 0 => i64::try_from(n.value())
            .map(Some)
            .map_err(|_| unexpected(column, value)),
        other => Err(unexpected(column, other)),
    }
}

fn bit_value(column: &'static str, value: &ColumnData<'_>) -> DashboardResult<Option<bool>> {
    match value {
        ColumnData::Bit(v) => Ok(*v),
        ColumnData::U8(v) => Ok(v.map(|b| b != 0)),
        ColumnData::I32(v) => Ok(v.map(|b| b != 0)),
        other => Err(unexpected(column, other)),
    }
}

fn text_value(column: &'static str, value: &ColumnData<'_>) -> DashboardResult<Option<String>> {
    match value {
        ColumnData::String(v) => Ok(v.as_ref().map(|s| s.to_string())),
        other => Err(unexpected(column, other)),
    }
}

/// `decimal`/`numeric` arrive exactly; `money` arrives as a float and is
/// rounded back to its four decimal places.
fn decimal_value(column: &'static str, value: &ColumnData<'_>) -> DashboardResult<Option<Decimal>> {
    match value {
        ColumnData::Numeric(None) => Ok(None),
        ColumnData::Numeric(Some(n)) => Decimal::try_from_i128_with_scale(n.value(), u32::from(n.scale()))
            .map(Some)
            .map_err(|_| unexpected(column, value)),
        ColumnData::F64(v) => float_decimal(column, value, *v),
        ColumnData::F32(v) => float_decimal(column, value, v.map(f64::from)),
        ColumnData::U8(v) => Ok(v.map(Decimal::from)),
        ColumnData::I16(v) => Ok(v.map(Decimal::from)),
        ColumnData::I32(v) => Ok(v.map(Decimal::from)),
        ColumnData::I64(v) => Ok(v.map(Decimal::from)),
        other => Err(unexpected(column, other)),
    }
}

fn float_decimal(
    column: &'static str,
    value: &ColumnData<'_>,
    v: Option<f64>,
) -> DashboardResult<Option<Decimal>> {
    match v {
        None => Ok(None),
        Some(f) => Decimal::from_f64_retain(f)
            .map(|d| Some(d.round_dp(4).normalize()))
            .ok_or_else(|| unexpected(column, value)),
    }
}
