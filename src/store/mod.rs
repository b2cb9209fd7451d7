//! SQLite-backed order persistence. Every call borrows one pooled connection
//! for a single statement; SQLite serialises concurrent writers.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::engine::pricing::{estimated_minutes, generate_order_id, total_amount};
use crate::error::AppError;
use crate::models::order::{NewOrder, Order, OrderStatus};

const MAX_ID_ATTEMPTS: usize = 5;

const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    customer_name TEXT,
    table_number INTEGER,
    items TEXT,
    total_amount REAL,
    status TEXT DEFAULT 'pending',
    order_time TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    estimated_time INTEGER DEFAULT 15
)
"#;

const SELECT_ORDER_COLUMNS: &str = "SELECT id, customer_name, table_number, items, total_amount, \
     status, order_time, estimated_time FROM orders";

/// Normalises both the current text format and the bare `YYYY-MM-DD HH:MM:SS`
/// that `CURRENT_TIMESTAMP` wrote in older databases.
const ORDER_TIME_KEY: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', order_time)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotals {
    pub total_orders: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub today: DayTotals,
    pub status_breakdown: BTreeMap<OrderStatus, i64>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    customer_name: Option<String>,
    table_number: i64,
    items: String,
    total_amount: f64,
    status: String,
    order_time: String,
    estimated_time: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|err| AppError::Internal(format!("order {}: {err}", row.id)))?;
        let order_time = decode_time(&row.order_time)
            .map_err(|err| AppError::Internal(format!("order {}: bad order_time: {err}", row.id)))?;
        let table_number = u8::try_from(row.table_number)
            .map_err(|err| AppError::Internal(format!("order {}: bad table_number: {err}", row.id)))?;
        let estimated_time = u32::try_from(row.estimated_time).map_err(|err| {
            AppError::Internal(format!("order {}: bad estimated_time: {err}", row.id))
        })?;

        Ok(Order {
            items: serde_json::from_str(&row.items)?,
            id: row.id,
            customer_name: row.customer_name.unwrap_or_default(),
            table_number,
            total_amount: row.total_amount,
            status,
            order_time,
            estimated_time,
        })
    }
}

/// Same shape as the column default: fixed-width UTC with milliseconds.
fn encode_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|time| time.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|naive| naive.and_utc())
        })
}

#[derive(Clone)]
pub struct OrderStore {
    pool: SqlitePool,
    next_id: fn() -> String,
}

impl OrderStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        // in-memory databases live only as long as their connection
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;

        let store = Self {
            pool,
            next_id: generate_order_id,
        };
        store.migrate().await?;
        Ok(store)
    }

    pub fn with_id_generator(mut self, next_id: fn() -> String) -> Self {
        self.next_id = next_id;
        self
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_ORDERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order, AppError> {
        let total = total_amount(&new_order.items)
            .ok_or_else(|| AppError::BadRequest("order total is out of range".to_string()))?;
        let estimated_time = estimated_minutes(&new_order.items)
            .ok_or_else(|| AppError::BadRequest("too many items in one order".to_string()))?;
        let items = serde_json::to_string(&new_order.items)?;
        let order_time = Utc::now().trunc_subsecs(3);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            let result = sqlx::query(
                "INSERT INTO orders (id, customer_name, table_number, items, total_amount, \
                 status, order_time, estimated_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&new_order.customer_name)
            .bind(i64::from(new_order.table_number))
            .bind(&items)
            .bind(total)
            .bind(OrderStatus::Pending.as_str())
            .bind(encode_time(order_time))
            .bind(i64::from(estimated_time))
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => {
                    return Ok(Order {
                        id,
                        customer_name: new_order.customer_name,
                        table_number: new_order.table_number,
                        items: new_order.items,
                        total_amount: total,
                        status: OrderStatus::Pending,
                        order_time,
                        estimated_time,
                    });
                }
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    tracing::warn!(order_id = %id, "order id collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::Internal(format!(
            "could not allocate a unique order id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER_COLUMNS} ORDER BY {ORDER_TIME_KEY} DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, AppError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        Order::try_from(row)
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }

    pub async fn daily_stats(&self) -> Result<DailyStats, AppError> {
        self.stats_for_day(Local::now().date_naive()).await
    }

    /// Orders placed during the given server-local calendar day.
    pub async fn stats_for_day(&self, day: NaiveDate) -> Result<DailyStats, AppError> {
        let (start, end) = local_day_bounds(day)?;
        let (start, end) = (encode_time(start), encode_time(end));

        let (total_orders, total_revenue): (i64, f64) = sqlx::query_as(&format!(
            "SELECT COUNT(*), COALESCE(SUM(total_amount), 0.0) FROM orders \
             WHERE {ORDER_TIME_KEY} >= ? AND {ORDER_TIME_KEY} < ?"
        ))
        .bind(&start)
        .bind(&end)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT status, COUNT(*) FROM orders \
             WHERE {ORDER_TIME_KEY} >= ? AND {ORDER_TIME_KEY} < ? GROUP BY status"
        ))
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        let mut status_breakdown = BTreeMap::new();
        for (status, count) in rows {
            let status = status
                .parse::<OrderStatus>()
                .map_err(|err| AppError::Internal(err.to_string()))?;
            status_breakdown.insert(status, count);
        }

        Ok(DailyStats {
            today: DayTotals {
                total_orders,
                total_revenue,
            },
            status_breakdown,
        })
    }
}

/// Half-open UTC range covering one local calendar day.
fn local_day_bounds(day: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let next = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Internal(format!("no day after {day}")))?;
    Ok((local_midnight(day)?, local_midnight(next)?))
}

fn local_midnight(day: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppError::Internal(format!("cannot resolve local midnight for {day}")))
}
