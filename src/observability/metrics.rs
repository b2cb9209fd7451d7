use prometheus::{Counter, Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_created_total: IntCounter,
    pub order_status_updates_total: IntCounterVec,
    pub order_revenue_total: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_created_total =
            IntCounter::new("orders_created_total", "Total orders placed")
                .expect("valid orders_created_total metric");

        let order_status_updates_total = IntCounterVec::new(
            Opts::new(
                "order_status_updates_total",
                "Total status updates by target status",
            ),
            &["status"],
        )
        .expect("valid order_status_updates_total metric");

        let order_revenue_total = Counter::new(
            "order_revenue_total",
            "Sum of total_amount over placed orders",
        )
        .expect("valid order_revenue_total metric");

        registry
            .register(Box::new(orders_created_total.clone()))
            .expect("register orders_created_total");
        registry
            .register(Box::new(order_status_updates_total.clone()))
            .expect("register order_status_updates_total");
        registry
            .register(Box::new(order_revenue_total.clone()))
            .expect("register order_revenue_total");

        Self {
            registry,
            orders_created_total,
            order_status_updates_total,
            order_revenue_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
