use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use models::validation::{parse_subscription_request, SubscriptionPayload, SumQuery};
use service::subscription::repository::mock::MockSubscriptionRepository;
use service::SubscriptionService;

fn payload(start: &str) -> SubscriptionPayload {
    SubscriptionPayload {
        service_name: Some("Yandex Plus".into()),
        price: Some(400),
        user_id: Some("60601fee-2bf1-4721-ae6f-7636e79a0cba".into()),
        start_date: Some(start.into()),
        end_date: Some("12-2025".into()),
    }
}

fn bench_validation(c: &mut Criterion) {
    let p = payload("07-2025");
    c.bench_function("parse_subscription_request", |b| {
        b.iter(|| parse_subscription_request(&p).unwrap());
    });
}

fn bench_sum(c: &mut Criterion) {
    let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    let rt = tokio::runtime::Runtime::new().unwrap();
    // a year of rows to scan
    for month in 1..=12 {
        rt.block_on(svc.create(&payload(&format!("{month:02}-2025")))).unwrap();
    }
    let query = SumQuery {
        start_date: Some("01-2025".into()),
        end_date: Some("12-2025".into()),
        ..SumQuery::default()
    };

    c.bench_function("sum_subscription_prices_mock", |b| {
        b.iter(|| rt.block_on(svc.sum(&query)).unwrap());
    });
}

criterion_group!(benches, bench_validation, bench_sum);
criterion_main!(benches);
