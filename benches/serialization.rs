use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_marktable::{
    from_str, from_str_many, to_string, to_string_many, to_string_with_options, MarkOptions,
    Table,
};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn nested_data() -> NestedData {
    NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    }
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let table = "|active|email            |id |name |\n\
                 |------|-----------------|---|-----|\n\
                 |true  |alice@example.com|123|Alice|";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(table)))
    });
}

fn benchmark_serialize_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_rows");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string_many(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_rows");

    for size in [10, 50, 100, 500].iter() {
        let table = to_string_many(&products(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| from_str_many::<Product>(black_box(table)))
        });
    }
    group.finish();
}

fn benchmark_serialize_nested(c: &mut Criterion) {
    let data = nested_data();

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
}

fn benchmark_deserialize_nested(c: &mut Criterion) {
    let table = to_string(&nested_data()).unwrap();

    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| from_str::<NestedData>(black_box(&table)))
    });
}

fn benchmark_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("padding");
    let products = products(100);

    group.bench_function("padded", |b| {
        b.iter(|| to_string_many(black_box(&products)))
    });

    group.bench_function("compact", |b| {
        b.iter(|| {
            serde_marktable::to_string_many_with_options(
                black_box(&products),
                MarkOptions::compact(),
            )
        })
    });

    group.finish();
}

fn benchmark_table_parse(c: &mut Criterion) {
    let table = to_string_many(&products(100)).unwrap();

    c.bench_function("parse_table_100_rows", |b| {
        b.iter(|| Table::parse(black_box(&table)))
    });
}

fn benchmark_scalar_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_list");

    let numbers: Vec<i32> = (0..100).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("serialize_integers", |b| {
        b.iter(|| to_string(black_box(&numbers)))
    });

    group.bench_function("serialize_floats", |b| {
        b.iter(|| to_string(black_box(&floats)))
    });

    let numbers_table = to_string(&numbers).unwrap();
    let floats_table = to_string(&floats).unwrap();

    group.bench_function("deserialize_integers", |b| {
        b.iter(|| from_str::<Vec<i32>>(black_box(&numbers_table)))
    });

    group.bench_function("deserialize_floats", |b| {
        b.iter(|| from_str::<Vec<f64>>(black_box(&floats_table)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    let mut group = c.benchmark_group("comparison");

    group.bench_function("table_serialize", |b| {
        b.iter(|| to_string_with_options(black_box(&user), MarkOptions::compact()))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&user)))
    });

    let table = to_string(&user).unwrap();
    let json_str = serde_json::to_string(&user).unwrap();

    group.bench_function("table_deserialize", |b| {
        b.iter(|| from_str::<User>(black_box(&table)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<User>(black_box(&json_str)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_rows,
    benchmark_deserialize_rows,
    benchmark_serialize_nested,
    benchmark_deserialize_nested,
    benchmark_padding,
    benchmark_table_parse,
    benchmark_scalar_list,
    benchmark_comparison_with_json
);
criterion_main!(benches);
