use criterion::{BenchmarkId, Criterion, Throughput};
use libgolioth::sys::*;
use libgolioth::{Client, Options, Path, Value};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use std::ffi::{CStr, c_int};
use std::hint::black_box;
use std::ptr::NonNull;

/// SDK that accepts every call immediately.
struct NullSdk {
    token: u8,
}

impl Sdk for NullSdk {
    fn client_create(&self, _config: &golioth_client_config_t) -> *mut golioth_client_t {
        NonNull::from(&self.token)
            .cast::<golioth_client_t>()
            .as_ptr()
    }

    fn client_wait_for_connect(&self, _client: ClientHandle, _timeout_ms: i32) -> bool {
        true
    }

    fn lightdb_set_int(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: i32,
        _timeout_ms: i32,
    ) -> c_int {
        black_box((path, value));
        0
    }

    fn lightdb_set_bool(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: bool,
        _timeout_ms: i32,
    ) -> c_int {
        black_box((path, value));
        0
    }

    fn lightdb_set_float(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: f32,
        _timeout_ms: i32,
    ) -> c_int {
        black_box((path, value));
        0
    }

    fn lightdb_set_string(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: &[u8],
        _timeout_ms: i32,
    ) -> c_int {
        black_box((path, value));
        0
    }

    fn lightdb_set_json(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: &[u8],
        _timeout_ms: i32,
    ) -> c_int {
        black_box((path, value));
        0
    }
}

fn random_text(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn bench_set_dispatch(c: &mut Criterion) {
    let sdk = NullSdk { token: 0 };
    let client = Client::connect_psk(&sdk, b"bench", b"bench", Options::default()).unwrap();
    let lightdb = client.lightdb();
    let text = random_text(64);

    let values = [
        Value::Int(rand::thread_rng().r#gen()),
        Value::Bool(true),
        Value::Float(rand::thread_rng().r#gen()),
        Value::String(&text),
        Value::Json(r#"{"key0":14,"array":[5,6,7,8]}"#),
    ];

    let mut group = c.benchmark_group("lightdb_set");
    group.throughput(Throughput::Elements(1));
    for value in values {
        group.bench_with_input(BenchmarkId::from_parameter(value.kind()), &value, |b, value| {
            b.iter(|| lightdb.set(black_box("sensors/bench"), *value).unwrap())
        });
    }
    group.finish();
}

#[derive(Serialize)]
struct Nested {
    key1: i32,
}

#[derive(Serialize)]
struct Reading<'a> {
    key0: i32,
    label: &'a str,
    nested: Nested,
    array: [i32; 8],
}

pub fn bench_set_structured(c: &mut Criterion) {
    let sdk = NullSdk { token: 0 };
    let client = Client::connect_psk(&sdk, b"bench", b"bench", Options::default()).unwrap();
    let lightdb = client.lightdb();
    let label = random_text(32);
    let mut rng = rand::thread_rng();
    let reading = Reading {
        key0: rng.r#gen(),
        label: &label,
        nested: Nested { key1: rng.r#gen() },
        array: rng.r#gen(),
    };

    c.bench_function("lightdb_set_structured", |b| {
        b.iter(|| {
            let reading = black_box(&reading);
            lightdb.set_structured("structured_data", reading).unwrap()
        })
    });
}

pub fn bench_path_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_encoding");
    for len in [8usize, 32, 128] {
        let path = random_text(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &path, |b, path| {
            b.iter(|| Path::new(black_box(path)).unwrap())
        });
    }
    group.finish();
}
