use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::hint::black_box;

use xapi_util::language::{LanguageMap, StaticLocale, lookup};
use xapi_util::record::Statement;
use xapi_util::resolver::EntityResolver;
use xapi_util::temporal::{parse, Timestamp};

fn bench_timestamps(c: &mut Criterion) {
    c.bench_function("parse full timestamp", |b| {
        b.iter(|| parse(black_box("2016-06-15T10:00:00.123+02:00")))
    });
    c.bench_function("parse year", |b| b.iter(|| parse(black_box("2016"))));
    let t = Timestamp::from_millis(1_466_000_000_123).unwrap();
    c.bench_function("format timestamp", |b| b.iter(|| black_box(&t).to_string()));
}

fn bench_resolution(c: &mut Criterion) {
    let map: LanguageMap = LanguageMap::from([
        ("en".to_string(), "attempted".to_string()),
        ("sv".to_string(), "försökte".to_string()),
    ]);
    c.bench_function("lookup with two fallbacks", |b| b.iter(|| lookup(&map, black_box("en-US-CA"))));

    let statement: Statement = serde_json::from_value(json!({
        "actor": { "mbox": "mailto:a@b.com" },
        "verb": { "id": "http://adlnet.gov/expapi/verbs/attempted", "display": { "en": "attempted" } },
        "object": {
            "objectType": "SubStatement",
            "actor": { "account": { "homePage": "http://x", "name": "n" } },
            "verb": { "id": "http://adlnet.gov/expapi/verbs/passed" },
            "object": { "id": "http://example.com/course", "definition": { "name": { "en-US": "Course" } } }
        }
    }))
    .unwrap();
    let resolver = EntityResolver::new(StaticLocale::new("en-US"));
    c.bench_function("statement display", |b| b.iter(|| resolver.statement_display(black_box(&statement))));
}

criterion_group!(benches, bench_timestamps, bench_resolution);
criterion_main!(benches);
