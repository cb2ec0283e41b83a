use std::io::{self, Cursor};
use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use screen_router::logging::{LogEvent, LogSink};
use screen_router::{
    DeepLinkDriver, DetailDependency, HierarchySnapshot, Logger, LoggingResult,
    NavigationOperation, RouterConfig, ScreenIdentifier, Section, bootstrap,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

fn observed_config() -> RouterConfig {
    let mut config = RouterConfig::default().with_logger(Logger::new(NullSink));
    config.enable_metrics();
    config
}

fn dispatch_push_pop(c: &mut Criterion) {
    let app = bootstrap(observed_config());
    let identifier = ScreenIdentifier::detail(DetailDependency::new(1, "Bench"));
    c.bench_function("dispatch_push_pop", |b| {
        b.iter(|| {
            app.router.route(
                Some(black_box(&identifier)),
                None,
                NavigationOperation::push(),
            );
            app.router.route(None, None, NavigationOperation::pop());
        });
    });
}

fn section_round_trip(c: &mut Criterion) {
    let app = bootstrap(RouterConfig::default());
    c.bench_function("section_round_trip", |b| {
        b.iter(|| {
            for section in Section::ALL {
                app.router.open_section(black_box(section));
            }
        });
    });
}

fn bootstrap_app(c: &mut Criterion) {
    c.bench_function("bootstrap_app", |b| {
        b.iter(|| black_box(bootstrap(RouterConfig::default())));
    });
}

fn deep_link_script(c: &mut Criterion) {
    let app = bootstrap(observed_config());
    let driver = DeepLinkDriver::new(Rc::clone(&app.router));
    let script = concat!(
        "{\"screen\":\"settings\",\"navigation\":\"push\"}\n",
        "{\"screen\":\"settingsdetail\",\"navigation\":\"push\"}\n",
        "{\"navigation\":\"pop_to_root\"}\n",
        "{\"section\":1}\n",
        "{\"section\":0}\n",
    );
    c.bench_function("deep_link_script", |b| {
        b.iter(|| {
            let mut sink = io::sink();
            driver
                .serve_lines(Cursor::new(black_box(script)), &mut sink)
                .expect("scripted session");
        });
    });
}

fn snapshot_fingerprint(c: &mut Criterion) {
    let app = bootstrap(RouterConfig::default());
    c.bench_function("snapshot_fingerprint", |b| {
        b.iter(|| HierarchySnapshot::capture(black_box(app.router.sections())).fingerprint());
    });
}

criterion_group!(
    benches,
    dispatch_push_pop,
    section_round_trip,
    bootstrap_app,
    deep_link_script,
    snapshot_fingerprint
);
criterion_main!(benches);
