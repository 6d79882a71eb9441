//! Integration test for the `tracing` output of a locator.
//!
//! Kept in its own test binary: it installs a scoped subscriber and inspects
//! everything written through it.

use service_locator::{Locator, LocatorApi};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_locator_logs_lifecycle() {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let locator = Locator::new();
        locator.set("db", || String::from("postgres://localhost"));
        let _ = locator.get::<String>("db");
        let _ = locator.get::<String>("db");
        let _ = locator.get::<u16>("db");
        let _ = locator.get_any("absent");
        locator.try_set("broken", || Err::<u8, _>("connection refused"));
        let _ = locator.get_any("broken");
    });

    let logs = writer.contents();

    assert!(logs.contains("registered factory"), "{}", logs);
    assert!(logs.contains("constructed instance"), "{}", logs);
    assert!(logs.contains("cache hit"), "{}", logs);
    assert!(logs.contains("instance type mismatch"), "{}", logs);
    assert!(logs.contains("no factory registered"), "{}", logs);
    assert!(logs.contains("factory failed"), "{}", logs);
    assert!(logs.contains("connection refused"), "{}", logs);
    assert!(logs.contains("WARN"), "{}", logs);
}
