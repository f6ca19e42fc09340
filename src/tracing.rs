use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

/// Log sink shared by every writer the subscriber hands out: always stderr,
/// plus an optional file.
///
/// A process can install the global subscriber only once, but `init` may run
/// more than once (the daemon at startup, then tests or embedders with their
/// own log file). The file therefore sits behind a lock so a later `init`
/// retargets it instead of trying to install a second subscriber.
#[derive(Clone, Default)]
struct SharedWriter {
    file: Arc<RwLock<Option<File>>>,
}

struct TeeWriter {
    file: Arc<RwLock<Option<File>>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TeeWriter {
            file: self.file.clone(),
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = io::stderr().write(buf)?;
        if let Ok(mut guard) = self.file.write() {
            if let Some(file) = guard.as_mut() {
                let _ = file.write_all(buf);
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Ok(mut guard) = self.file.write() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
        Ok(())
    }
}

static WRITER: OnceLock<SharedWriter> = OnceLock::new();

/// Installs the global subscriber (idempotent) and points the file sink at
/// `log_file`. `log` records are forwarded into `tracing`.
pub fn init(log_file: Option<&Path>) {
    let writer = WRITER.get_or_init(|| {
        let _ = tracing_log::LogTracer::init();

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let writer = SharedWriter::default();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer.clone())
            .try_init();
        writer
    });

    if let Err(e) = set_log_file(writer, log_file) {
        log::warn!("Could not open log file: {}", e);
    }
}

fn set_log_file(writer: &SharedWriter, log_file: Option<&Path>) -> io::Result<()> {
    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    let mut guard = writer
        .file
        .write()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
    *guard = file;
    Ok(())
}
