// Console logging mirrored into a file so unattended runs leave a record
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const LOG_FILE: &str = "anyi_automation.log";

/// Writer that copies every record to two sinks
pub struct TeeWriter<A: Write, B: Write> {
    console: A,
    file: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(console: A, file: B) -> Self {
        Self { console, file }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.console, self.file)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Both sinks are attempted even if the first one fails
        let console = self.console.write_all(buf);
        let file = self.file.write_all(buf);
        console.and(file)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let console = self.console.flush();
        let file = self.file.flush();
        console.and(file)
    }
}

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global logger: stderr always, plus `log_file` when it can be opened
pub fn init(debug_mode: bool, log_file: &Path) {
    let default_filter = if debug_mode {
        "info,anyi_automation=debug"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.format_timestamp_millis();

    let file_error = match open_log_file(log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter::new(
                io::stderr(),
                file,
            ))));
            None
        }
        Err(e) => Some(e),
    };
    builder.init();

    match file_error {
        None => log::debug!("📝 Logging to {}", log_file.display()),
        Some(e) => log::warn!(
            "⚠️ Cannot write log file {}: {} (console only)",
            log_file.display(),
            e
        ),
    }
}
