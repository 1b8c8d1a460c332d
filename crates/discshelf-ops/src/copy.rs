//! Streamed file copy with progress reporting.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use discshelf_core::{MoveConfig, TransferError, TransferProgress};

use crate::progress::ProgressTracker;

/// Copy `source` to `destination` in `config.chunk_size` pieces.
///
/// The destination is created or truncated. On failure it is left as written
/// so far; the source is never touched. Returns the number of bytes copied.
pub fn copy_with_progress(
    source: &Path,
    destination: &Path,
    config: &MoveConfig,
    on_progress: &mut dyn FnMut(&TransferProgress),
) -> Result<u64, TransferError> {
    let source_unavailable = |e: io::Error| TransferError::SourceUnavailable {
        path: source.to_path_buf(),
        source: e,
    };

    let mut reader = File::open(source).map_err(source_unavailable)?;
    let metadata = reader.metadata().map_err(source_unavailable)?;
    let total_bytes = metadata.len();

    let writer = File::create(destination).map_err(|e| TransferError::Copy {
        destination: destination.to_path_buf(),
        copied_bytes: 0,
        source: e,
    })?;
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        total_bytes,
        "streaming copy"
    );

    let copied = stream_into(
        &mut reader,
        writer,
        total_bytes,
        destination,
        config,
        on_progress,
    )?;

    if let Err(e) = fs::set_permissions(destination, metadata.permissions()) {
        warn!(destination = %destination.display(), error = %e, "could not copy permissions");
    }

    Ok(copied)
}

/// A copy target that can be forced to stable storage.
trait SyncWrite: Write {
    fn sync(&mut self) -> io::Result<()>;
}

impl SyncWrite for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Pump `reader` into `writer` chunk by chunk, reporting progress, then
/// flush and optionally sync. The closing event is sent only once the data
/// is durable.
fn stream_into<W: SyncWrite>(
    reader: &mut impl Read,
    mut writer: W,
    total_bytes: u64,
    destination: &Path,
    config: &MoveConfig,
    on_progress: &mut dyn FnMut(&TransferProgress),
) -> Result<u64, TransferError> {
    let mut tracker = ProgressTracker::new(total_bytes, config.progress_interval);
    let copy_failed = |copied_bytes: u64, e: io::Error| TransferError::Copy {
        destination: destination.to_path_buf(),
        copied_bytes,
        source: e,
    };

    let mut buffer = vec![0u8; config.chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(copy_failed(tracker.copied_bytes(), e)),
        };

        writer
            .write_all(&buffer[..read])
            .map_err(|e| copy_failed(tracker.copied_bytes(), e))?;
        tracker.record(read as u64);

        if let Some(progress) = tracker.poll() {
            on_progress(&progress);
        }
    }

    writer
        .flush()
        .map_err(|e| copy_failed(tracker.copied_bytes(), e))?;
    if config.sync_before_delete {
        writer
            .sync()
            .map_err(|e| copy_failed(tracker.copied_bytes(), e))?;
    }
    drop(writer);

    if let Some(progress) = tracker.finish() {
        on_progress(&progress);
    }

    Ok(tracker.copied_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn chatty_config(chunk_size: usize) -> MoveConfig {
        MoveConfig::builder()
            .chunk_size(chunk_size)
            .progress_interval(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[test]
    fn test_copy_reports_each_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        let mut events = Vec::new();
        let mut record = |p: &TransferProgress| events.push(p.copied_bytes);
        let copied = copy_with_progress(&src, &dst, &chatty_config(300), &mut record).unwrap();

        assert_eq!(copied, 1000);
        assert_eq!(events, vec![300, 600, 900, 1000]);
        assert_eq!(fs::read(&dst).unwrap(), data);
        assert!(src.exists());
    }

    #[test]
    fn test_empty_file_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("empty.bin");
        let dst = dir.path().join("copy.bin");
        fs::write(&src, b"").unwrap();

        let mut events = Vec::new();
        let mut record = |p: &TransferProgress| events.push(*p);
        copy_with_progress(&src, &dst, &MoveConfig::default(), &mut record).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].copied_bytes, 0);
        assert_eq!(events[0].percent, 100.0);
    }

    /// Writes through to a real file until `limit` bytes, then fails.
    struct FailAfter {
        inner: File,
        limit: usize,
        written: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= self.limit {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
            }
            let n = buf.len().min(self.limit - self.written);
            let n = self.inner.write(&buf[..n])?;
            self.written += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    impl SyncWrite for FailAfter {
        fn sync(&mut self) -> io::Result<()> {
            self.inner.sync_all()
        }
    }

    #[test]
    fn test_failure_mid_stream_keeps_partial_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 241) as u8).collect();
        fs::write(&src, &data).unwrap();

        let writer = FailAfter {
            inner: File::create(&dst).unwrap(),
            limit: 4096,
            written: 0,
        };
        let mut events = Vec::new();
        let mut record = |p: &TransferProgress| events.push(*p);
        let result = stream_into(
            &mut File::open(&src).unwrap(),
            writer,
            data.len() as u64,
            &dst,
            &chatty_config(1024),
            &mut record,
        );

        match result {
            Err(TransferError::Copy { copied_bytes, .. }) => assert_eq!(copied_bytes, 4096),
            other => panic!("expected a copy failure, got {other:?}"),
        }
        assert_eq!(fs::read(&dst).unwrap(), &data[..4096]);
        assert_eq!(fs::read(&src).unwrap(), data);
        assert!(events.iter().all(|p| !p.is_complete()));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_with_progress(
            &dir.path().join("missing"),
            &dir.path().join("dst"),
            &MoveConfig::default(),
            &mut |_: &TransferProgress| {},
        );
        assert!(matches!(result, Err(TransferError::SourceUnavailable { .. })));
        assert!(!dir.path().join("dst").exists());
    }
}
