//! Background save writer.
//!
//! The simulation copies its state into a [`SaveDocument`] and hands it to a
//! dedicated thread over a channel, so the frame never waits on disk I/O.
//! Snapshots that queue up while a write is in flight are coalesced: only
//! the newest one is written.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use bevy::log::{debug, error, warn};
use crossbeam_channel::{unbounded, Receiver, Sender};

use super::document::{save_document, SaveDocument};

pub struct SnapshotWriter {
    path: PathBuf,
    sender: Option<Sender<SaveDocument>>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Start the writer thread. If the thread cannot be spawned the writer
    /// still works, writing synchronously on the caller's thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = unbounded::<SaveDocument>();
        let thread_path = path.clone();

        match thread::Builder::new()
            .name("save-writer".into())
            .spawn(move || run_writer(&thread_path, receiver))
        {
            Ok(handle) => Self {
                path,
                sender: Some(sender),
                handle: Some(handle),
            },
            Err(err) => {
                warn!("Save writer thread failed to start ({}); saving synchronously", err);
                Self {
                    path,
                    sender: None,
                    handle: None,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue a snapshot for writing.
    pub fn submit(&self, document: SaveDocument) {
        let Some(sender) = &self.sender else {
            write_snapshot(&self.path, &document);
            return;
        };
        if let Err(err) = sender.send(document) {
            // The writer thread is gone; don't lose the snapshot
            write_snapshot(&self.path, &err.into_inner());
        }
    }

    /// Queue `last`, close the channel and wait until everything queued has
    /// reached the disk. Later submissions are written synchronously.
    pub fn finish(&mut self, last: Option<SaveDocument>) {
        if let Some(document) = last {
            self.submit(document);
        }
        self.sender = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Save writer thread panicked");
            }
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        self.finish(None);
    }
}

fn run_writer(path: &Path, receiver: Receiver<SaveDocument>) {
    while let Ok(mut document) = receiver.recv() {
        let mut skipped = 0;
        while let Ok(newer) = receiver.try_recv() {
            document = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!("Coalesced {} queued snapshots", skipped);
        }
        write_snapshot(path, &document);
    }
}

fn write_snapshot(path: &Path, document: &SaveDocument) {
    match save_document(path, document) {
        Ok(()) => debug!("Autosave written to {}", path.display()),
        Err(err) => warn!("Autosave failed: {}", err),
    }
}
