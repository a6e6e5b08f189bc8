//! Loader thread.
//!
//! Decoding can take seconds for large EXR or TIFF files, so it runs here,
//! off the UI thread. The viewport itself is only touched on the UI thread
//! when a [`LoaderEvent::Loaded`] arrives.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, warn};

use crate::messages::{Generation, LoaderEvent, LoaderMsg};

/// Loader thread handler.
pub struct LoaderHandler {
    rx: Receiver<LoaderMsg>,
    tx: Sender<LoaderEvent>,
    generation: Generation,
}

impl LoaderHandler {
    /// Creates a new handler.
    pub fn new(rx: Receiver<LoaderMsg>, tx: Sender<LoaderEvent>) -> Self {
        Self { rx, tx, generation: 0 }
    }

    /// Main event loop. Returns when [`LoaderMsg::Close`] arrives or the UI
    /// side hangs up.
    pub fn run(mut self) {
        while let Ok(msg) = self.rx.recv() {
            match msg {
                LoaderMsg::Close => break,
                LoaderMsg::SyncGeneration(g) => self.generation = g,
                LoaderMsg::Load(path) => self.load(path),
            }
        }
        debug!("loader shutdown");
    }

    fn send(&self, event: LoaderEvent) {
        // the UI may already be gone during shutdown
        let _ = self.tx.send(event);
    }

    fn load(&mut self, path: PathBuf) {
        debug!(path = %path.display(), generation = self.generation, "loading image");
        let generation = self.generation;
        match pixview_io::decode(&path) {
            Ok(image) => self.send(LoaderEvent::Loaded {
                generation,
                path,
                image,
            }),
            Err(e) => {
                warn!(path = %path.display(), "load failed: {e}");
                self.send(LoaderEvent::Failed {
                    generation,
                    path,
                    error: e.to_string(),
                });
            }
        }
    }
}
