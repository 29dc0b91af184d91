//! Background asset loading with completions on the render thread
//!
//! Each load runs on its own worker thread. Results come back over a channel
//! and their callbacks run inside [`AssetLoader::poll`], on whichever thread
//! owns the [`SceneContext`], so callbacks may mutate the scene freely. Each
//! callback runs at most once.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::{error::LoadError, gfx::context::SceneContext};

use super::{
    model::{load_obj, ModelData},
    texture::load_texture,
};
use crate::gfx::resources::texture::Texture;

/// Identifies one requested load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadId(u64);

enum Payload {
    Model(ModelData),
    Texture(Texture),
}

type Message = (LoadId, Result<Payload, LoadError>);
type Completion = Box<dyn FnOnce(&mut SceneContext, Result<Payload, LoadError>)>;

struct PendingLoad {
    label: String,
    complete: Completion,
}

/// Sends exactly one message per load, even if the worker panics
struct Delivery {
    id: LoadId,
    label: String,
    sender: Option<Sender<Message>>,
}

impl Delivery {
    fn send(mut self, result: Result<Payload, LoadError>) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send((self.id, result));
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let error = LoadError::Disconnected(self.label.clone());
            let _ = sender.send((self.id, Err(error)));
        }
    }
}

/// Default error callback: log and leave the scene untouched
pub fn log_load_error(_ctx: &mut SceneContext, error: LoadError) {
    log::error!("Asset load failed: {}", error);
}

pub struct AssetLoader {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    pending: HashMap<LoadId, PendingLoad>,
    next_id: u64,
}

impl AssetLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of loads whose callbacks have not run yet
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Loads an OBJ model, with an optional MTL file loaded first
    pub fn load_model<S>(&mut self, obj: impl Into<PathBuf>, mtl: Option<PathBuf>, on_success: S) -> LoadId
    where
        S: FnOnce(&mut SceneContext, ModelData) + 'static,
    {
        self.load_model_or_else(obj, mtl, on_success, log_load_error)
    }

    pub fn load_model_or_else<S, E>(
        &mut self,
        obj: impl Into<PathBuf>,
        mtl: Option<PathBuf>,
        on_success: S,
        on_error: E,
    ) -> LoadId
    where
        S: FnOnce(&mut SceneContext, ModelData) + 'static,
        E: FnOnce(&mut SceneContext, LoadError) + 'static,
    {
        let obj = obj.into();
        let label = obj.display().to_string();
        let kind_error = LoadError::WrongAsset(label.clone());
        self.spawn(
            label,
            move || load_obj(&obj, mtl.as_deref()).map(Payload::Model),
            Box::new(move |ctx: &mut SceneContext, result: Result<Payload, LoadError>| match result {
                Ok(Payload::Model(model)) => on_success(ctx, model),
                Ok(_) => on_error(ctx, kind_error),
                Err(e) => on_error(ctx, e),
            }),
        )
    }

    /// Loads an image as a texture
    pub fn load_texture<S>(&mut self, path: impl Into<PathBuf>, on_success: S) -> LoadId
    where
        S: FnOnce(&mut SceneContext, Texture) + 'static,
    {
        self.load_texture_or_else(path, on_success, log_load_error)
    }

    pub fn load_texture_or_else<S, E>(&mut self, path: impl Into<PathBuf>, on_success: S, on_error: E) -> LoadId
    where
        S: FnOnce(&mut SceneContext, Texture) + 'static,
        E: FnOnce(&mut SceneContext, LoadError) + 'static,
    {
        let path = path.into();
        let label = path.display().to_string();
        let kind_error = LoadError::WrongAsset(label.clone());
        self.spawn(
            label,
            move || load_texture(&path).map(Payload::Texture),
            Box::new(move |ctx: &mut SceneContext, result: Result<Payload, LoadError>| match result {
                Ok(Payload::Texture(texture)) => on_success(ctx, texture),
                Ok(_) => on_error(ctx, kind_error),
                Err(e) => on_error(ctx, e),
            }),
        )
    }

    fn spawn<J>(&mut self, label: String, job: J, complete: Completion) -> LoadId
    where
        J: FnOnce() -> Result<Payload, LoadError> + Send + 'static,
    {
        let id = LoadId(self.next_id);
        self.next_id += 1;

        let delivery = Delivery {
            id,
            label: label.clone(),
            sender: Some(self.sender.clone()),
        };
        let spawned = thread::Builder::new()
            .name(format!("asset-loader-{}", id.0))
            .spawn(move || delivery.send(job()));
        if let Err(e) = spawned {
            // The closure, and with it the delivery, was dropped; a
            // Disconnected error is already queued
            log::error!("Could not start loader thread for {}: {}", label, e);
        }

        log::info!("Loading {}", label);
        self.pending.insert(id, PendingLoad { label, complete });
        id
    }

    /// Runs callbacks for every load that has finished; never blocks
    pub fn poll(&mut self, ctx: &mut SceneContext) -> usize {
        let mut delivered = 0;
        while let Ok(message) = self.receiver.try_recv() {
            delivered += self.deliver(ctx, message);
        }
        delivered
    }

    /// Blocks until every pending load has run its callback
    pub fn wait_all(&mut self, ctx: &mut SceneContext) -> usize {
        let mut delivered = 0;
        while !self.pending.is_empty() {
            match self.receiver.recv() {
                Ok(message) => delivered += self.deliver(ctx, message),
                Err(_) => break,
            }
        }
        delivered
    }

    fn deliver(&mut self, ctx: &mut SceneContext, (id, result): Message) -> usize {
        let Some(load) = self.pending.remove(&id) else {
            log::warn!("Dropping result for unknown load {:?}", id);
            return 0;
        };
        match &result {
            Ok(_) => log::debug!("Finished loading {}", load.label),
            Err(_) => log::debug!("Loading {} failed", load.label),
        }
        (load.complete)(ctx, result);
        1
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, fs, rc::Rc};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vantage-loader-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_model_callback_attaches_subtree() {
        let obj = temp_path("tri.obj");
        fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut ctx = SceneContext::default();
        let mut loader = AssetLoader::new();
        loader.load_model(obj.clone(), None, |ctx, model| {
            let root = ctx.scene.root();
            ctx.scene.attach_model(root, model);
        });
        assert_eq!(loader.pending(), 1);

        assert_eq!(loader.wait_all(&mut ctx), 1);
        assert_eq!(loader.pending(), 0);
        assert_eq!(ctx.scene.get_statistics().mesh_count, 1);

        // Nothing left to deliver
        assert_eq!(loader.poll(&mut ctx), 0);
        fs::remove_file(obj).ok();
    }

    #[test]
    fn test_failure_skips_success_callback() {
        let mut ctx = SceneContext::default();
        let mut loader = AssetLoader::new();
        let succeeded = Rc::new(Cell::new(false));
        let failed = Rc::new(Cell::new(false));

        let s = succeeded.clone();
        let f = failed.clone();
        loader.load_texture_or_else(
            temp_path("missing.png"),
            move |_, _| s.set(true),
            move |_, _| f.set(true),
        );
        loader.wait_all(&mut ctx);

        assert!(!succeeded.get());
        assert!(failed.get());
        assert!(ctx.scene.background.is_none());
    }

    #[test]
    fn test_poll_does_not_block() {
        let mut ctx = SceneContext::default();
        let mut loader = AssetLoader::new();
        assert_eq!(loader.poll(&mut ctx), 0);
        assert_eq!(loader.wait_all(&mut ctx), 0);
    }
}
