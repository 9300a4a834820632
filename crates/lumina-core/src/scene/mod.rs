// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scene-side collaborators consumed by the render pipelines.
//!
//! Scene graph traversal and transform propagation live outside this crate.
//! What the pipelines need from a scene is small: a stable identity, the view
//! of the camera rendering it, its fog, and a one-shot notification when the
//! scene is disposed.

mod camera;
mod fog;

pub use self::camera::CameraView;
pub use self::fog::Fog;

use uuid::Uuid;

/// The identity of a scene.
///
/// Render state is keyed by identity, never by value. Holding a `SceneId`
/// does not keep the scene itself alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub Uuid);

impl SceneId {
    /// Creates a new, unique scene identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// The identity of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub Uuid);

impl CameraId {
    /// Creates a new, unique camera identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CameraId {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifications a scene emits over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The scene was disposed; every cache keyed by it must be released.
    Disposed(SceneId),
}

/// A fire-once disposal notification for a single scene.
///
/// The hook is consumed by [`fire`](SceneDisposalHook::fire), so a scene can
/// signal its disposal at most once through it.
#[derive(Debug)]
pub struct SceneDisposalHook {
    scene: SceneId,
    sender: flume::Sender<SceneEvent>,
}

impl SceneDisposalHook {
    /// Creates a hook that reports the disposal of `scene` on `sender`.
    pub fn new(scene: SceneId, sender: flume::Sender<SceneEvent>) -> Self {
        Self { scene, sender }
    }

    /// The scene this hook belongs to.
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Publishes the disposal notification.
    pub fn fire(self) {
        if self.sender.send(SceneEvent::Disposed(self.scene)).is_err() {
            log::debug!(
                "Scene {:?} disposed after its listener was dropped.",
                self.scene
            );
        }
    }
}
