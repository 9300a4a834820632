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

use ahash::AHashMap;
use lumina_core::renderer::Light;
use lumina_core::{CameraId, CameraView, EventBus, SceneDisposalHook, SceneEvent, SceneId};
use lumina_lanes::render_lane::{LightPacker, LightPackerConfig, LightState, LightStateVersions};

/// The light lists and packer of one (scene, camera) pair.
#[derive(Debug)]
pub struct RenderState {
    lights: Vec<Light>,
    shadows: Vec<Light>,
    packer: LightPacker,
}

impl RenderState {
    /// Creates an empty state whose packer draws versions from `versions`.
    pub fn new(config: LightPackerConfig, versions: LightStateVersions) -> Self {
        Self {
            lights: Vec::new(),
            shadows: Vec::new(),
            packer: LightPacker::new(config, versions),
        }
    }

    /// Empties both lists. Called at the start of every frame before collection.
    pub fn init(&mut self) {
        self.lights.clear();
        self.shadows.clear();
    }

    /// Adds a light collected for this frame.
    pub fn push_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Adds a shadow caster collected for this frame.
    pub fn push_shadow(&mut self, light: Light) {
        self.shadows.push(light);
    }

    /// Packs the collected lights for `camera`.
    ///
    /// The light list is reordered in place and its `light_in_use` and
    /// `shadow_in_use` flags are refreshed.
    pub fn setup_lights(&mut self, camera: &CameraView) -> &LightState {
        self.packer.setup(&mut self.lights, &self.shadows, camera)
    }

    /// The lights collected this frame, in packing order after `setup_lights`.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The shadow casters collected this frame.
    pub fn shadows(&self) -> &[Light] {
        &self.shadows
    }

    /// The state produced by the last `setup_lights`.
    pub fn light_state(&self) -> &LightState {
        self.packer.state()
    }
}

/// Directory of render states keyed by scene, then camera.
///
/// Entries are keyed by identity only, so indexing a scene never keeps it
/// alive. A scene releases its entries by firing the hook obtained from
/// [`disposal_hook`](Self::disposal_hook); the notification is processed on
/// the next [`get`](Self::get) or [`process_scene_events`](Self::process_scene_events).
#[derive(Debug)]
pub struct RenderStates {
    states: AHashMap<SceneId, AHashMap<CameraId, RenderState>>,
    events: EventBus<SceneEvent>,
    config: LightPackerConfig,
    versions: LightStateVersions,
}

impl RenderStates {
    /// Creates an empty directory. Every state it creates is packed with `config`.
    pub fn new(config: LightPackerConfig) -> Self {
        Self {
            states: AHashMap::new(),
            events: EventBus::new(),
            config,
            versions: LightStateVersions::new(),
        }
    }

    /// Returns the state of `(scene, camera)`, creating it on first use.
    pub fn get(&mut self, scene: SceneId, camera: CameraId) -> &mut RenderState {
        self.process_scene_events();
        self.states
            .entry(scene)
            .or_default()
            .entry(camera)
            .or_insert_with(|| {
                log::debug!("Creating render state for scene {scene:?}, camera {camera:?}.");
                RenderState::new(self.config.clone(), self.versions.clone())
            })
    }

    /// A fire-once hook releasing every state of `scene` when fired.
    pub fn disposal_hook(&self, scene: SceneId) -> SceneDisposalHook {
        SceneDisposalHook::new(scene, self.events.sender())
    }

    /// The sending end of the scene event channel.
    pub fn scene_events(&self) -> flume::Sender<SceneEvent> {
        self.events.sender()
    }

    /// Applies every pending scene notification. Returns the number of scenes released.
    pub fn process_scene_events(&mut self) -> usize {
        let mut released = 0;
        for event in self.events.drain() {
            match event {
                SceneEvent::Disposed(scene) => {
                    if let Some(cameras) = self.states.remove(&scene) {
                        log::debug!(
                            "Released {} render state(s) of disposed scene {scene:?}.",
                            cameras.len()
                        );
                        released += 1;
                    }
                }
            }
        }
        released
    }

    /// Drops every state and every pending notification.
    pub fn dispose(&mut self) {
        let discarded = self.events.drain().len();
        log::debug!(
            "Disposing {} render state(s), {discarded} pending scene event(s).",
            self.len()
        );
        self.states.clear();
    }

    /// Returns `true` if `(scene, camera)` has a state.
    pub fn contains(&self, scene: SceneId, camera: CameraId) -> bool {
        self.states
            .get(&scene)
            .is_some_and(|cameras| cameras.contains_key(&camera))
    }

    /// Number of scenes with at least one state.
    pub fn scene_count(&self) -> usize {
        self.states.len()
    }

    /// Total number of render states.
    pub fn len(&self) -> usize {
        self.states.values().map(|cameras| cameras.len()).sum()
    }

    /// Returns `true` if there is no render state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for RenderStates {
    fn default() -> Self {
        Self::new(LightPackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lumina_lanes::render_lane::StaticLightConfig;

    #[test]
    fn get_returns_the_same_state_for_a_pair() {
        let mut states = RenderStates::default();
        let scene = SceneId::new();
        let camera = CameraId::new();

        states.get(scene, camera).push_light(Light::point(Vec3::ONE, 1.0));
        assert_eq!(states.get(scene, camera).lights().len(), 1);
        assert_eq!(states.len(), 1);

        states.get(scene, CameraId::new());
        assert_eq!(states.len(), 2);
        assert_eq!(states.scene_count(), 1);
    }

    #[test]
    fn init_clears_both_lists() {
        let mut state = RenderState::new(LightPackerConfig::new(), LightStateVersions::new());
        state.push_light(Light::ambient(Vec3::ONE, 1.0));
        state.push_shadow(Light::point(Vec3::ONE, 1.0));

        state.init();

        assert!(state.lights().is_empty());
        assert!(state.shadows().is_empty());
    }

    #[test]
    fn setup_lights_packs_collected_lights() {
        let config = LightPackerConfig::new().with_static(StaticLightConfig {
            point: 2,
            ..Default::default()
        });
        let mut state = RenderState::new(config, LightStateVersions::new());
        state.push_light(Light::point(Vec3::ONE, 2.0));
        state.push_light(Light::ambient(Vec3::ONE, 0.5));

        let packed = state.setup_lights(&CameraView::default());

        assert_eq!(packed.point.len(), 2);
        assert_eq!(packed.ambient, [0.5; 3]);
        assert!(state.lights().iter().all(|l| l.light_in_use));
        assert_eq!(state.light_state().version, 1);
    }

    #[test]
    fn fired_hook_releases_only_its_scene() {
        let mut states = RenderStates::default();
        let (a, b) = (SceneId::new(), SceneId::new());
        let camera = CameraId::new();
        states.get(a, camera);
        states.get(b, camera);

        states.disposal_hook(a).fire();
        assert!(states.contains(a, camera));
        assert_eq!(states.process_scene_events(), 1);

        assert!(!states.contains(a, camera));
        assert!(states.contains(b, camera));
    }

    #[test]
    fn get_applies_pending_disposals_first() {
        let mut states = RenderStates::default();
        let scene = SceneId::new();
        let camera = CameraId::new();
        states.get(scene, camera).push_light(Light::ambient(Vec3::ONE, 1.0));

        states
            .scene_events()
            .send(SceneEvent::Disposed(scene))
            .unwrap();

        assert!(states.get(scene, camera).lights().is_empty());
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn disposing_an_unknown_scene_is_harmless() {
        let mut states = RenderStates::default();
        states.disposal_hook(SceneId::new()).fire();
        assert_eq!(states.process_scene_events(), 0);
        assert!(states.is_empty());
    }

    #[test]
    fn dispose_drops_everything() {
        let mut states = RenderStates::default();
        let scene = SceneId::new();
        states.get(scene, CameraId::new());
        states.get(SceneId::new(), CameraId::new());
        states.disposal_hook(scene).fire();

        states.dispose();

        assert!(states.is_empty());
        assert_eq!(states.process_scene_events(), 0);
    }
}
