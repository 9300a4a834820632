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

//! Acts as the **[A]gent** for light collection and packing.
//!
//! A renderer asks the [`RenderStates`] directory for the state of the
//! (scene, camera) pair it is about to draw, refills its light lists and packs
//! them. The resulting [`LightState`](lumina_lanes::render_lane::LightState)
//! is then pushed into programs by the uniform lanes.

mod render_states;

pub use render_states::*;
