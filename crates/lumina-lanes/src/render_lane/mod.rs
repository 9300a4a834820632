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

//! Rendering lane - hot path for uniform binding and light packing

pub mod lights;
pub mod uniform_blocks;
pub mod uniforms;

pub use lights::*;
pub use uniform_blocks::*;
pub use uniforms::*;

#[cfg(test)]
pub(crate) mod test_device;
