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

//! The per-leaf cache of the last value written to the device.

/// Bit patterns of the last value a leaf uploaded.
///
/// Values are compared bit for bit, so `-0.0` and `0.0` differ and a `NaN`
/// equals itself. An empty cache never matches a non-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCache {
    bits: Vec<u32>,
}

impl ValueCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `data` matches the cached value bit for bit.
    pub fn matches<T: bytemuck::Pod>(&self, data: &[T]) -> bool {
        let bits: &[u32] = bytemuck::cast_slice(data);
        self.bits == bits
    }

    /// Stores `data`, resizing the cache to its length.
    pub fn store<T: bytemuck::Pod>(&mut self, data: &[T]) {
        let bits: &[u32] = bytemuck::cast_slice(data);
        self.bits.clear();
        self.bits.extend_from_slice(bits);
    }

    /// Number of 32-bit words held.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Forgets the cached value so the next write always reaches the device.
    pub fn invalidate(&mut self) {
        self.bits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_matches_nothing() {
        let cache = ValueCache::new();
        assert!(!cache.matches(&[0.0f32]));
        assert!(cache.matches::<f32>(&[]));
    }

    #[test]
    fn store_then_match() {
        let mut cache = ValueCache::new();
        cache.store(&[1.0f32, 2.0, 3.0]);
        assert!(cache.matches(&[1.0f32, 2.0, 3.0]));
        assert!(!cache.matches(&[1.0f32, 2.0]));
        assert!(!cache.matches(&[1.0f32, 2.0, 3.5]));
    }

    #[test]
    fn comparison_is_bitwise() {
        let mut cache = ValueCache::new();
        cache.store(&[0.0f32]);
        assert!(!cache.matches(&[-0.0f32]));
        cache.store(&[f32::NAN]);
        assert!(cache.matches(&[f32::NAN]));
    }

    #[test]
    fn resizes_to_incoming_length() {
        let mut cache = ValueCache::new();
        cache.store(&[1i32, 2, 3, 4]);
        assert_eq!(cache.len(), 4);
        cache.store(&[5i32]);
        assert_eq!(cache.len(), 1);
        cache.invalidate();
        assert!(cache.is_empty());
    }
}
