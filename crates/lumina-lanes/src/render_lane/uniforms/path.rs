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

//! Tokenizer for reflected uniform names.
//!
//! Reflected names follow a small grammar: identifiers joined by `.` for
//! struct members and `[n]` for array elements, e.g. `pointLights[2].color`.
//! A trailing `[0]` that ends the name denotes a whole bottom-level array set
//! with a single call, e.g. `boneMatrices[0]`.

use std::fmt;
use thiserror::Error;

/// A key of a node in the uniform tree: a member name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniformKey {
    /// A named member.
    Name(String),
    /// An array element.
    Index(usize),
}

impl fmt::Display for UniformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformKey::Name(name) => write!(f, "{name}"),
            UniformKey::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A reflected name split into tree keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformPath {
    /// Keys from the root to the leaf. Never empty.
    pub segments: Vec<UniformKey>,
    /// `true` when the name ended with a trailing `[0]`.
    pub pure_array: bool,
}

/// A reflected name that does not follow the uniform name grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniformPathError {
    /// An identifier was expected but none was found.
    #[error("expected an identifier at byte {position} of `{name}`")]
    ExpectedIdentifier {
        /// The full name.
        name: String,
        /// Byte position of the failure.
        position: usize,
    },
    /// A character outside the grammar was found.
    #[error("unexpected `{found}` at byte {position} of `{name}`")]
    UnexpectedCharacter {
        /// The full name.
        name: String,
        /// Byte position of the failure.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// A subscript that is not a decimal index.
    #[error("invalid array index `{index}` in `{name}`")]
    InvalidIndex {
        /// The full name.
        name: String,
        /// The subscript text.
        index: String,
    },
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits a reflected uniform name into tree keys.
pub fn parse_uniform_path(name: &str) -> Result<UniformPath, UniformPathError> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut in_subscript = false;

    loop {
        let start = pos;
        while pos < bytes.len() && is_identifier_byte(bytes[pos]) {
            pos += 1;
        }
        if start == pos {
            return Err(UniformPathError::ExpectedIdentifier {
                name: name.to_string(),
                position: pos,
            });
        }
        let ident = &name[start..pos];

        let key = if in_subscript {
            if bytes.get(pos) != Some(&b']') {
                return Err(unexpected(name, pos));
            }
            pos += 1;
            let index = ident
                .parse::<usize>()
                .map_err(|_| UniformPathError::InvalidIndex {
                    name: name.to_string(),
                    index: ident.to_string(),
                })?;
            UniformKey::Index(index)
        } else {
            UniformKey::Name(ident.to_string())
        };

        match bytes.get(pos) {
            None => {
                segments.push(key);
                return Ok(UniformPath {
                    segments,
                    pure_array: false,
                });
            }
            Some(b'[') => {
                pos += 1;
                if &name[pos..] == "0]" {
                    segments.push(key);
                    return Ok(UniformPath {
                        segments,
                        pure_array: true,
                    });
                }
                in_subscript = true;
            }
            Some(b'.') => {
                pos += 1;
                in_subscript = false;
            }
            Some(_) => return Err(unexpected(name, pos)),
        }
        segments.push(key);
    }
}

fn unexpected(name: &str, pos: usize) -> UniformPathError {
    match name[pos..].chars().next() {
        Some(found) => UniformPathError::UnexpectedCharacter {
            name: name.to_string(),
            position: pos,
            found,
        },
        None => UniformPathError::ExpectedIdentifier {
            name: name.to_string(),
            position: pos,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> UniformKey {
        UniformKey::Name(s.to_string())
    }

    #[test]
    fn plain_identifier() {
        let path = parse_uniform_path("opacity").unwrap();
        assert_eq!(path.segments, vec![name("opacity")]);
        assert!(!path.pure_array);
    }

    #[test]
    fn trailing_zero_index_is_a_pure_array() {
        let path = parse_uniform_path("boneMatrices[0]").unwrap();
        assert_eq!(path.segments, vec![name("boneMatrices")]);
        assert!(path.pure_array);
    }

    #[test]
    fn struct_array_member() {
        let path = parse_uniform_path("lights.point[2].position").unwrap();
        assert_eq!(
            path.segments,
            vec![
                name("lights"),
                name("point"),
                UniformKey::Index(2),
                name("position")
            ]
        );
        assert!(!path.pure_array);
    }

    #[test]
    fn first_element_of_struct_array_is_not_pure() {
        let path = parse_uniform_path("spotLights[0].color").unwrap();
        assert_eq!(
            path.segments,
            vec![name("spotLights"), UniformKey::Index(0), name("color")]
        );
        assert!(!path.pure_array);
    }

    #[test]
    fn nested_pure_array_inside_struct_array() {
        let path = parse_uniform_path("probes[3].sh[0]").unwrap();
        assert_eq!(
            path.segments,
            vec![name("probes"), UniformKey::Index(3), name("sh")]
        );
        assert!(path.pure_array);
    }

    #[test]
    fn trailing_nonzero_index_is_an_element() {
        let path = parse_uniform_path("weights[4]").unwrap();
        assert_eq!(path.segments, vec![name("weights"), UniformKey::Index(4)]);
        assert!(!path.pure_array);
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert!(matches!(
            parse_uniform_path("a..b"),
            Err(UniformPathError::ExpectedIdentifier { position: 2, .. })
        ));
        assert!(matches!(
            parse_uniform_path("a-b"),
            Err(UniformPathError::UnexpectedCharacter { found: '-', .. })
        ));
        assert!(matches!(
            parse_uniform_path("a[x]"),
            Err(UniformPathError::InvalidIndex { .. })
        ));
        assert!(parse_uniform_path("").is_err());
        assert!(parse_uniform_path("a[1").is_err());
    }
}
