//! # cvar-core
//!
//! Hierarchical **console variables**: named values addressed by dotted paths
//! (`graphics.window.width`), each holding an integer, float, boolean, string,
//! or a nested list/object of the same kinds. The store persists to and from
//! a small JSON dialect.
//!
//! ## Quick start
//!
//! ```rust
//! use cvar_core::{unserialize, to_string, CVarStore};
//!
//! let root = unserialize(r#"{"a":1,"b":[1,2,3]}"#).unwrap();
//! assert_eq!(to_string(&root, false), r#"{"a":1,"b":[1,2,3]}"#);
//!
//! let mut store = CVarStore::new();
//! assert!(store.set("graphics.window.width", 1280));
//! assert_eq!(store.get_int("graphics.window.width"), Some(1280));
//! assert_eq!(store.to_string(false), r#"{"graphics":{"window":{"width":1280}}}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value`, `List`, `Object` and the hashed `CVarString` key
//! - [`source`]: buffered byte source with explicit pushback
//! - [`lexer`]: text → tokens
//! - [`parser`]: tokens → value tree, using an explicit frame stack
//! - [`serializer`]: value tree → compact or beautified text
//! - [`store`]: `CVarStore`, dotted-key get/set plus load/save
//! - [`hash`]: stable key hashing
//! - [`error`]: `CVarError`

pub mod error;
pub mod hash;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod source;
pub mod store;
pub mod value;

pub use error::{CVarError, Result};
pub use parser::{unserialize, unserialize_reader};
pub use serializer::{serialize, to_string};
pub use store::CVarStore;
pub use value::{CVarString, List, Object, Value, ValueKind};
