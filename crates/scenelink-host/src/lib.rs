//! # scenelink-host
//!
//! A reference host for the bridge: the live object graph the bridge drives.
//!
//! - **Scene**: entities with reflected properties, a root component and
//!   sub-components, addressed by label or structural path
//! - **Values**: the closed set of property kinds and stored values
//! - **Catalog**: spawnable classes, spawn presets and the asset hierarchy
//! - **Assets**: an in-memory registry of loadable assets
//! - **Deferred**: the single-shot task queue that hops work onto the host thread

#![deny(unsafe_code)]

pub mod assets;
pub mod classes;
pub mod context;
pub mod deferred;
pub mod demo;
pub mod entity;
pub mod enums;
pub mod errors;
pub mod math;
pub mod project;
pub mod property;
pub mod scene;
pub mod value;

pub use assets::{Asset, AssetRegistry};
pub use context::HostContext;
pub use deferred::{DeferredQueue, Task, run_host_loop};
pub use entity::{Component, Entity, EntityId, Layer};
pub use enums::EnumDef;
pub use errors::HostError;
pub use math::{Color, LinearColor, Quat, Rotator, Transform, Vector};
pub use project::{Project, ProjectInfo};
pub use property::{Property, PropertyFlags, PropertySet};
pub use scene::{EntityRegistry, Scene, SpawnOptions};
pub use value::{PropertyKind, PropertyValue, StructKind};
