// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material export core for the babylon.js exporter.
//!
//! Turns the principled shading node of each material into a flat
//! [`MaterialRecord`]:
//! - Per-channel constants, or the texture slot that feeds the channel
//! - Texture slots found on the node
//! - Which channels need a bake pass
//!
//! ## Architecture
//!
//! - [`resolver`] walks the sockets of one node through the alias tables in
//!   [`aliases`], tolerating socket renames between authoring tool versions
//! - [`guard`] severs and restores the links into each material output so
//!   the tool can bake without the shader tree interfering
//! - [`session`] scopes one export run so links are restored even when the
//!   run fails or panics

pub mod aliases;
pub mod channel;
pub mod texture;
pub mod record;
pub mod resolver;
pub mod guard;
pub mod session;
pub mod settings;

pub use channel::{Channel, ChannelValue, ResolvedChannel};
pub use texture::TextureKind;
pub use record::{BakeFlags, MaterialRecord};
pub use resolver::{resolve, ChannelResolver};
pub use guard::{ConnectionGuard, ConnectionRecord, GuardError, ReconnectSummary};
pub use session::{
    export_materials, with_severed_outputs, ExportScope, ExportSummary, ExportedMaterial,
    MaterialExport,
};
pub use settings::{ExportSettings, OutputExtension, SettingsError};
