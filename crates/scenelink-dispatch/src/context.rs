//! What a handler can touch.

use scenelink_core::Outbound;
use scenelink_host::{AssetRegistry, HostContext};
use scenelink_reflect::PropertyBridge;
use scenelink_settings::HandlerSettings;

/// Host-thread state handed to every handler.
///
/// Only ever built on the host thread, so handlers read and mutate the
/// scene without locking.
pub struct HandlerContext<'a> {
    /// Live scene, assets and project.
    pub host: &'a mut HostContext,
    /// Send seam for events and late responses.
    pub out: &'a dyn Outbound,
    /// Handler limits and defaults.
    pub settings: &'a HandlerSettings,
}

impl<'a> HandlerContext<'a> {
    /// Bundle handler dependencies.
    pub fn new(host: &'a mut HostContext, out: &'a dyn Outbound, settings: &'a HandlerSettings) -> Self {
        Self { host, out, settings }
    }
}

/// Property bridge over `assets` honoring the configured suggestion limit.
///
/// Takes the asset registry rather than the whole context so callers can
/// borrow the scene mutably alongside it.
pub fn property_bridge<'b>(assets: &'b AssetRegistry, settings: &HandlerSettings) -> PropertyBridge<'b> {
    PropertyBridge::new(assets).with_suggestion_limit(settings.suggestion_limit)
}
