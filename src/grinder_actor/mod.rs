//! Grinders: exclusive machines turning beans into grounds.

pub mod entity;

pub use entity::*;

use crate::config::GrinderSettings;
use crate::framework::{MachineActor, MachineHandle, ResourcePool};
use std::time::Duration;
use tracing::info;

pub type GrinderHandle = MachineHandle<Grinder>;
pub type GrinderPool = ResourcePool<GrinderHandle>;

/// Creates a grinder actor and its handle.
pub fn new(
    settings: &GrinderSettings,
    time_unit: Duration,
) -> (MachineActor<Grinder>, GrinderHandle) {
    MachineActor::new(Grinder::from(settings), time_unit)
}

/// Creates one actor per configured grinder, and the pool leasing their handles.
pub fn pool(
    settings: &[GrinderSettings],
    time_unit: Duration,
) -> (Vec<MachineActor<Grinder>>, GrinderPool) {
    let (actors, handles): (Vec<_>, Vec<_>) = settings.iter().map(|s| new(s, time_unit)).unzip();
    info!(grinders = handles.len(), "Grinder pool created");
    (actors, ResourcePool::new("grinder", handles))
}
