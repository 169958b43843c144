//! Session setup: choose the backend once, at startup.
//!
//! Replay is used when configured and the snapshot loads. A broken or
//! missing snapshot is reported once and the session falls back to the
//! live host; without a host it cannot start at all.

use colony_world::{Host, LiveWorld, ReplayWorld, WorldState};
use tracing::{info, warn};

use crate::config::ReplayConfig;
use crate::error::SessionError;

/// Pick the world for this session.
///
/// # Errors
///
/// Returns [`SessionError::Snapshot`] when replay was requested, the
/// snapshot is unusable and there is no host, and
/// [`SessionError::NoHost`] when live mode has no host.
pub fn select_world(
    replay: &ReplayConfig,
    host: Option<Box<dyn Host>>,
) -> Result<Box<dyn WorldState>, SessionError> {
    if replay.enabled {
        match ReplayWorld::from_path(&replay.snapshot_path) {
            Ok(world) => {
                info!(
                    path = %replay.snapshot_path.display(),
                    tick = world.time(),
                    objects = world.graph().len(),
                    "replaying snapshot"
                );
                return Ok(Box::new(world));
            }
            Err(source) => {
                let Some(host) = host else {
                    return Err(SessionError::Snapshot {
                        path: replay.snapshot_path.clone(),
                        source,
                    });
                };
                warn!(
                    path = %replay.snapshot_path.display(),
                    err = %source,
                    "snapshot unusable, falling back to live host"
                );
                return Ok(Box::new(LiveWorld::new(host)));
            }
        }
    }
    let host = host.ok_or(SessionError::NoHost)?;
    info!("running against live host");
    Ok(Box::new(LiveWorld::new(host)))
}
