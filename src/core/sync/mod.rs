/*!
 * Synchronization Primitives
 *
 * The exclusion gate serializing every mailbox registry and queue access.
 */

mod gate;

pub use gate::{ExclusionGate, GateGuard, GateStats};
