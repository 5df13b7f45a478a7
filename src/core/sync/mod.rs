/*!
 * Synchronization Primitives
 *
 * Short-critical-section locking for the event path. Holders never sleep,
 * so contended waiters spin instead of parking.
 */

mod spinlock;

pub use spinlock::{SpinLock, SpinLockGuard};
