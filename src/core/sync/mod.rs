/*!
 * Synchronization Primitives
 *
 * Shared signalling used by long-running thread pools:
 * - `StopSignal`: one-shot cancellation checked at iteration boundaries,
 *   doubling as an interruptible sleep
 */

mod stop;

pub use stop::StopSignal;
