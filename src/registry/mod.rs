/*!
 * Registry Module
 * Coarse-locked registry of in-flight items, kept ordered by tag
 */

mod chain;
pub mod ordered;

// Re-export public API
pub use ordered::OrderedRegistry;
