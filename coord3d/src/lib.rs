#[cfg(feature = "core")]
#[doc(inline)]
pub use coord3d_core as core;

#[cfg(feature = "store")]
#[doc(inline)]
pub use coord3d_store as store;
