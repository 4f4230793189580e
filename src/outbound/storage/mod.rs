//! Filesystem storage adapters.

mod disk_image_store;

pub use disk_image_store::DiskImageStore;
