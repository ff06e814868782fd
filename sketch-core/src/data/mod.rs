pub mod file_store;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod sketch_store;
