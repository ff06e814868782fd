//! Local-first sketch gallery: an in-memory collection of image posts with
//! tagging, likes and guest comments, written through to a single durable
//! slot after every change.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;

pub use application::query::{SortKey, compare_titles, distinct_tags, filter_and_sort};
pub use application::sketch_repository::SketchRepository;
pub use data::file_store::FileSketchStore;
#[cfg(target_arch = "wasm32")]
pub use data::local_storage::LocalStorageSketchStore;
pub use data::sketch_store::{MemorySketchStore, STORAGE_KEY, SketchStore};
pub use domain::draft::{
    Field, FieldError, SketchDraft, ValidDraft, ValidationErrors, ValidationReason, parse_tags,
};
pub use domain::error::{DomainError, StoreError};
pub use domain::sketch::{Comment, GUEST_USER, ImagePayload, Sketch, SketchId};
