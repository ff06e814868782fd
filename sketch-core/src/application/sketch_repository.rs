use tracing::{error, info, instrument};

use crate::application::query::{SortKey, distinct_tags, filter_and_sort};
use crate::data::sketch_store::SketchStore;
use crate::domain::draft::SketchDraft;
use crate::domain::error::DomainError;
use crate::domain::sketch::{Comment, Sketch, SketchId};

/// Owns the gallery for one session. Every mutation is written through to
/// the store before the call returns.
pub struct SketchRepository<S: SketchStore> {
    store: S,
    sketches: Vec<Sketch>,
}

impl<S> SketchRepository<S>
where
    S: SketchStore,
{
    pub fn open(store: S) -> Self {
        let sketches = store.load();
        info!(count = sketches.len(), "sketch gallery opened");
        Self { store, sketches }
    }

    pub fn sketches(&self) -> &[Sketch] {
        &self.sketches
    }

    pub fn len(&self) -> usize {
        self.sketches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }

    pub fn get(&self, id: &SketchId) -> Option<&Sketch> {
        self.sketches.iter().find(|sketch| &sketch.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[instrument(skip(self, draft))]
    pub fn create(&mut self, draft: &SketchDraft) -> Result<Sketch, DomainError> {
        let valid = draft.validate()?;
        let sketch = Sketch::new(self.fresh_id(), valid);

        self.sketches.insert(0, sketch.clone());
        self.persist()?;

        info!(sketch_id = %sketch.id, "sketch created");
        Ok(sketch)
    }

    #[instrument(skip(self, draft))]
    pub fn update(&mut self, id: &SketchId, draft: &SketchDraft) -> Result<Sketch, DomainError> {
        let index = self.position(id)?;
        let valid = draft.validate()?;
        let sketch = self.sketches[index].revised(valid);

        self.sketches[index] = sketch.clone();
        self.persist()?;

        info!(sketch_id = %id, "sketch updated");
        Ok(sketch)
    }

    /// Removes the sketch and hands it back. Asking the user to confirm is
    /// up to the caller.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &SketchId) -> Result<Sketch, DomainError> {
        let index = self.position(id)?;
        let removed = self.sketches.remove(index);
        self.persist()?;

        info!(sketch_id = %id, "sketch deleted");
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub fn like(&mut self, id: &SketchId) -> Result<u64, DomainError> {
        let index = self.position(id)?;
        let sketch = &mut self.sketches[index];
        sketch.likes = sketch.likes.saturating_add(1);
        let likes = sketch.likes;
        self.persist()?;

        info!(sketch_id = %id, likes, "sketch liked");
        Ok(likes)
    }

    #[instrument(skip(self, text))]
    pub fn add_comment(&mut self, id: &SketchId, text: &str) -> Result<&[Comment], DomainError> {
        let index = self.position(id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidInput(
                "comment text must not be empty".into(),
            ));
        }

        self.sketches[index].comments.push(Comment::from_guest(text));
        self.persist()?;

        let comments = self.sketches[index].comments.as_slice();
        info!(sketch_id = %id, count = comments.len(), "comment added");
        Ok(comments)
    }

    pub fn list_filtered(&self, tag_query: &str, sort: SortKey) -> Vec<&Sketch> {
        filter_and_sort(&self.sketches, tag_query, sort)
    }

    /// Most liked first.
    pub fn favorites(&self) -> Vec<&Sketch> {
        self.list_filtered("", SortKey::Likes)
    }

    pub fn distinct_tags(&self) -> Vec<&str> {
        distinct_tags(&self.sketches)
    }

    fn position(&self, id: &SketchId) -> Result<usize, DomainError> {
        self.sketches
            .iter()
            .position(|sketch| &sketch.id == id)
            .ok_or_else(|| DomainError::SketchNotFound(id.clone()))
    }

    fn fresh_id(&self) -> SketchId {
        loop {
            let id = SketchId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) -> Result<(), DomainError> {
        self.store.save(&self.sketches).map_err(|source| {
            error!(error = %source, "failed to persist sketches");
            DomainError::NotPersisted { source }
        })
    }
}
