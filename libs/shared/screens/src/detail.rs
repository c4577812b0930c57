/// Lifecycle of a single-entity screen. A `NotFound` load never lands here;
/// the owning screen redirects to its parent listing instead.
#[derive(Debug)]
pub enum DetailPhase<T> {
    Idle,
    Loading,
    Loaded(T),
    Error { message: String },
}

impl<T> DetailPhase<T> {
    pub fn entity(&self) -> Option<&T> {
        match self {
            DetailPhase::Loaded(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailPhase::Loading)
    }
}
