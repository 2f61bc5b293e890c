use crate::filters;
use crate::models::Resource;

/// Records fetched by a backend-side query (search, pending, recent),
/// shown instead of the filtered cache until the next list fetch.
#[derive(Debug, Clone)]
pub struct RemoteView<R> {
    pub title: String,
    pub records: Vec<R>,
}

/// Transient copy of one backend collection plus the active filter.
#[derive(Debug, Clone)]
pub struct Store<R: Resource> {
    all: Vec<R>,
    filter: R::Filter,
    remote: Option<RemoteView<R>>,
    loaded: bool,
}

impl<R: Resource> Default for Store<R> {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            filter: R::Filter::default(),
            remote: None,
            loaded: false,
        }
    }
}

impl<R: Resource> Store<R> {
    /// Swaps in a freshly fetched collection. Nothing is merged.
    pub fn replace(&mut self, records: Vec<R>) {
        self.all = records;
        self.remote = None;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn all(&self) -> &[R] {
        &self.all
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: R::Filter) {
        self.filter = filter;
        self.remote = None;
    }

    pub fn show_remote(&mut self, title: impl Into<String>, records: Vec<R>) {
        self.remote = Some(RemoteView {
            title: title.into(),
            records,
        });
    }

    pub fn remote(&self) -> Option<&RemoteView<R>> {
        self.remote.as_ref()
    }

    /// Records the list section should display right now.
    pub fn visible(&self) -> Vec<R> {
        match &self.remote {
            Some(view) => view.records.clone(),
            None => filters::apply(&self.all, &self.filter),
        }
    }
}
