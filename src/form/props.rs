/// Callback invoked by the form on close or success.
pub type Callback = Box<dyn FnMut() + Send>;

/// Hooks the embedding context passes to the form. Both are optional.
#[derive(Default)]
pub struct NoteFormProps {
    pub on_close: Option<Callback>,
    pub on_success: Option<Callback>,
}

impl NoteFormProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_close(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn on_success(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for NoteFormProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteFormProps")
            .field("on_close", &self.on_close.is_some())
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}
