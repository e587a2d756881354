use socratic_core::TutorService;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub tutor: TutorService,
}

impl AppState {
    pub fn new(tutor: TutorService) -> Self {
        Self { tutor }
    }
}
