/// Messages from background actions back to the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Notice(String),
    Failure(String),
}
