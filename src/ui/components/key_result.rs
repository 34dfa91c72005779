/// What a component did with a key.
///
/// Overlays (search box, confirm prompt) sit in front of their view and see
/// every key first; the view only acts on `NotHandled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Swallowed by the component
  Handled,
  /// Swallowed, and the view has something to act on
  Event(T),
  /// Not for this component
  NotHandled,
}

impl<T> KeyResult<T> {
  /// Act on the event while keeping whether the key was consumed.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> KeyResult<U> {
    match self {
      KeyResult::Handled => KeyResult::Handled,
      KeyResult::Event(event) => KeyResult::Event(f(event)),
      KeyResult::NotHandled => KeyResult::NotHandled,
    }
  }
}
