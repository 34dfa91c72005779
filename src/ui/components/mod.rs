mod confirm;
mod input;
mod key_result;
mod search_input;

pub use confirm::ConfirmPrompt;
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
