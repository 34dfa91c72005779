mod cart;
mod item_detail;
mod menu;
mod user_form;

pub use cart::CartView;
pub use item_detail::ItemDetailView;
pub use menu::MenuView;
pub use user_form::UserFormView;
