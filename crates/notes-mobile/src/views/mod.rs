mod add;
mod edit;
mod list;

pub use add::AddView;
pub use edit::EditView;
pub use list::ListView;
