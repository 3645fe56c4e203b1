pub mod todo_item;

pub use todo_item::TodoPayload;
