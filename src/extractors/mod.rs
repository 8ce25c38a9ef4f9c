mod body;
pub use body::JsonBody;
