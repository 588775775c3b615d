pub(crate) mod alloc;
pub mod charset;
pub mod io;
pub mod text;
