#![allow(missing_docs)]

pub(crate) mod util;

mod chunk;
mod id3v2;
mod properties;
mod wav;
