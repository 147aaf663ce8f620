mod cell_buffers;
mod double_buffered;

pub use self::cell_buffers::*;
pub use self::double_buffered::*;
