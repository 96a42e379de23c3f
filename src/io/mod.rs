pub mod atomic;
pub mod config_io;
pub mod host;
pub mod lock;
pub mod memory;
pub mod vault;

pub use host::{Document, DocumentHost, HostError, Selection, TextPosition, TextRange};
pub use memory::MemoryHost;
pub use vault::FsVault;
