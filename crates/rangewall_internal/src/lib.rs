//! Facade over the workspace crates.
pub use rangewall_core as core;
pub use rangewall_io as io;
pub use rangewall_table as table;

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use rangewall_core::prelude::*;
    #[doc(hidden)]
    pub use rangewall_io::prelude::*;
    #[doc(hidden)]
    pub use rangewall_table::prelude::*;
}
