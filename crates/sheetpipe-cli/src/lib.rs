//! Library side of the `sheetpipe` binary: logging setup and the terminal
//! interaction used by interactive and dry runs.

pub mod logging;
pub mod terminal;
