//! Module rendering.

use std::io::{self, Write};

use crate::{Context, Result};

impl Context {
    /// Textual form of the module.
    pub fn render_module(&self) -> String {
        self.module.to_string()
    }

    /// Write the textual form of the module to `out`.
    pub fn write_module<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", self.module)?;
        Ok(())
    }

    /// Write the textual form of the module to stdout.
    pub fn print_module(&self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_module(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}
