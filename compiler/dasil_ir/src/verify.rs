//! Module well-formedness checks.

use crate::{Inst, IrError, Module};

impl Module {
    /// Check that the module is well formed.
    ///
    /// Every block of a defined function must end in a terminator, and every
    /// `ret` must yield the function's return type. Declarations are always
    /// well formed.
    pub fn verify(&self) -> Result<(), IrError> {
        for (_, func) in self.functions() {
            let expected = self.type_kind(func.return_type())?;
            for &block_id in func.blocks() {
                let block = self.block(block_id)?;
                let Some(&Inst::Ret { value }) = block.terminator() else {
                    return Err(IrError::MissingTerminator {
                        function: func.name().to_owned(),
                        block: block.describe().to_owned(),
                    });
                };
                let found = self.type_kind(self.value_type(value)?)?;
                if found != expected {
                    return Err(IrError::ReturnTypeMismatch {
                        function: func.name().to_owned(),
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(())
    }
}
