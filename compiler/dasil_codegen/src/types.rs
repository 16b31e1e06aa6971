//! Type factory.

use dasil_ir::TypeKind;

use crate::{Context, Result, Type};

impl Context {
    /// The 32-bit integer type.
    pub fn int32_type(&self) -> Type {
        self.type_handle(self.module.i32_type())
    }

    /// The 32-bit floating-point type.
    pub fn float_type(&self) -> Type {
        self.type_handle(self.module.float_type())
    }

    /// Shape of a type handle.
    pub fn type_kind(&self, ty: Type) -> Result<TypeKind> {
        Ok(self.module.type_kind(self.type_id(ty)?)?)
    }
}
