//! Function and block construction.

use dasil_ir::TypeId;

use crate::{BasicBlock, Context, Function, Result, Type, Value};

/// Ordered `(name, type)` parameter list for [`Context::create_function`].
///
/// Transient: it is only read during function creation and is released when
/// dropped.
#[derive(Clone, Debug, Default)]
pub struct ArgList {
    args: Vec<(String, Type)>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Call order is declaration order.
    pub fn add(&mut self, name: impl Into<String>, ty: Type) -> &mut Self {
        self.args.push((name.into(), ty));
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Type)> {
        self.args.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

impl Context {
    /// Create an externally visible function in the module.
    ///
    /// Each parameter is named after its entry in `args` and bound in the
    /// symbol table under that name, replacing any earlier binding.
    pub fn create_function(
        &mut self,
        name: &str,
        args: &ArgList,
        return_type: Type,
    ) -> Result<Function> {
        let ret = self.type_id(return_type)?;
        let param_types = args
            .iter()
            .map(|(_, ty)| self.type_id(ty))
            .collect::<Result<Vec<TypeId>>>()?;

        let id = self.module.add_function(name, ret, &param_types)?;
        let params = self.module.function(id)?.params().to_vec();
        for ((arg_name, _), param) in args.iter().zip(params) {
            self.module.set_value_name(param, arg_name)?;
            let value = self.value_handle(param);
            self.variables.insert(arg_name.to_owned(), value);
        }

        tracing::debug!(function = name, params = args.len(), "created function");
        Ok(self.function_handle(id))
    }

    /// Append a basic block to `function`.
    ///
    /// Block names need not be unique; the printer disambiguates labels.
    pub fn create_basic_block(&mut self, name: &str, function: Function) -> Result<BasicBlock> {
        let function = self.function_id(function)?;
        let id = self.module.append_block(function, name)?;
        tracing::debug!(block = name, "created basic block");
        Ok(self.block_handle(id))
    }

    /// Formal parameters of `function`, in declaration order.
    pub fn function_params(&self, function: Function) -> Result<Vec<Value>> {
        let id = self.function_id(function)?;
        Ok(self
            .module
            .function(id)?
            .params()
            .iter()
            .map(|&p| self.value_handle(p))
            .collect())
    }

    /// Name of `function` in the module.
    pub fn function_name(&self, function: Function) -> Result<&str> {
        let id = self.function_id(function)?;
        Ok(self.module.function(id)?.name())
    }

    /// Type of `value`.
    pub fn value_type(&self, value: Value) -> Result<Type> {
        let id = self.value_id(value)?;
        Ok(self.type_handle(self.module.value_type(id)?))
    }
}
